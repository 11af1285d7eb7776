use teloxide::{macros::BotCommands, prelude::Requester, types::BotCommand, Bot};

use crate::error::HandlerResult;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    Start,
    Help,
    Test,
    Random,
    Stats,
    Leaderboard,
    Difficulty,
}

impl Command {
    pub fn user_commands() -> Vec<BotCommand> {
        vec![
            BotCommand::new("start", t!("commands.description.start")),
            BotCommand::new("test", t!("commands.description.test")),
            BotCommand::new("random", t!("commands.description.random")),
            BotCommand::new("stats", t!("commands.description.stats")),
            BotCommand::new("leaderboard", t!("commands.description.leaderboard")),
            BotCommand::new("difficulty", t!("commands.description.difficulty")),
            BotCommand::new("help", t!("commands.description.help")),
        ]
    }
}

pub async fn setup_user_commands(bot: &Bot) -> HandlerResult<()> {
    bot.delete_my_commands().await?;
    bot.set_my_commands(Command::user_commands()).await?;
    Ok(())
}
