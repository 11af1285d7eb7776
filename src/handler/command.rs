use teloxide::dispatching::{HandlerExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::command::Command;
use crate::error::{BotError, HandlerResult};
use crate::quiz::TestType;
use crate::state::AppState;
use crate::utils::display_name;

use super::keyboard::get_main_menu_keyboard;
use super::{render, reply};

async fn handle_start(bot: &Bot, msg: &Message, first_name: &str) -> HandlerResult<()> {
    reply::send_html(bot, msg.chat.id, render::welcome(first_name), get_main_menu_keyboard()).await
}

async fn handle_help(bot: &Bot, msg: &Message) -> HandlerResult<()> {
    reply::send_html(bot, msg.chat.id, t!("commands.help").to_string(), get_main_menu_keyboard()).await
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, app_state: AppState) -> HandlerResult<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| BotError::Other(anyhow::anyhow!("Command without sender")))?;
    let telegram_user_id = user.id.to_string();

    info!("Command {:?} from user {}", cmd, telegram_user_id);

    let profile = app_state
        .service_registry
        .user
        .touch_profile(&telegram_user_id, user.username.as_deref(), &user.first_name)
        .await?;

    match cmd {
        Command::Start => handle_start(&bot, &msg, &user.first_name).await?,
        Command::Help => handle_help(&bot, &msg).await?,
        Command::Test => reply::send_tests_menu(&bot, msg.chat.id, profile.difficulty).await?,
        Command::Random => {
            reply::start_test(&bot, msg.chat.id, &app_state, &telegram_user_id, TestType::Random).await?
        }
        Command::Stats => {
            let name = display_name(user.username.as_deref(), &user.first_name);
            reply::send_stats(&bot, msg.chat.id, &app_state, &telegram_user_id, &name).await?
        }
        Command::Leaderboard => reply::send_leaderboard(&bot, msg.chat.id, &app_state).await?,
        Command::Difficulty => reply::send_difficulty_menu(&bot, msg.chat.id, profile.difficulty).await?,
    }

    Ok(())
}

pub fn get_command_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command)
}
