mod quiz;
mod settings;

use crate::{
    error::HandlerResult,
    quiz::CallbackAction,
    service::UserProfile,
    state::AppState,
};

use teloxide::{dispatching::UpdateHandler, prelude::*, types::CallbackQuery};

use super::reply;

/// Runs the action behind a button. Returns a short notice to show on the
/// button spinner, if any.
async fn dispatch_action(
    bot: &Bot,
    chat_id: ChatId,
    action: CallbackAction,
    profile: &UserProfile,
    app_state: &AppState,
) -> HandlerResult<Option<String>> {
    let telegram_user_id = profile.telegram_user_id.as_str();

    match action {
        CallbackAction::StartTest(test_type) => {
            reply::start_test(bot, chat_id, app_state, telegram_user_id, test_type).await?
        }
        CallbackAction::Answer { option, question } => {
            return quiz::handle_callback_answer(bot, chat_id, app_state, telegram_user_id, option, question).await
        }
        CallbackAction::NextQuestion => {
            quiz::handle_callback_next_question(bot, chat_id, app_state, telegram_user_id).await?
        }
        CallbackAction::EndTest => quiz::handle_callback_end_test(bot, chat_id, app_state, telegram_user_id).await?,
        CallbackAction::SetDifficulty(difficulty) => {
            settings::handle_callback_set_difficulty(bot, chat_id, app_state, telegram_user_id, difficulty).await?
        }
        CallbackAction::DifficultyMenu => reply::send_difficulty_menu(bot, chat_id, profile.difficulty).await?,
        CallbackAction::TestsMenu => reply::send_tests_menu(bot, chat_id, profile.difficulty).await?,
        CallbackAction::Stats => {
            reply::send_stats(bot, chat_id, app_state, telegram_user_id, &profile.display_name()).await?
        }
        CallbackAction::Leaderboard => reply::send_leaderboard(bot, chat_id, app_state).await?,
    }

    Ok(None)
}

async fn handle_callback(bot: Bot, q: CallbackQuery, app_state: AppState) -> HandlerResult<()> {
    let telegram_user_id = q.from.id.to_string();
    let data = q.data.clone().unwrap_or_default();

    info!("Callback {:?} from user {}", data, telegram_user_id);

    let result = match (data.parse::<CallbackAction>(), q.message.as_ref()) {
        (Ok(action), Some(message)) => {
            let profile = app_state
                .service_registry
                .user
                .touch_profile(&telegram_user_id, q.from.username.as_deref(), &q.from.first_name)
                .await;

            match profile {
                Ok(profile) => dispatch_action(&bot, message.chat().id, action, &profile, &app_state).await,
                Err(e) => Err(e.into()),
            }
        }
        (Ok(action), None) => {
            warn!("Callback {} without an accessible message, ignoring", action);
            Ok(None)
        }
        (Err(e), _) => {
            warn!("{}", e);
            Ok(None)
        }
    };

    // The spinner is dismissed even when the action failed.
    let answer = match &result {
        Ok(Some(notice)) => bot.answer_callback_query(q.id.clone()).text(notice.clone()),
        _ => bot.answer_callback_query(q.id.clone()),
    };
    if let Err(e) = answer.await {
        warn!("Failed to answer callback query {}: {}", q.id, e);
    }

    result.map(|_| ())
}

pub fn get_callback_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_callback_query().endpoint(handle_callback)
}
