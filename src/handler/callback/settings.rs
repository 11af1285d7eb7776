use teloxide::prelude::*;

use crate::{error::HandlerResult, handler::keyboard::get_tests_menu_button_keyboard, quiz::Difficulty, state::AppState};

use crate::handler::{render, reply};

pub(super) async fn handle_callback_set_difficulty(
    bot: &Bot,
    chat_id: ChatId,
    app_state: &AppState,
    telegram_user_id: &str,
    difficulty: Difficulty,
) -> HandlerResult<()> {
    app_state
        .service_registry
        .user
        .set_difficulty(telegram_user_id, difficulty)
        .await?;

    info!("User {} set difficulty to {}", telegram_user_id, difficulty);

    reply::send_html(
        bot,
        chat_id,
        render::difficulty_set(difficulty),
        get_tests_menu_button_keyboard(),
    )
    .await
}
