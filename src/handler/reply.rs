//! Screens shared by commands and buttons.

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardMarkup, ParseMode},
};

use crate::{error::HandlerResult, quiz::{Difficulty, TestType}, service::Presented, state::AppState};

use super::{keyboard::*, render};

/// Delivery failures are logged, never returned.
pub(super) async fn send_html(
    bot: &Bot,
    chat_id: ChatId,
    text: String,
    markup: InlineKeyboardMarkup,
) -> HandlerResult<()> {
    let sent = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await;

    if let Err(e) = sent {
        warn!("Failed to deliver message to chat {}: {}", chat_id, e);
    }
    Ok(())
}

pub(super) async fn send_tests_menu(bot: &Bot, chat_id: ChatId, difficulty: Difficulty) -> HandlerResult<()> {
    send_html(bot, chat_id, render::tests_menu(difficulty), get_tests_menu_keyboard()).await
}

pub(super) async fn send_question(bot: &Bot, chat_id: ChatId, presented: &Presented) -> HandlerResult<()> {
    let keyboard = get_answer_keyboard(
        &presented.question,
        presented.number,
        presented.test_type.is_single_shot(),
    );
    send_html(bot, chat_id, render::question(presented), keyboard).await
}

pub(super) async fn start_test(
    bot: &Bot,
    chat_id: ChatId,
    app_state: &AppState,
    telegram_user_id: &str,
    test_type: TestType,
) -> HandlerResult<()> {
    let presented = app_state
        .service_registry
        .quiz
        .start_test(telegram_user_id, test_type)
        .await?;

    send_question(bot, chat_id, &presented).await
}

pub(super) async fn send_stats(
    bot: &Bot,
    chat_id: ChatId,
    app_state: &AppState,
    telegram_user_id: &str,
    name: &str,
) -> HandlerResult<()> {
    let users = &app_state.service_registry.user;
    let stats = users.get_stats(telegram_user_id).await?;
    let difficulty = users.get_difficulty(telegram_user_id).await?;

    let keyboard = if stats.has_history() {
        get_report_keyboard()
    } else {
        get_tests_menu_button_keyboard()
    };

    send_html(bot, chat_id, render::stats(name, &stats, difficulty), keyboard).await
}

pub(super) async fn send_leaderboard(bot: &Bot, chat_id: ChatId, app_state: &AppState) -> HandlerResult<()> {
    let entries = app_state.service_registry.user.get_leaderboard().await?;
    send_html(
        bot,
        chat_id,
        render::leaderboard(&entries),
        get_tests_menu_button_keyboard(),
    )
    .await
}

pub(super) async fn send_difficulty_menu(bot: &Bot, chat_id: ChatId, current: Difficulty) -> HandlerResult<()> {
    send_html(
        bot,
        chat_id,
        render::difficulty_menu(current),
        get_difficulty_keyboard(current),
    )
    .await
}

pub(super) async fn send_session_expired(bot: &Bot, chat_id: ChatId) -> HandlerResult<()> {
    send_html(
        bot,
        chat_id,
        t!("quiz.expired").to_string(),
        get_tests_menu_button_keyboard(),
    )
    .await
}
