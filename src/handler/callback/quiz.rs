use teloxide::prelude::*;

use crate::{
    error::HandlerResult,
    handler::keyboard::{get_after_answer_keyboard, get_report_keyboard, get_tests_menu_button_keyboard},
    quiz::SessionError,
    service::{Advance, AnswerResult},
    state::AppState,
};

use crate::handler::{render, reply};

pub(super) async fn handle_callback_answer(
    bot: &Bot,
    chat_id: ChatId,
    app_state: &AppState,
    telegram_user_id: &str,
    option: usize,
    question: Option<u32>,
) -> HandlerResult<Option<String>> {
    let result = app_state
        .service_registry
        .quiz
        .answer(telegram_user_id, option, question)
        .await?;

    match result {
        AnswerResult::Answered {
            test_type,
            outcome,
            score,
            total,
            stats,
            report,
        } => {
            let single_shot = test_type.is_single_shot();
            let progress = (!single_shot).then_some((score, outcome.number, total));
            let feedback = render::answer_result(&outcome.question, outcome.correct, progress, &stats);

            let (text, keyboard) = match report {
                Some(report) => (
                    format!("{}\n\n{}", feedback, render::report(&report)),
                    get_report_keyboard(),
                ),
                None => (feedback, get_after_answer_keyboard(single_shot)),
            };

            reply::send_html(bot, chat_id, text, keyboard).await?;

            Ok(None)
        }
        AnswerResult::NoSession => {
            reply::send_session_expired(bot, chat_id).await?;
            Ok(None)
        }
        AnswerResult::Rejected(SessionError::InvalidOption(_)) => Ok(Some(t!("quiz.invalid_option").to_string())),
        AnswerResult::Rejected(_) => Ok(Some(t!("quiz.already_answered").to_string())),
    }
}

pub(super) async fn handle_callback_next_question(
    bot: &Bot,
    chat_id: ChatId,
    app_state: &AppState,
    telegram_user_id: &str,
) -> HandlerResult<()> {
    match app_state.service_registry.quiz.next_question(telegram_user_id).await? {
        Advance::Question(presented) => reply::send_question(bot, chat_id, &presented).await,
        Advance::Completed { report, .. } => {
            reply::send_html(bot, chat_id, render::report(&report), get_report_keyboard()).await
        }
        Advance::NoSession => reply::send_session_expired(bot, chat_id).await,
    }
}

pub(super) async fn handle_callback_end_test(
    bot: &Bot,
    chat_id: ChatId,
    app_state: &AppState,
    telegram_user_id: &str,
) -> HandlerResult<()> {
    match app_state.service_registry.quiz.end_test(telegram_user_id).await? {
        Some(session) => {
            reply::send_html(
                bot,
                chat_id,
                render::ended(&session),
                get_tests_menu_button_keyboard(),
            )
            .await
        }
        None => reply::send_session_expired(bot, chat_id).await,
    }
}
