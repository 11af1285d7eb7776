use teloxide::{prelude::*, types::Message};

use crate::error::HandlerResult;

use super::{keyboard::get_main_menu_keyboard, reply};

/// Plain text and unrecognised commands.
pub async fn handle_message_unknown(bot: Bot, message: Message) -> HandlerResult<()> {
    debug!("Unhandled message in chat {}: {:?}", message.chat.id, message.text());

    reply::send_html(
        &bot,
        message.chat.id,
        t!("messages.unknown_message").to_string(),
        get_main_menu_keyboard(),
    )
    .await
}
