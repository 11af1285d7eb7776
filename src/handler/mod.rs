mod callback;
mod command;
mod keyboard;
mod message;
mod render;
mod reply;

use callback::get_callback_handler;
use command::get_command_handler;
use message::handle_message_unknown;
use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::Update,
};

pub fn get_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(get_command_handler())
        .branch(get_callback_handler())
        .branch(Update::filter_message().endpoint(handle_message_unknown))
}
