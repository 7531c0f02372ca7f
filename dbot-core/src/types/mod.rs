//! Core types: user, chat, message, callback query, update, inline keyboard, handler response,
//! and the Handler trait.

mod callback;
mod handler;
mod keyboard;
mod message;
mod update;
mod user;

pub use callback::CallbackQuery;
pub use handler::{Handler, HandlerResponse};
pub use keyboard::{InlineButton, InlineKeyboard};
pub use message::{Command, Message, MessageDirection};
pub use update::Update;
pub use user::{Chat, User};
