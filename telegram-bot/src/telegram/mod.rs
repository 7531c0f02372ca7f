//! Telegram layer: teloxide ↔ core adapters, the Bot implementation, and the dispatcher runner.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{to_markup, TelegramBotAdapter};
pub use runner::run_dispatcher;
