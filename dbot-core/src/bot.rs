//! Bot abstraction for outgoing actions (send, edit, delete, answer callbacks, command menus).
//!
//! [`Bot`] is transport-agnostic; the teloxide implementation lives in `telegram-bot`. Tests
//! substitute a recording implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::InlineKeyboard;

/// One entry of the bot command menu (`/command` + description).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

/// Where a command menu applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    /// Every private chat without a more specific menu.
    Default,
    /// A single chat.
    Chat(i64),
}

/// Outgoing bot actions. Message ids are Telegram's numeric ids.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message (optionally with an inline keyboard) and returns its id.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<i32>;

    /// Replaces the text (and keyboard) of an already-sent message.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()>;

    /// Deletes a message. Fails if it is already gone or too old.
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()>;

    /// Answers a callback query; `text` is shown as a toast, or as an alert when `show_alert`.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;

    /// Replaces the command menu for `scope`. An empty list hides the menu.
    async fn set_commands(&self, scope: CommandScope, commands: &[BotCommand]) -> Result<()>;
}
