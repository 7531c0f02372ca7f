//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code talks to Telegram; tests
//! substitute a recording Bot.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, BotCommand, CommandScope, DbotError, InlineKeyboard, Result};
use teloxide::prelude::*;
use teloxide::types::{
    BotCommandScope, CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup,
    MessageId, Recipient,
};
use teloxide::{ApiError, RequestError};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// Builds the Telegram markup for a core keyboard; every button is a callback button.
pub fn to_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.text.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn to_bot_error(e: RequestError) -> DbotError {
    DbotError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<i32> {
        let mut request = self.bot.send_message(ChatId(chat_id), text.to_string());
        if let Some(kb) = keyboard {
            request = request.reply_markup(to_markup(kb));
        }
        let sent = request.await.map_err(to_bot_error)?;
        Ok(sent.id.0)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        let mut request =
            self.bot
                .edit_message_text(ChatId(chat_id), MessageId(message_id), text.to_string());
        if let Some(kb) = keyboard {
            request = request.reply_markup(to_markup(kb));
        }
        match request.await {
            Ok(_) => Ok(()),
            // Same text and keyboard: Telegram refuses, the screen is already right.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(to_bot_error(e)),
        }
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(to_bot_error)?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text.to_string()).show_alert(show_alert);
        }
        request.await.map_err(to_bot_error)?;
        Ok(())
    }

    async fn set_commands(&self, scope: CommandScope, commands: &[BotCommand]) -> Result<()> {
        let commands = commands
            .iter()
            .map(|c| teloxide::types::BotCommand::new(c.command.clone(), c.description.clone()));
        let scope = match scope {
            CommandScope::Default => BotCommandScope::Default,
            CommandScope::Chat(id) => BotCommandScope::Chat {
                chat_id: Recipient::Id(ChatId(id)),
            },
        };
        self.bot
            .set_my_commands(commands)
            .scope(scope)
            .await
            .map_err(to_bot_error)?;
        Ok(())
    }
}
