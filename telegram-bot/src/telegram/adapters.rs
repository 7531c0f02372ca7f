//! teloxide → core conversions for users, messages, and callback queries.

use dbot_core::{CallbackQuery, Chat, Message, MessageDirection, User};

/// Converts a Telegram user to a core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl TelegramUserWrapper<'_> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn chat_type(chat: &teloxide::types::Chat) -> String {
    if chat.is_private() {
        "private"
    } else if chat.is_group() || chat.is_supergroup() {
        "group"
    } else {
        "channel"
    }
    .to_string()
}

/// Converts a Telegram message to a core message. Non-text messages get empty content.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl TelegramMessageWrapper<'_> {
    pub fn to_core(&self) -> Message {
        let msg = self.0;
        Message {
            id: msg.id.0,
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User::with_id(msg.chat.id.0)),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: chat_type(&msg.chat),
            },
            content: msg.text().unwrap_or("").to_string(),
            message_type: if msg.text().is_some() { "text" } else { "other" }.to_string(),
            direction: MessageDirection::Incoming,
            created_at: msg.date,
            reply_to_message_id: msg.reply_to_message().map(|m| m.id.0),
        }
    }
}

/// Converts a Telegram callback query. Without an accessible message the chat is the user's
/// private chat.
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl TelegramCallbackWrapper<'_> {
    pub fn to_core(&self) -> CallbackQuery {
        let q = self.0;
        let user = TelegramUserWrapper(&q.from).to_core();
        let (chat, message_id) = match &q.message {
            Some(m) => (
                Chat {
                    id: m.chat().id.0,
                    chat_type: chat_type(m.chat()),
                },
                Some(m.id().0),
            ),
            None => (Chat::private(user.id), None),
        };
        CallbackQuery {
            id: q.id.0.clone(),
            user,
            chat,
            message_id,
            data: q.data.clone().unwrap_or_default(),
        }
    }
}
