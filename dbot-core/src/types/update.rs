use super::callback::CallbackQuery;
use super::message::Message;
use super::user::User;

/// An incoming event routed through the handler chain.
#[derive(Debug, Clone)]
pub enum Update {
    Message(Message),
    Callback(CallbackQuery),
}

impl Update {
    pub fn user(&self) -> &User {
        match self {
            Update::Message(m) => &m.user,
            Update::Callback(q) => &q.user,
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            Update::Message(m) => m.chat.id,
            Update::Callback(q) => q.chat.id,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Update::Message(m) => Some(m),
            Update::Callback(_) => None,
        }
    }

    pub fn as_callback(&self) -> Option<&CallbackQuery> {
        match self {
            Update::Message(_) => None,
            Update::Callback(q) => Some(q),
        }
    }

    /// Short kind name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Update::Message(_) => "message",
            Update::Callback(_) => "callback",
        }
    }
}
