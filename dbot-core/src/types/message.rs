use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{Chat, User};

/// A single text message with user, chat, content, and optional reply context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Telegram message id within the chat.
    pub id: i32,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub message_type: String,
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
    pub reply_to_message_id: Option<i32>,
}

/// Direction of the message (from user or from bot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

impl Message {
    /// Incoming text message, stamped now.
    pub fn text(id: i32, user: User, chat: Chat, content: impl Into<String>) -> Self {
        Self {
            id,
            user,
            chat,
            content: content.into(),
            message_type: "text".to_string(),
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
            reply_to_message_id: None,
        }
    }

    /// Parses the content as a bot command; `None` for plain text.
    pub fn command(&self) -> Option<Command> {
        Command::parse(&self.content)
    }
}

/// A `/command arg1 arg2` line. The name is lowercased and a `@botname` suffix is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_lowercase(),
            args: parts.map(str::to_string).collect(),
        })
    }

    /// Arguments joined by single spaces (e.g. a customer name).
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: command name is lowercased, bot mention stripped, args split on whitespace.**
    #[test]
    fn test_command_parse() {
        let cmd = Command::parse("/Link@visits_bot  12   345").unwrap();
        assert_eq!(cmd.name, "link");
        assert_eq!(cmd.args, vec!["12", "345"]);
        assert_eq!(cmd.rest(), "12 345");
    }

    /// **Test: plain text and a lone slash are not commands.**
    #[test]
    fn test_command_parse_rejects_plain_text() {
        assert!(Command::parse("hello").is_none());
        assert!(Command::parse("/").is_none());
        assert!(Command::parse("").is_none());
    }

    /// **Test: Message::command delegates to Command::parse.**
    #[test]
    fn test_message_command() {
        let msg = Message::text(1, User::with_id(7), Chat::private(7), "/start");
        assert_eq!(msg.command().unwrap().name, "start");
        assert!(msg.command().unwrap().args.is_empty());
    }
}
