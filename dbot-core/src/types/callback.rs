use serde::{Deserialize, Serialize};

use super::user::{Chat, User};

/// A press on an inline keyboard button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Query id, needed to answer the query.
    pub id: String,
    pub user: User,
    pub chat: Chat,
    /// Message carrying the pressed keyboard; `None` when Telegram no longer exposes it.
    pub message_id: Option<i32>,
    pub data: String,
}
