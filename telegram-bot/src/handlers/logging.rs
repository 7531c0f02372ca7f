//! Logs every update in before() and the chain's response in after().

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Result, Update};
use tracing::{debug, info, instrument};

/// Always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, update))]
    async fn before(&self, update: &Update) -> Result<bool> {
        let user = update.user();
        match update {
            Update::Message(m) => info!(
                user_id = user.id,
                chat_id = m.chat.id,
                username = %user.username.as_deref().unwrap_or("unknown"),
                message_content = %m.content,
                "Received message"
            ),
            Update::Callback(q) => info!(
                user_id = user.id,
                chat_id = q.chat.id,
                username = %user.username.as_deref().unwrap_or("unknown"),
                callback_data = %q.data,
                "Received callback"
            ),
        }
        Ok(true)
    }

    #[instrument(skip(self, update, response))]
    async fn after(&self, update: &Update, response: &HandlerResponse) -> Result<()> {
        debug!(
            user_id = update.user().id,
            kind = update.kind(),
            response = ?response,
            "Processed update"
        );
        Ok(())
    }
}
