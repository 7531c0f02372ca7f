use std::net::SocketAddr;

use reqwest::Url;

/// How updates reach the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Long polling; any registered webhook is removed first.
    Polling,
    /// Telegram pushes updates to `url`; the server listens on `listen`.
    Webhook {
        listen: SocketAddr,
        url: Url,
        secret_token: Option<String>,
    },
}

impl RunMode {
    pub fn name(&self) -> &'static str {
        match self {
            RunMode::Polling => "polling",
            RunMode::Webhook { .. } => "webhook",
        }
    }
}
