//! Bot configuration loaded from the environment: Telegram connection, logging, data file, admin,
//! calculation timeout, and polling/webhook mode.

mod bot_config;
mod run_mode;

#[cfg(test)]
mod tests;

pub use bot_config::BotConfig;
pub use run_mode::RunMode;
