//! # Visits bot
//!
//! Telegram bot that prices welder visits for linked customers and gives the admin a panel for
//! customers, users, project sums, and visit history. Wires dbot-core, handler-chain, storage,
//! and tariff; loads config from env and runs the teloxide dispatcher.

pub mod callback_data;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod handlers;
pub mod keyboards;
pub mod runner;
pub mod sessions;
pub mod telegram;
pub mod texts;
pub mod tracking;

pub use callback_data::{AdminAction, CallbackData, CallbackParseError, MenuAction};
pub use cli::{load_config, Cli, Commands};
pub use components::{build_handler_chain, BotComponents};
pub use config::{BotConfig, RunMode};
pub use runner::run_bot;
pub use sessions::CalcSessions;
pub use telegram::{
    run_dispatcher, TelegramBotAdapter, TelegramCallbackWrapper, TelegramMessageWrapper,
    TelegramUserWrapper,
};
pub use tracking::MessageTracker;
