//! # dbot-core
//!
//! Core types and traits for the visits bot: [`Bot`], [`Handler`], updates (messages and callback
//! queries), inline keyboards, and tracing initialization. Transport-agnostic; teloxide lives in
//! the `telegram-bot` crate.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{Bot, BotCommand, CommandScope};
pub use error::{DbotError, Result};
pub use logger::init_tracing;
pub use types::{
    CallbackQuery, Chat, Command, Handler, HandlerResponse, InlineButton, InlineKeyboard, Message,
    MessageDirection, Update, User,
};
