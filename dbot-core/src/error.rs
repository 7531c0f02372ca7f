//! Error types for the bot core.

use thiserror::Error;

/// Error surfaced through the [`crate::Bot`] and [`crate::Handler`] traits.
///
/// Domain failures (storage, input parsing) are handled inside the handlers and turned into
/// replies; only transport failures cross the trait boundary.
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Bot error: {0}")]
    Bot(String),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;
