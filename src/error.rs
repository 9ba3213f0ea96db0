//! Error types for the news aggregator.

use thiserror::Error;

/// Common error type for the aggregator and the bot.
#[derive(Error, Debug)]
pub enum NewsError {
    /// A single feed source could not be retrieved.
    ///
    /// Contained to that source; the aggregator logs it and moves on.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A feed payload was not well-formed markup.
    #[error("parse error: {0}")]
    Parse(String),

    /// Every registered source failed.
    #[error("no data available from any feed source")]
    NoData,

    /// The requested item count is above the per-request cap.
    #[error("requested count {requested} exceeds limit of {max}")]
    CountExceedsLimit { requested: usize, max: usize },

    /// The selector names a provider that is not registered.
    #[error("provider not recognized: {0}")]
    UnknownProvider(String),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Telegram Bot API error.
    #[error("telegram error: {0}")]
    Telegram(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, NewsError>;
