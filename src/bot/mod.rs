//! Chat command layer.
//!
//! Parses `news` requests, runs them against a news source, and renders
//! the per-provider digest.

pub mod command;
pub mod digest;
pub mod handler;
pub mod messages;

pub use command::{
    parse_input, BotCommand, NewsRequest, Selector, ALL_PROVIDERS, DEFAULT_NEWS_COUNT,
    MAX_NEWS_COUNT,
};
pub use digest::{
    escape_html, format_digest, format_provider, split_message, TELEGRAM_MESSAGE_LIMIT,
};
pub use handler::{BotReply, NewsBot, ReplyFormat};
