//! cryptonews - crypto news RSS aggregator
//!
//! Fans out to a fixed set of RSS sources, normalizes their items, and
//! serves the result over HTTP and as a Telegram bot `news` digest.

pub mod bot;
pub mod config;
pub mod datetime;
pub mod error;
pub mod feed;
pub mod logging;
pub mod telegram;
pub mod web;

pub use bot::{BotReply, NewsBot, NewsRequest, Selector};
pub use config::Config;
pub use error::{NewsError, Result};
pub use feed::{Aggregator, ChannelEnvelope, FeedRegistry, FeedSource, NewsItem, ProviderDigest};
pub use web::WebServer;
