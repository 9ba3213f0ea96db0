//! API handlers.

pub mod feeds;
pub mod telegram;

use std::sync::Arc;

use crate::bot::NewsBot;
use crate::feed::Aggregator;
use crate::telegram::MessageSender;

pub use feeds::get_all_feeds;
pub use telegram::{telegram_webhook, SECRET_TOKEN_HEADER};

/// Shared application state.
pub struct AppState {
    pub aggregator: Aggregator,
    /// Present only when the chat bot is enabled.
    pub bot: Option<BotState>,
}

/// Everything the webhook needs to answer a chat message.
pub struct BotState {
    pub bot: Arc<NewsBot>,
    pub sender: Arc<dyn MessageSender>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`, if configured.
    pub webhook_secret: Option<String>,
    pub disable_link_preview: bool,
}

impl AppState {
    /// Create a new application state without a bot.
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            bot: None,
        }
    }

    /// Enable the webhook bot.
    pub fn with_bot(mut self, bot: BotState) -> Self {
        self.bot = Some(bot);
        self
    }
}
