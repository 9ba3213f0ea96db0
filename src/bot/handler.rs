//! News bot dispatch.
//!
//! Maps a chat message to exactly one reply. Input errors become
//! user-facing texts; anything unexpected is logged and answered with a
//! generic failure.

use super::command::{parse_input, BotCommand, NewsRequest, Selector};
use super::digest::format_digest;
use super::messages;
use crate::feed::NewsSource;
use crate::{NewsError, Result};
use std::sync::Arc;

/// How the transport should render a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Plain,
    Html,
}

/// A reply to one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub text: String,
    pub format: ReplyFormat,
}

impl BotReply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Plain,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Html,
        }
    }

    pub fn is_html(&self) -> bool {
        self.format == ReplyFormat::Html
    }
}

/// Chat front end over a [`NewsSource`].
pub struct NewsBot {
    source: Arc<dyn NewsSource>,
    timezone: String,
}

impl NewsBot {
    /// Create a bot rendering dates in `timezone`.
    pub fn new<S: NewsSource + 'static>(source: S, timezone: impl Into<String>) -> Self {
        Self::from_shared(Arc::new(source), timezone)
    }

    pub fn from_shared(source: Arc<dyn NewsSource>, timezone: impl Into<String>) -> Self {
        Self {
            source,
            timezone: timezone.into(),
        }
    }

    /// Registered provider names, in registry order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.source.registry().names()
    }

    /// Handle one chat message.
    pub async fn handle_text(&self, text: &str) -> BotReply {
        let command = parse_input(text);
        tracing::debug!(command = command.name(), "Dispatching bot command");

        match command {
            BotCommand::Start => BotReply::plain(messages::GREETING),
            BotCommand::Unknown(_) => BotReply::plain(messages::usage(&self.provider_names())),
            BotCommand::News(args) => match self.news(&args).await {
                Ok(digest) => BotReply::html(digest),
                Err(e) => BotReply::plain(self.error_reply(&e)),
            },
        }
    }

    /// Run a `news` request and render the digest.
    ///
    /// Count and provider are both checked before any feed is fetched.
    pub async fn news(&self, args: &str) -> Result<String> {
        let request = NewsRequest::parse(args)?;

        if let Selector::Provider(name) = &request.selector {
            if self.source.registry().find(name).is_none() {
                return Err(NewsError::UnknownProvider(name.clone()));
            }
        }

        let digest = self.source.report().await?.into_digest()?;
        format_digest(&digest, &request.selector, request.count, &self.timezone)
    }

    fn error_reply(&self, error: &NewsError) -> String {
        match error {
            NewsError::CountExceedsLimit { requested, .. } => {
                tracing::info!(requested, "Rejected news request over the count limit");
                messages::count_exceeds_limit()
            }
            NewsError::UnknownProvider(name) => {
                tracing::info!(provider = %name, "Rejected news request for unknown provider");
                messages::provider_not_recognized(&self.provider_names())
            }
            NewsError::NoData => {
                tracing::warn!("No feed source produced data");
                messages::NO_RSS_DATA.to_string()
            }
            other => {
                tracing::error!(error = %other, "News command failed");
                messages::FETCH_ERROR.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Aggregator, FeedFetcher, FeedRegistry, FeedSource};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FeedFetcher for CountingFetcher {
        fn fetch<'a>(&'a self, source: &'a FeedSource) -> BoxFuture<'a, Result<Vec<u8>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return Err(NewsError::Fetch("unreachable".to_string()));
                }
                Ok(format!(
                    "<rss><channel><item><title>{} story</title>\
                     <link>https://{}.example/1</link>\
                     <pubDate>Tue, 15 Oct 2024 10:30:00 +0000</pubDate></item></channel></rss>",
                    source.title, source.name
                )
                .into_bytes())
            })
        }
    }

    fn bot(fail: bool) -> (NewsBot, Arc<CountingFetcher>) {
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            fail,
        });
        let registry = Arc::new(FeedRegistry::new(vec![
            FeedSource::new("alpha", "Alpha", "https://alpha.example/rss"),
            FeedSource::new("beta", "Beta", "https://beta.example/rss"),
        ]));
        let aggregator = Aggregator::new(registry, fetcher.clone());
        (NewsBot::new(aggregator, "UTC"), fetcher)
    }

    #[tokio::test]
    async fn test_start_greets() {
        let (bot, fetcher) = bot(false);
        let reply = bot.handle_text("/start").await;
        assert_eq!(reply, BotReply::plain(messages::GREETING));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_input_gets_usage() {
        let (bot, _) = bot(false);
        let reply = bot.handle_text("what's up").await;
        assert!(!reply.is_html());
        assert!(reply.text.contains("/news all [n]"));
        assert!(reply.text.contains("alpha, beta"));
    }

    #[tokio::test]
    async fn test_news_renders_html() {
        let (bot, fetcher) = bot(false);
        let reply = bot.handle_text("/news beta").await;
        assert!(reply.is_html());
        assert!(reply.text.starts_with("<b>🔹 Beta 🔹</b>"));
        assert!(reply.text.contains("📰 <b>1. Beta story</b>"));
        assert!(reply.text.contains("📅 15.10.2024, 10:30:00"));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_count_over_limit_fetches_nothing() {
        let (bot, fetcher) = bot(false);
        let reply = bot.handle_text("/news all 11").await;
        assert_eq!(reply.text, messages::count_exceeds_limit());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_provider_fetches_nothing() {
        let (bot, fetcher) = bot(false);
        let reply = bot.handle_text("/news gamma").await;
        assert_eq!(
            reply.text,
            "❌ News provider not recognized. Available providers: alpha, beta."
        );
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);

        let err = bot.news("gamma").await.unwrap_err();
        assert!(matches!(err, NewsError::UnknownProvider(name) if name == "gamma"));
    }

    #[tokio::test]
    async fn test_all_sources_failing() {
        let (bot, fetcher) = bot(true);
        let reply = bot.handle_text("/news").await;
        assert_eq!(reply, BotReply::plain(messages::NO_RSS_DATA));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_internal_error_reply_hides_details() {
        let (bot, _) = bot(false);
        let text = bot.error_reply(&NewsError::Telegram("token leaked?".to_string()));
        assert_eq!(text, messages::FETCH_ERROR);
    }
}
