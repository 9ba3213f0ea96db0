//! Feed retrieval.
//!
//! [`FeedFetcher`] is the seam between the aggregator and the network;
//! [`HttpFeedFetcher`] is the production implementation.

use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

use super::registry::FeedSource;
use crate::config::FeedsConfig;
use crate::{NewsError, Result};

/// Content type hint sent with feed requests.
const FEED_CONTENT_TYPE: &str = "text/xml";

/// Accept header for feed requests.
const FEED_ACCEPT: &str = "application/rss+xml, application/xml;q=0.9, text/xml;q=0.9, */*;q=0.5";

/// Retrieves the raw payload of one feed source.
///
/// Implementations must report failure through the returned `Result` only;
/// one source failing never affects another.
pub trait FeedFetcher: Send + Sync {
    fn fetch<'a>(&'a self, source: &'a FeedSource) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// reqwest-backed fetcher with timeouts and a size cap.
pub struct HttpFeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl HttpFeedFetcher {
    /// Create a fetcher from feed configuration.
    pub fn new(config: &FeedsConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NewsError::Fetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, FEED_CONTENT_TYPE)
            .header(ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(|e| NewsError::Fetch(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(NewsError::Fetch(format!("HTTP error: {}", response.status())));
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length)?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NewsError::Fetch(format!("failed to read response: {e}")))?;

        self.check_size(bytes.len() as u64)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(NewsError::Fetch("empty response body".to_string()));
        }

        Ok(bytes.to_vec())
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_feed_size {
            return Err(NewsError::Fetch(format!(
                "feed too large: {} bytes (max {} bytes)",
                size, self.max_feed_size
            )));
        }
        Ok(())
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch<'a>(&'a self, source: &'a FeedSource) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(self.fetch_bytes(&source.url))
    }
}
