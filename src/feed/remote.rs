//! Upstream feeds API client.
//!
//! A bot deployment can skip fetching RSS itself and read the channels that
//! another instance serves on `/api/feeds`, authenticating with the same
//! bearer scheme.

use futures::future::BoxFuture;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use super::aggregator::{AggregateReport, NewsSource, SourceOutcome};
use super::registry::{FeedRegistry, FeedSource};
use super::types::ChannelEnvelope;
use crate::config::FeedsConfig;
use crate::{NewsError, Result};

/// Reads channels from an upstream `/api/feeds` endpoint.
pub struct RemoteFeeds {
    client: Client,
    url: String,
    api_key: String,
    registry: Arc<FeedRegistry>,
}

impl RemoteFeeds {
    /// Create a client for `url`, reusing the feed timeouts.
    pub fn new(
        registry: Arc<FeedRegistry>,
        url: impl Into<String>,
        api_key: impl Into<String>,
        config: &FeedsConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NewsError::Fetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            registry,
        })
    }

    /// Fetch the upstream channel list.
    ///
    /// `409` means the upstream had no data either and maps to `NoData`.
    pub async fn channels(&self) -> Result<Vec<ChannelEnvelope>> {
        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| NewsError::Fetch(format!("upstream request failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::CONFLICT => return Err(NewsError::NoData),
            StatusCode::UNAUTHORIZED => {
                return Err(NewsError::Fetch("upstream rejected the API key".to_string()));
            }
            status => {
                return Err(NewsError::Fetch(format!("upstream HTTP error: {status}")));
            }
        }

        let channels: Vec<ChannelEnvelope> = response
            .json()
            .await
            .map_err(|e| NewsError::Parse(format!("invalid upstream response: {e}")))?;

        tracing::debug!(count = channels.len(), url = %self.url, "Received upstream channels");
        Ok(channels)
    }

    /// Fetch the upstream channels and attach them to registry sources.
    pub async fn collect(&self) -> Result<AggregateReport> {
        let channels = self.channels().await?;
        let outcomes = assign_channels(self.registry.sources(), channels);
        Ok(AggregateReport { outcomes })
    }
}

impl NewsSource for RemoteFeeds {
    fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    fn report(&self) -> BoxFuture<'_, Result<AggregateReport>> {
        Box::pin(self.collect())
    }
}

/// Attach upstream channels to registry sources.
///
/// The upstream drops failed sources, so a full list lines up with the
/// registry positionally. A shorter list is matched by the host of each
/// channel's link against the host of each source URL.
fn assign_channels(sources: &[FeedSource], channels: Vec<ChannelEnvelope>) -> Vec<SourceOutcome> {
    let mut slots: Vec<Option<ChannelEnvelope>> = vec![None; sources.len()];

    if channels.len() == sources.len() {
        for (slot, channel) in slots.iter_mut().zip(channels) {
            *slot = Some(channel);
        }
    } else {
        let source_hosts: Vec<Option<String>> = sources.iter().map(|s| host_of(&s.url)).collect();

        for channel in channels {
            let Some(host) = channel.link.as_deref().and_then(host_of) else {
                tracing::warn!(title = ?channel.title, "Upstream channel has no usable link");
                continue;
            };
            let matched = source_hosts
                .iter()
                .enumerate()
                .find(|(idx, source_host)| {
                    slots[*idx].is_none() && source_host.as_deref() == Some(host.as_str())
                })
                .map(|(idx, _)| idx);

            match matched {
                Some(idx) => slots[idx] = Some(channel),
                None => tracing::warn!(host = %host, "Upstream channel matches no source"),
            }
        }
    }

    sources
        .iter()
        .cloned()
        .zip(slots)
        .map(|(source, channel)| SourceOutcome { source, channel })
        .collect()
}

fn host_of(link: &str) -> Option<String> {
    let url = url::Url::parse(link).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}
