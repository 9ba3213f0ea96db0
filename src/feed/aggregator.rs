//! Fan-out of fetch, parse and normalize over the feed registry.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;

use super::fetcher::FeedFetcher;
use super::normalize::normalize_channel;
use super::parser::parse_channel;
use super::registry::{FeedRegistry, FeedSource};
use super::types::{ChannelEnvelope, ProviderDigest, ProviderFeed};
use crate::{NewsError, Result};

/// Outcome of one source for one aggregation request.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source: FeedSource,
    /// `None` when the fetch failed or the payload had no channel.
    pub channel: Option<ChannelEnvelope>,
}

/// All source outcomes for one request, in registry order.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl AggregateReport {
    /// Number of sources that produced a channel.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.channel.is_some()).count()
    }

    /// Successful channels in registry order, or `NoData` if there are none.
    pub fn into_channels(self) -> Result<Vec<ChannelEnvelope>> {
        let channels: Vec<_> = self
            .outcomes
            .into_iter()
            .filter_map(|o| o.channel)
            .collect();

        if channels.is_empty() {
            return Err(NewsError::NoData);
        }
        Ok(channels)
    }

    /// Per-provider items with placeholders applied, or `NoData` if every
    /// source failed.
    pub fn into_digest(self) -> Result<ProviderDigest> {
        if self.success_count() == 0 {
            return Err(NewsError::NoData);
        }

        let providers = self
            .outcomes
            .into_iter()
            .map(|outcome| ProviderFeed {
                items: outcome.channel.map(|channel| {
                    channel
                        .items
                        .into_iter()
                        .map(|item| item.with_placeholders())
                        .collect()
                }),
                source: outcome.source,
            })
            .collect();

        Ok(ProviderDigest { providers })
    }
}

/// Where the bot gets its per-source outcomes from.
///
/// [`Aggregator`] fetches the feeds itself; `RemoteFeeds` asks an upstream
/// aggregation endpoint.
pub trait NewsSource: Send + Sync {
    /// Registry used to validate selectors and order the digest.
    fn registry(&self) -> &FeedRegistry;

    /// Settle every source once.
    fn report(&self) -> BoxFuture<'_, Result<AggregateReport>>;
}

/// Runs the fetch/parse/normalize pipeline over every registered source.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<FeedRegistry>,
    fetcher: Arc<dyn FeedFetcher>,
}

impl Aggregator {
    /// Create an aggregator over `registry` using `fetcher`.
    pub fn new(registry: Arc<FeedRegistry>, fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self { registry, fetcher }
    }

    /// The registry this aggregator fans out over.
    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    /// Fetch every source concurrently and wait for all of them to settle.
    ///
    /// Results arrive in completion order and are written to the slot of
    /// their registry index, so the report is always in registry order.
    pub async fn collect(&self) -> AggregateReport {
        let sources = self.registry.sources();
        let mut slots: Vec<Option<ChannelEnvelope>> = vec![None; sources.len()];

        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| async move { (index, self.fetch_channel(source).await) })
            .collect();

        while let Some((index, channel)) = pending.next().await {
            slots[index] = channel;
        }

        let outcomes: Vec<_> = sources
            .iter()
            .cloned()
            .zip(slots)
            .map(|(source, channel)| SourceOutcome { source, channel })
            .collect();

        let report = AggregateReport { outcomes };
        tracing::info!(
            succeeded = report.success_count(),
            total = sources.len(),
            "Feed aggregation finished"
        );
        report
    }

    /// Successful channels in registry order.
    pub async fn channels(&self) -> Result<Vec<ChannelEnvelope>> {
        self.collect().await.into_channels()
    }

    /// Per-provider digest for the command layer.
    pub async fn digest(&self) -> Result<ProviderDigest> {
        self.collect().await.into_digest()
    }

    async fn fetch_channel(&self, source: &FeedSource) -> Option<ChannelEnvelope> {
        let bytes = match self.fetcher.fetch(source).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "Failed to fetch feed");
                return None;
            }
        };

        match parse_channel(&bytes) {
            Ok(Some(channel)) => {
                tracing::debug!(
                    source = %source.name,
                    items = channel.items.len(),
                    "Parsed feed"
                );
                Some(normalize_channel(channel))
            }
            Ok(None) => {
                tracing::warn!(source = %source.name, "Feed has no RSS channel");
                None
            }
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "Failed to parse feed");
                None
            }
        }
    }
}

impl NewsSource for Aggregator {
    fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    fn report(&self) -> BoxFuture<'_, Result<AggregateReport>> {
        Box::pin(async move { Ok(self.collect().await) })
    }
}
