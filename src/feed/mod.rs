//! RSS aggregation pipeline.
//!
//! Fetches every registered source concurrently, parses each payload into a
//! source-shaped channel, normalizes it, and collects the successes in
//! registry order.

pub mod aggregator;
pub mod fetcher;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod remote;
pub mod types;
pub mod xml;

pub use aggregator::{AggregateReport, Aggregator, NewsSource, SourceOutcome};
pub use fetcher::{FeedFetcher, HttpFeedFetcher};
pub use normalize::{normalize_channel, normalize_item};
pub use parser::parse_channel;
pub use registry::{default_sources, validate_source_url, FeedRegistry, FeedSource};
pub use remote::RemoteFeeds;
pub use types::{
    Category, ChannelEnvelope, Enclosure, Guid, MediaContent, MediaThumbnail, NewsItem,
    ProviderDigest, ProviderFeed, RawChannel, RawItem,
};
