//! Static registry of feed sources.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::{NewsError, Result};

/// A named upstream feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Selector key used by the `news` command (e.g. "coindesk").
    pub name: String,
    /// Display title (e.g. "CoinDesk").
    pub title: String,
    /// Feed URL.
    pub url: String,
}

impl FeedSource {
    /// Create a new feed source.
    pub fn new(name: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Built-in sources used when the config does not list any.
pub fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "coindesk",
            "CoinDesk",
            "https://www.coindesk.com/arc/outboundfeeds/rss/?outputType=xml",
        ),
        FeedSource::new("cointelegraph", "Cointelegraph", "https://cointelegraph.com/rss"),
        FeedSource::new("decrypt", "Decrypt", "https://decrypt.co/feed"),
    ]
}

/// Immutable, ordered set of feed sources.
///
/// Built once at startup and shared read-only; registry order is the
/// order of every aggregate and digest.
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    sources: Vec<FeedSource>,
}

impl FeedRegistry {
    /// Create a registry from an ordered list of sources.
    pub fn new(sources: Vec<FeedSource>) -> Self {
        let sources = sources
            .into_iter()
            .map(|mut s| {
                s.name = s.name.to_lowercase();
                s
            })
            .collect();
        Self { sources }
    }

    /// All sources in registry order.
    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Find a source by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&FeedSource> {
        let name = name.to_lowercase();
        self.sources.iter().find(|s| s.name == name)
    }

    /// Selector keys of all sources, in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

impl Default for FeedRegistry {
    fn default() -> Self {
        Self::new(default_sources())
    }
}

/// Check that a configured feed URL is fetchable and not an internal address.
pub fn validate_source_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).map_err(|e| NewsError::Config(format!("invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(NewsError::Config(format!(
                "unsupported URL scheme: {scheme}"
            )));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| NewsError::Config("URL has no host".to_string()))?;

    let internal = match host {
        url::Host::Domain(domain) => {
            let domain = domain.to_lowercase();
            domain == "localhost" || domain.ends_with(".localhost") || domain.ends_with(".local")
        }
        url::Host::Ipv4(ip) => is_internal_ip(&IpAddr::V4(ip)),
        url::Host::Ipv6(ip) => is_internal_ip(&IpAddr::V6(ip)),
    };

    if internal {
        return Err(NewsError::Config(format!(
            "internal host not allowed: {host}"
        )));
    }

    Ok(())
}

fn is_internal_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00 // unique local
                || (first & 0xffc0) == 0xfe80 // link-local
        }
    }
}
