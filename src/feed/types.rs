//! Feed data model.
//!
//! `Raw*` types mirror what a source actually published, ambiguous fields
//! included. [`ChannelEnvelope`] and [`NewsItem`] are the normalized shapes
//! everything downstream of the normalizer works with.

use serde::{Deserialize, Serialize};

use super::registry::FeedSource;

/// Item title shown when a source omits one.
pub const PLACEHOLDER_TITLE: &str = "Untitled";
/// Publish date shown when a source omits one.
pub const PLACEHOLDER_DATE: &str = "No date";
/// Link used when a source omits one.
pub const PLACEHOLDER_LINK: &str = "#";
/// Author shown when a source omits one.
pub const PLACEHOLDER_AUTHOR: &str = "Unknown author";
/// Description shown when both description and title are missing.
pub const PLACEHOLDER_DESCRIPTION: &str = "No description";

/// An item `<guid>`: plain text, or text plus an `isPermaLink` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guid {
    Plain(String),
    Structured { text: String, is_permalink: bool },
}

/// An `<enclosure>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: Option<String>,
    pub length: Option<u64>,
    pub media_type: Option<String>,
}

/// A `<media:content>` element in one of the shapes seen in the wild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaContent {
    /// Element with attributes (`url`, `medium`, `type`).
    Object {
        url: Option<String>,
        medium: Option<String>,
        media_type: Option<String>,
    },
    /// Bare text with no attributes.
    Text(String),
    /// Repeated `<media:content>` elements on one item.
    Multiple(Vec<MediaContent>),
}

/// A `<media:thumbnail>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaThumbnail {
    pub url: Option<String>,
}

/// A `<category>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Plain(String),
    Structured { text: String, domain: String },
}

/// One `<item>` as published by the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub guid: Option<Guid>,
    pub description: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub media_content: Option<MediaContent>,
    pub media_thumbnail: Option<MediaThumbnail>,
    /// `<dc:creator>`.
    pub creator: Option<String>,
    pub categories: Vec<Category>,
}

/// An RSS `<channel>` as published by the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChannel {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub items: Vec<RawItem>,
}

/// A normalized news item.
///
/// Every field is a plain string. After [`NewsItem::with_placeholders`]
/// the user-facing fields are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub link: String,
    pub id: String,
    pub author: String,
    pub thumbnail: String,
    pub description: String,
}

impl NewsItem {
    /// Fill missing user-facing fields with fixed placeholders.
    ///
    /// Idempotent: placeholders are themselves non-empty.
    pub fn with_placeholders(self) -> Self {
        Self {
            title: or_placeholder(self.title, PLACEHOLDER_TITLE),
            pub_date: or_placeholder(self.pub_date, PLACEHOLDER_DATE),
            link: or_placeholder(self.link, PLACEHOLDER_LINK),
            id: self.id,
            author: or_placeholder(self.author, PLACEHOLDER_AUTHOR),
            thumbnail: self.thumbnail,
            description: or_placeholder(self.description, PLACEHOLDER_DESCRIPTION),
        }
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// A normalized channel, as served by the HTTP aggregation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub items: Vec<NewsItem>,
}

/// One provider's slice of a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFeed {
    pub source: FeedSource,
    /// `None` when the provider yielded no usable channel.
    pub items: Option<Vec<NewsItem>>,
}

/// Per-provider items for one request, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDigest {
    pub providers: Vec<ProviderFeed>,
}

impl ProviderDigest {
    /// Look up a provider by selector key (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ProviderFeed> {
        self.providers
            .iter()
            .find(|p| p.source.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_placeholders_fills_empty_fields() {
        let item = NewsItem::default().with_placeholders();
        assert_eq!(item.title, PLACEHOLDER_TITLE);
        assert_eq!(item.pub_date, PLACEHOLDER_DATE);
        assert_eq!(item.link, PLACEHOLDER_LINK);
        assert_eq!(item.author, PLACEHOLDER_AUTHOR);
        assert_eq!(item.description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(item.id, "");
        assert_eq!(item.thumbnail, "");
    }

    #[test]
    fn test_with_placeholders_keeps_values() {
        let item = NewsItem {
            title: "BTC hits new high".to_string(),
            pub_date: "Tue, 15 Oct 2024 10:30:00 +0000".to_string(),
            link: "https://example.com/btc".to_string(),
            id: "42".to_string(),
            author: "Jane".to_string(),
            thumbnail: "https://example.com/btc.jpg".to_string(),
            description: "Up only".to_string(),
        };
        assert_eq!(item.clone().with_placeholders(), item);
    }

    #[test]
    fn test_with_placeholders_idempotent() {
        let once = NewsItem {
            title: "   ".to_string(),
            ..Default::default()
        }
        .with_placeholders();
        let twice = once.clone().with_placeholders();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_news_item_json_shape() {
        let item = NewsItem {
            title: "t".to_string(),
            pub_date: "d".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pubDate"], "d");
        assert_eq!(json["thumbnail"], "");
        assert!(json.get("pub_date").is_none());
    }

    #[test]
    fn test_channel_envelope_omits_missing_metadata() {
        let channel = ChannelEnvelope {
            title: Some("Feed".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&channel).unwrap();
        assert_eq!(json["title"], "Feed");
        assert!(json.get("language").is_none());
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
