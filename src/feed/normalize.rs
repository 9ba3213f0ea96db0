//! Coercion of source-shaped items into [`NewsItem`]s.
//!
//! Each ambiguous field has one coercion function; nothing downstream of
//! this module looks at raw shapes again.

use super::types::{ChannelEnvelope, Guid, MediaContent, NewsItem, RawChannel, RawItem};

/// Item id from a guid of either shape.
pub fn guid_text(guid: Option<&Guid>) -> String {
    match guid {
        Some(Guid::Structured { text, .. }) => text.clone(),
        Some(Guid::Plain(text)) => text.clone(),
        None => String::new(),
    }
}

/// Thumbnail URL for an item.
///
/// A `media:content` element carrying a url wins, then `media:thumbnail`.
/// Bare-text and repeated `media:content` count as absent.
pub fn thumbnail_url(item: &RawItem) -> String {
    let from_content = match &item.media_content {
        Some(MediaContent::Object { url: Some(url), .. }) if !url.is_empty() => Some(url),
        _ => None,
    };

    from_content
        .or_else(|| {
            item.media_thumbnail
                .as_ref()
                .and_then(|t| t.url.as_ref())
                .filter(|url| !url.is_empty())
        })
        .cloned()
        .unwrap_or_default()
}

/// Description, falling back to the title when the source has none.
pub fn description_or_title(item: &RawItem) -> String {
    non_empty(item.description.as_deref())
        .or_else(|| non_empty(item.title.as_deref()))
        .unwrap_or_default()
        .to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalize one item.
pub fn normalize_item(item: &RawItem) -> NewsItem {
    NewsItem {
        title: item.title.clone().unwrap_or_default(),
        pub_date: item.pub_date.clone().unwrap_or_default(),
        link: item.link.clone().unwrap_or_default(),
        id: guid_text(item.guid.as_ref()),
        author: item.creator.clone().unwrap_or_default(),
        thumbnail: thumbnail_url(item),
        description: description_or_title(item),
    }
}

/// Normalize a whole channel, keeping item order.
pub fn normalize_channel(channel: RawChannel) -> ChannelEnvelope {
    ChannelEnvelope {
        items: channel.items.iter().map(normalize_item).collect(),
        title: channel.title,
        link: channel.link,
        description: channel.description,
        language: channel.language,
    }
}
