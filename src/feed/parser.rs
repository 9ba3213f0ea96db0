//! RSS 2.0 parser producing source-shaped channels.

use super::types::{
    Category, Enclosure, Guid, MediaContent, MediaThumbnail, RawChannel, RawItem,
};
use super::xml::{parse_document, XmlElement};
use crate::Result;

/// Parse a feed payload into a [`RawChannel`].
///
/// Malformed markup is an error. A well-formed document without an
/// `<rss><channel>` structure is `Ok(None)`: the source changed its shape or
/// serves something else, which the aggregator treats as "no data".
pub fn parse_channel(bytes: &[u8]) -> Result<Option<RawChannel>> {
    let root = parse_document(bytes)?;
    Ok(channel_from_root(&root))
}

fn channel_from_root(root: &XmlElement) -> Option<RawChannel> {
    if root.name != "rss" {
        return None;
    }
    let channel = root.child("channel")?;

    Some(RawChannel {
        title: channel.child_text("title"),
        link: channel.child_text("link"),
        description: channel.child_text("description"),
        language: channel.child_text("language"),
        items: channel.children_named("item").map(parse_item).collect(),
    })
}

fn parse_item(item: &XmlElement) -> RawItem {
    RawItem {
        title: item.child_text("title"),
        link: item.child_text("link"),
        pub_date: item.child_text("pubDate"),
        guid: item.child("guid").map(parse_guid),
        description: item.child_text("description"),
        enclosure: item.child("enclosure").map(parse_enclosure),
        media_content: parse_media_content(item),
        media_thumbnail: item.child("media:thumbnail").map(|t| MediaThumbnail {
            url: t.attr("url").map(str::to_string),
        }),
        creator: item.child_text("dc:creator"),
        categories: item.children_named("category").map(parse_category).collect(),
    }
}

fn parse_guid(guid: &XmlElement) -> Guid {
    match guid.attr("isPermaLink") {
        Some(flag) => Guid::Structured {
            text: guid.text.clone(),
            is_permalink: flag.eq_ignore_ascii_case("true"),
        },
        None => Guid::Plain(guid.text.clone()),
    }
}

fn parse_enclosure(enclosure: &XmlElement) -> Enclosure {
    Enclosure {
        url: enclosure.attr("url").map(str::to_string),
        length: enclosure.attr("length").and_then(|l| l.trim().parse().ok()),
        media_type: enclosure.attr("type").map(str::to_string),
    }
}

fn parse_media_content(item: &XmlElement) -> Option<MediaContent> {
    let mut contents: Vec<MediaContent> = item
        .children_named("media:content")
        .map(media_content_shape)
        .collect();

    match contents.len() {
        0 => None,
        1 => contents.pop(),
        _ => Some(MediaContent::Multiple(contents)),
    }
}

fn media_content_shape(media: &XmlElement) -> MediaContent {
    if media.has_attributes() || !media.children.is_empty() {
        MediaContent::Object {
            url: media.attr("url").map(str::to_string),
            medium: media.attr("medium").map(str::to_string),
            media_type: media.attr("type").map(str::to_string),
        }
    } else {
        MediaContent::Text(media.text.clone())
    }
}

fn parse_category(category: &XmlElement) -> Category {
    match category.attr("domain") {
        Some(domain) => Category::Structured {
            text: category.text.clone(),
            domain: domain.to_string(),
        },
        None => Category::Plain(category.text.clone()),
    }
}
