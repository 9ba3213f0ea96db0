//! Digest rendering.
//!
//! Turns a [`ProviderDigest`] into the HTML text sent to chat. Output uses
//! the Telegram HTML subset (`<b>`, `<a>`), so item text is escaped.

use super::command::Selector;
use super::messages::{PROVIDER_FAILED_TO_LOAD, PROVIDER_SEPARATOR};
use crate::datetime::format_pub_date;
use crate::feed::{NewsItem, ProviderDigest, ProviderFeed};
use crate::{NewsError, Result};

/// Longest text Telegram accepts in one message, in UTF-16 code units.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Render the digest for `selector`, at most `count` items per provider.
///
/// An unknown provider fails before anything is rendered.
pub fn format_digest(
    digest: &ProviderDigest,
    selector: &Selector,
    count: usize,
    timezone: &str,
) -> Result<String> {
    match selector {
        Selector::Provider(name) => {
            let provider = digest
                .get(name)
                .ok_or_else(|| NewsError::UnknownProvider(name.clone()))?;
            Ok(format_provider(provider, count, timezone))
        }
        Selector::All => Ok(digest
            .providers
            .iter()
            .map(|provider| format_provider(provider, count, timezone))
            .collect::<Vec<_>>()
            .join(PROVIDER_SEPARATOR)),
    }
}

/// Render one provider block.
///
/// A provider without items still gets its header, followed by the
/// failed-to-load notice.
pub fn format_provider(provider: &ProviderFeed, count: usize, timezone: &str) -> String {
    let header = provider_header(&provider.source.title);

    let items = match provider.items.as_deref() {
        Some(items) if !items.is_empty() => items,
        _ => {
            tracing::warn!(
                provider = %provider.source.name,
                "Provider data is empty or invalid"
            );
            return format!("{header}\n\n{PROVIDER_FAILED_TO_LOAD}");
        }
    };

    let body = items
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, item)| format_item(item, idx + 1, timezone))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{header}\n\n{body}")
}

fn provider_header(title: &str) -> String {
    format!("<b>🔹 {} 🔹</b>", escape_html(title))
}

fn format_item(item: &NewsItem, number: usize, timezone: &str) -> String {
    [
        format!("📰 <b>{}. {}</b>", number, escape_html(&item.title)),
        format!("📅 {}", format_pub_date(&item.pub_date, timezone)),
        format!("<a href=\"{}\">Read more</a>", escape_html(&item.link)),
    ]
    .join("\n")
}

/// Split a reply into messages of at most `limit` UTF-16 code units.
///
/// Cuts fall between provider blocks first, then between items of one
/// block. Only a single item longer than `limit` is cut mid-text.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text_len(text) <= limit {
        return vec![text.to_string()];
    }
    pack(text.split(PROVIDER_SEPARATOR), PROVIDER_SEPARATOR, limit, split_block)
}

fn split_block(block: &str, limit: usize) -> Vec<String> {
    pack(block.split("\n\n"), "\n\n", limit, hard_split)
}

/// Greedily join `parts` with `separator` into chunks no longer than `limit`.
fn pack<'a>(
    parts: impl Iterator<Item = &'a str>,
    separator: &str,
    limit: usize,
    split_oversize: fn(&str, usize) -> Vec<String>,
) -> Vec<String> {
    let separator_len = text_len(separator);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for part in parts {
        let len = text_len(part);
        if len > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(split_oversize(part, limit));
        } else if current.is_empty() {
            current.push_str(part);
            current_len = len;
        } else if current_len + separator_len + len <= limit {
            current.push_str(separator);
            current.push_str(part);
            current_len += separator_len + len;
        } else {
            chunks.push(std::mem::replace(&mut current, part.to_string()));
            current_len = len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn hard_split(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for ch in text.chars() {
        if current_len + ch.len_utf16() > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push(ch);
        current_len += ch.len_utf16();
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
