//! Shared fixtures for integration tests.
//!
//! Provides a stub fetcher serving canned RSS bodies, a recording message
//! sender, and helpers to build the aggregator and router around them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;

use cryptonews::feed::{default_sources, Aggregator, FeedFetcher, FeedRegistry, FeedSource};
use cryptonews::telegram::{MessageSender, SendOptions};
use cryptonews::{NewsError, Result};

pub const COINDESK_URL: &str = "https://www.coindesk.com/arc/outboundfeeds/rss/?outputType=xml";
pub const COINTELEGRAPH_URL: &str = "https://cointelegraph.com/rss";
pub const DECRYPT_URL: &str = "https://decrypt.co/feed";

pub const TEST_API_KEY: &str = "test-api-key";

/// CoinDesk-style feed: five items, structured guid, media:content objects.
pub fn coindesk_feed() -> String {
    let items: String = (1..=5)
        .map(|n| {
            format!(
                r#"<item>
  <title><![CDATA[CoinDesk story {n}]]></title>
  <link>https://www.coindesk.com/markets/story-{n}</link>
  <guid isPermaLink="false">cd-{n}</guid>
  <pubDate>Tue, 15 Oct 2024 1{n}:00:00 +0000</pubDate>
  <dc:creator><![CDATA[Reporter {n}]]></dc:creator>
  <description>Summary {n}</description>
  <media:content medium="image" url="https://cdn.coindesk.com/{n}.jpg" type="image/jpeg"/>
  <category>Markets</category>
</item>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:media="http://search.yahoo.com/mrss/">
<channel>
  <title>CoinDesk: Bitcoin, Ethereum, Crypto News and Price Data</title>
  <link>https://www.coindesk.com</link>
  <description>Leader in cryptocurrency news</description>
  <language>en</language>
  {items}
</channel>
</rss>"#
    )
}

/// Cointelegraph-style feed: one item, plain guid, media:thumbnail only.
pub fn cointelegraph_feed() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
<channel>
  <title>Cointelegraph.com News</title>
  <link>https://cointelegraph.com</link>
  <description>Latest crypto news</description>
  <item>
    <title>Ether ETF inflows &amp; outflows</title>
    <link>https://cointelegraph.com/news/ether-etf</link>
    <guid>https://cointelegraph.com/news/ether-etf</guid>
    <pubDate>Tue, 15 Oct 2024 09:15:00 +0000</pubDate>
    <media:thumbnail url="https://images.cointelegraph.com/ether.jpg"/>
  </item>
</channel>
</rss>"#
        .to_string()
}

/// Decrypt-style feed: an item with missing fields and an item with text media.
pub fn decrypt_feed() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
<channel>
  <title>Decrypt</title>
  <link>https://decrypt.co</link>
  <description>Decrypt news</description>
  <item>
    <title>Solana update</title>
    <link>https://decrypt.co/solana</link>
    <pubDate>Mon, 14 Oct 2024 20:00:00 +0000</pubDate>
    <media:content>https://img.decrypt.co/solana.png</media:content>
    <enclosure url="https://img.decrypt.co/solana.png" length="1024" type="image/png"/>
  </item>
  <item>
    <link>https://decrypt.co/untitled</link>
  </item>
</channel>
</rss>"#
        .to_string()
}

/// Ten items with long titles, enough to push a full digest past one
/// Telegram message.
pub fn long_feed(name: &str) -> String {
    let filler = "Bitcoin rallies past resistance as ETF inflows grow ".repeat(8);
    let items: String = (1..=10)
        .map(|n| {
            format!(
                "<item><title>{name} {n} {filler}</title>\
                 <link>https://{name}.example/news/{n}</link>\
                 <pubDate>Tue, 15 Oct 2024 10:30:00 +0000</pubDate></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{name}</title>{items}</channel></rss>"#
    )
}

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn spawn_http(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serves canned bodies by URL and counts every fetch call.
pub struct StubFetcher {
    bodies: HashMap<String, (Duration, std::result::Result<String, String>)>,
    calls: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            calls: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Every default source answers with its fixture.
    pub fn healthy() -> Self {
        Self::new()
            .ok(COINDESK_URL, coindesk_feed())
            .ok(COINTELEGRAPH_URL, cointelegraph_feed())
            .ok(DECRYPT_URL, decrypt_feed())
    }

    pub fn ok(mut self, url: &str, body: impl Into<String>) -> Self {
        self.bodies
            .insert(url.to_string(), (Duration::ZERO, Ok(body.into())));
        self
    }

    pub fn delayed(mut self, url: &str, delay_ms: u64, body: impl Into<String>) -> Self {
        self.bodies.insert(
            url.to_string(),
            (Duration::from_millis(delay_ms), Ok(body.into())),
        );
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.bodies.insert(
            url.to_string(),
            (Duration::ZERO, Err("connection refused".to_string())),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl FeedFetcher for StubFetcher {
    fn fetch<'a>(&'a self, source: &'a FeedSource) -> BoxFuture<'a, Result<Vec<u8>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(source.url.clone());

        Box::pin(async move {
            match self.bodies.get(&source.url) {
                Some((delay, result)) => {
                    tokio::time::sleep(*delay).await;
                    result
                        .clone()
                        .map(String::into_bytes)
                        .map_err(NewsError::Fetch)
                }
                None => Err(NewsError::Fetch(format!("no stub for {}", source.url))),
            }
        })
    }
}

/// Aggregator over the default registry backed by `fetcher`.
pub fn aggregator(fetcher: Arc<StubFetcher>) -> Aggregator {
    Aggregator::new(Arc::new(FeedRegistry::new(default_sources())), fetcher)
}

/// One delivered message.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub options: SendOptions,
}

/// Records outgoing messages instead of calling the Bot API.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl MessageSender for RecordingSender {
    fn send_message<'a>(
        &'a self,
        chat_id: i64,
        text: &'a str,
        options: SendOptions,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.fail {
                return Err(NewsError::Telegram("sendMessage returned 502".to_string()));
            }
            self.sent.lock().unwrap().push(SentMessage {
                chat_id,
                text: text.to_string(),
                options,
            });
            Ok(())
        })
    }
}
