//! Configuration module.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::feed::registry::{default_sources, validate_source_url, FeedSource};
use crate::{NewsError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Shared secret expected as `Authorization: Bearer <api_key>`.
    #[serde(default)]
    pub api_key: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            api_key: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// User agent sent to feed hosts.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Registered feed sources, in display order.
    #[serde(default = "default_sources")]
    pub sources: Vec<FeedSource>,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_user_agent() -> String {
    format!("cryptonews/{} (RSS aggregator)", env!("CARGO_PKG_VERSION"))
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            user_agent: default_user_agent(),
            sources: default_sources(),
        }
    }
}

/// How the bot receives Telegram updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotTransport {
    /// Telegram pushes updates to `POST /telegram/webhook`.
    #[default]
    Webhook,
    /// The bot long-polls `getUpdates`.
    Polling,
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Whether the bot runs at all.
    #[serde(default)]
    pub enabled: bool,
    /// Bot API access token.
    #[serde(default)]
    pub token: String,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Timezone used when rendering publish dates (e.g., "Europe/Moscow", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Suppress link previews in digest replies.
    #[serde(default = "default_disable_link_preview")]
    pub disable_link_preview: bool,
    #[serde(default)]
    pub transport: BotTransport,
    /// Long-poll timeout passed to `getUpdates`.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// Read digests from another instance's `/api/feeds` instead of
    /// fetching the feeds locally.
    #[serde(default)]
    pub upstream_url: Option<String>,
    /// Bearer key for `upstream_url`.
    #[serde(default)]
    pub upstream_api_key: Option<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_disable_link_preview() -> bool {
    true
}

fn default_poll_timeout() -> u64 {
    30
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            webhook_secret: None,
            timezone: default_timezone(),
            disable_link_preview: default_disable_link_preview(),
            transport: BotTransport::default(),
            poll_timeout_secs: default_poll_timeout(),
            upstream_url: None,
            upstream_api_key: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed fetching configuration.
    #[serde(default)]
    pub feeds: FeedsConfig,
    /// Telegram bot configuration.
    #[serde(default)]
    pub bot: BotConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NewsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CRYPTONEWS_API_KEY`: bearer secret for `/api/feeds`
    /// - `CRYPTONEWS_BOT_TOKEN`: Telegram bot token
    /// - `CRYPTONEWS_WEBHOOK_SECRET`: Telegram webhook secret token
    /// - `CRYPTONEWS_UPSTREAM_API_KEY`: bearer key for the upstream feeds API
    pub fn apply_env_overrides(&mut self) {
        if let Some(api_key) = non_empty_env("CRYPTONEWS_API_KEY") {
            self.server.api_key = api_key;
        }
        if let Some(token) = non_empty_env("CRYPTONEWS_BOT_TOKEN") {
            self.bot.token = token;
        }
        if let Some(secret) = non_empty_env("CRYPTONEWS_WEBHOOK_SECRET") {
            self.bot.webhook_secret = Some(secret);
        }
        if let Some(key) = non_empty_env("CRYPTONEWS_UPSTREAM_API_KEY") {
            self.bot.upstream_api_key = Some(key);
        }
    }

    /// Validate the configuration.
    ///
    /// Missing secrets and unusable feed sources are fatal at startup.
    pub fn validate(&self) -> Result<()> {
        if self.server.api_key.is_empty() {
            return Err(NewsError::Config(
                "api_key is not set. \
                 Set it in config.toml or via CRYPTONEWS_API_KEY environment variable."
                    .to_string(),
            ));
        }

        if self.bot.enabled && self.bot.token.is_empty() {
            return Err(NewsError::Config(
                "bot is enabled but token is not set. \
                 Set it in config.toml or via CRYPTONEWS_BOT_TOKEN environment variable."
                    .to_string(),
            ));
        }

        if let Some(upstream) = &self.bot.upstream_url {
            let url = url::Url::parse(upstream)
                .map_err(|e| NewsError::Config(format!("invalid upstream_url: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(NewsError::Config(format!(
                    "upstream_url must use http or https, got {}",
                    url.scheme()
                )));
            }
            if self.bot.upstream_api_key.as_deref().unwrap_or("").is_empty() {
                return Err(NewsError::Config(
                    "upstream_url is set but upstream_api_key is not. \
                     Set it in config.toml or via CRYPTONEWS_UPSTREAM_API_KEY environment variable."
                        .to_string(),
                ));
            }
        }

        if self.bot.poll_timeout_secs == 0 && self.bot.transport == BotTransport::Polling {
            return Err(NewsError::Config(
                "poll_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.bot.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(NewsError::Config(format!(
                "unknown timezone: {}",
                self.bot.timezone
            )));
        }

        if self.feeds.sources.is_empty() {
            return Err(NewsError::Config("no feed sources configured".to_string()));
        }

        let mut seen = HashSet::new();
        for source in &self.feeds.sources {
            if !seen.insert(source.name.to_lowercase()) {
                return Err(NewsError::Config(format!(
                    "duplicate feed source name: {}",
                    source.name
                )));
            }
            validate_source_url(&source.url)
                .map_err(|e| NewsError::Config(format!("feed source {}: {e}", source.name)))?;
        }

        for warning in self.warnings() {
            tracing::warn!("{warning}");
        }

        Ok(())
    }

    /// Settings that are accepted but probably not intended.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.bot.enabled && self.bot.transport == BotTransport::Webhook {
            let secret_missing = self.bot.webhook_secret.as_deref().unwrap_or("").is_empty();
            if secret_missing {
                warnings.push(
                    "bot webhook is enabled without webhook_secret; \
                     anyone who knows the URL can post updates. \
                     Set it in config.toml or via CRYPTONEWS_WEBHOOK_SECRET environment variable."
                        .to_string(),
                );
            }
        }

        warnings
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
