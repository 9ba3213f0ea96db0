use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use cryptonews::config::BotTransport;
use cryptonews::feed::{Aggregator, FeedRegistry, HttpFeedFetcher, NewsSource, RemoteFeeds};
use cryptonews::telegram::{Poller, TelegramClient};
use cryptonews::web::{AppState, BotState, WebServer};
use cryptonews::{Config, NewsBot};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = cryptonews::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        cryptonews::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("cryptonews - crypto news RSS aggregator");

    let registry = Arc::new(FeedRegistry::new(config.feeds.sources.clone()));
    let fetcher = match HttpFeedFetcher::new(&config.feeds) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            error!("Failed to create feed fetcher: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let aggregator = Aggregator::new(registry.clone(), fetcher);
    info!(sources = ?registry.names(), "Feed registry loaded");

    let mut app_state = AppState::new(aggregator.clone());
    if config.bot.enabled {
        let source: Arc<dyn NewsSource> =
            match (&config.bot.upstream_url, &config.bot.upstream_api_key) {
                (Some(url), Some(key)) => {
                    match RemoteFeeds::new(registry.clone(), url, key, &config.feeds) {
                        Ok(remote) => {
                            info!(upstream = %url, "Bot reads news from upstream feeds API");
                            Arc::new(remote)
                        }
                        Err(e) => {
                            error!("Failed to create upstream client: {}", e);
                            return ExitCode::FAILURE;
                        }
                    }
                }
                _ => Arc::new(aggregator),
            };
        let bot = Arc::new(NewsBot::from_shared(source, &config.bot.timezone));
        let client = Arc::new(TelegramClient::new(reqwest::Client::new(), &config.bot.token));

        match config.bot.transport {
            BotTransport::Webhook => {
                app_state = app_state.with_bot(BotState {
                    bot,
                    sender: client,
                    webhook_secret: config.bot.webhook_secret.clone(),
                    disable_link_preview: config.bot.disable_link_preview,
                });
                info!(timezone = %config.bot.timezone, "Telegram webhook enabled");
            }
            BotTransport::Polling => {
                let poller = Poller::new(
                    client,
                    bot,
                    config.bot.disable_link_preview,
                    config.bot.poll_timeout_secs,
                );
                tokio::spawn(poller.run());
                info!(timezone = %config.bot.timezone, "Telegram polling enabled");
            }
        }
    }

    let server = match WebServer::new(&config.server, app_state) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
