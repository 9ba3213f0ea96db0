//! Long-polling transport.

use std::sync::Arc;
use std::time::Duration;

use super::client::TelegramClient;
use super::dispatch::answer_update;
use crate::bot::NewsBot;
use crate::Result;

/// Pause after a failed `getUpdates` call.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Pulls updates with `getUpdates` and answers them one by one.
pub struct Poller {
    client: Arc<TelegramClient>,
    bot: Arc<NewsBot>,
    disable_link_preview: bool,
    timeout_secs: u64,
    offset: i64,
}

impl Poller {
    pub fn new(
        client: Arc<TelegramClient>,
        bot: Arc<NewsBot>,
        disable_link_preview: bool,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            bot,
            disable_link_preview,
            timeout_secs,
            offset: 0,
        }
    }

    /// Next `update_id` to ask for.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Fetch one batch of updates and answer each.
    ///
    /// The offset moves past every received update, answered or not, so a
    /// reply that cannot be delivered is not retried forever.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self.client.get_updates(self.offset, self.timeout_secs).await?;

        for update in &updates {
            self.offset = self.offset.max(update.update_id + 1);
            if let Err(e) = answer_update(
                &self.bot,
                self.client.as_ref(),
                update,
                self.disable_link_preview,
            )
            .await
            {
                tracing::error!(update_id = update.update_id, error = %e, "Failed to answer update");
            }
        }

        Ok(updates.len())
    }

    /// Poll until the task is dropped.
    pub async fn run(mut self) {
        if let Err(e) = self.client.delete_webhook().await {
            tracing::warn!(error = %e, "Failed to remove webhook before polling");
        }
        tracing::info!(timeout_secs = self.timeout_secs, "Polling Telegram for updates");

        loop {
            match self.poll_once().await {
                Ok(count) if count > 0 => {
                    tracing::debug!(count, offset = self.offset, "Answered update batch");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed, retrying in {:?}", RETRY_DELAY);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
