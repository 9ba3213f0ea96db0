//! Update handling shared by the webhook and polling transports.

use super::client::{MessageSender, SendOptions};
use super::types::Update;
use crate::bot::{split_message, NewsBot, TELEGRAM_MESSAGE_LIMIT};
use crate::Result;

/// Answer one update.
///
/// Updates without a text message are ignored. Long replies go out as
/// several messages, in order; the first failed send stops the rest.
pub async fn answer_update(
    bot: &NewsBot,
    sender: &dyn MessageSender,
    update: &Update,
    disable_link_preview: bool,
) -> Result<()> {
    let Some((chat_id, text)) = update.text_message() else {
        tracing::debug!(update_id = update.update_id, "Ignoring non-text update");
        return Ok(());
    };

    log_request(update, text);

    let reply = bot.handle_text(text).await;
    let options = SendOptions {
        html: reply.is_html(),
        disable_link_preview,
    };

    let chunks = split_message(&reply.text, TELEGRAM_MESSAGE_LIMIT);
    if chunks.len() > 1 {
        tracing::debug!(chat_id, chunks = chunks.len(), "Reply split into several messages");
    }

    for chunk in &chunks {
        sender.send_message(chat_id, chunk, options).await?;
    }
    Ok(())
}

fn log_request(update: &Update, text: &str) {
    let from = update.message.as_ref().and_then(|m| m.from.as_ref());
    tracing::info!(
        command = text,
        user_id = from.map(|u| u.id),
        username = from.and_then(|u| u.username.as_deref()),
        first_name = from.and_then(|u| u.first_name.as_deref()),
        last_name = from.and_then(|u| u.last_name.as_deref()),
        language = from.and_then(|u| u.language_code.as_deref()),
        "Bot request"
    );
}
