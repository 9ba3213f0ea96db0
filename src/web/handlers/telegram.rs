//! Telegram webhook handler.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::telegram::{answer_update, Update};
use crate::web::handlers::{AppState, BotState};
use crate::web::middleware::constant_time_eq;

/// Header Telegram echoes back with the configured webhook secret.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /api/telegram/webhook - Answer one chat update.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> (StatusCode, &'static str) {
    let Some(bot_state) = state.bot.as_ref() else {
        return (StatusCode::NOT_FOUND, "Not Found");
    };

    if !secret_matches(bot_state, &headers) {
        tracing::warn!(update_id = update.update_id, "Rejected webhook with bad secret token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    match answer_update(
        &bot_state.bot,
        bot_state.sender.as_ref(),
        &update,
        bot_state.disable_link_preview,
    )
    .await
    {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!(update_id = update.update_id, error = %e, "Failed to deliver bot reply");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal bot error")
        }
    }
}

fn secret_matches(bot_state: &BotState, headers: &HeaderMap) -> bool {
    let Some(expected) = bot_state.webhook_secret.as_deref() else {
        return true;
    };
    headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|given| constant_time_eq(given.as_bytes(), expected.as_bytes()))
}
