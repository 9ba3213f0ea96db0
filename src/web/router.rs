//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{get_all_feeds, telegram_webhook, AppState};
use super::middleware::{api_key_auth, create_cors_layer, ApiKeyState};

/// Create the main API router.
///
/// The webhook route exists only when the bot is enabled.
pub fn create_router(
    app_state: Arc<AppState>,
    key_state: Arc<ApiKeyState>,
    cors_origins: &[String],
) -> Router {
    let mut api_routes = Router::new().route("/feeds", get(get_all_feeds));

    if app_state.bot.is_some() {
        api_routes = api_routes.route("/telegram/webhook", post(telegram_webhook));
    }

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = key_state.clone();
                    api_key_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Full application: API routes plus the health check.
pub fn create_app(
    app_state: Arc<AppState>,
    key_state: Arc<ApiKeyState>,
    cors_origins: &[String],
) -> Router {
    create_router(app_state, key_state, cors_origins).merge(create_health_router())
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
