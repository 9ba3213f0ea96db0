//! Feed aggregation handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::feed::ChannelEnvelope;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::ApiKeyAuth;

/// GET /api/feeds - Aggregate every registered source.
///
/// Returns the successful channels in registry order.
pub async fn get_all_feeds(
    State(state): State<Arc<AppState>>,
    _auth: ApiKeyAuth,
) -> Result<Json<Vec<ChannelEnvelope>>, ApiError> {
    let channels = state.aggregator.channels().await?;
    tracing::debug!(channels = channels.len(), "Serving aggregated feeds");
    Ok(Json(channels))
}
