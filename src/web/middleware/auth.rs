//! Bearer API key authentication.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::error::ApiError;

/// Key expected in `Authorization: Bearer {key}`.
#[derive(Clone)]
pub struct ApiKeyState {
    api_key: String,
}

impl ApiKeyState {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Check an `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> bool {
        let expected = format!("Bearer {}", self.api_key);
        match header {
            Some(value) if !self.api_key.is_empty() => {
                constant_time_eq(value.as_bytes(), expected.as_bytes())
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for ApiKeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyState")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Extractor guarding handlers behind the API key.
///
/// Rejects with 401 before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyAuth;

impl<S> FromRequestParts<S> for ApiKeyAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let key_state = parts.extensions.get::<Arc<ApiKeyState>>().ok_or_else(|| {
                tracing::error!("API key state not configured");
                ApiError::internal()
            })?;

            let header = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            if !key_state.verify(header) {
                tracing::warn!(
                    path = %parts.uri.path(),
                    header_present = header.is_some(),
                    "Rejected request with missing or invalid API key"
                );
                return Err(ApiError::unauthorized());
            }

            Ok(ApiKeyAuth)
        })
    }
}

/// Middleware function to inject the API key state into request extensions.
pub async fn api_key_auth(
    key_state: Arc<ApiKeyState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(key_state);
    next.run(request).await
}

/// Compare two byte strings without an early exit on the first mismatch.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
