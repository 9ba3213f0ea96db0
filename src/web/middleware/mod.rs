//! Middleware for Web API.

pub mod auth;
pub mod cors;

pub use auth::{api_key_auth, constant_time_eq, ApiKeyAuth, ApiKeyState};
pub use cors::create_cors_layer;
