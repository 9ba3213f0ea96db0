//! HTTP surface: the aggregation endpoint, the bot webhook and a health check.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::{AppState, BotState};
pub use middleware::ApiKeyState;
pub use router::{create_app, create_health_router, create_router};
pub use server::WebServer;
