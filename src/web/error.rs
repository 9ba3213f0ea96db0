//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::NewsError;

/// Message for a missing or mismatched credential.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
/// Message when no feed source produced data.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to Fetch RSS";
/// Message for any other failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unauthorized (401).
    Unauthorized,
    /// Conflict (409).
    Conflict,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, UNAUTHORIZED_MESSAGE)
    }

    /// Create the error returned when every feed source failed.
    pub fn fetch_failed() -> Self {
        Self::new(ErrorCode::Conflict, FETCH_FAILED_MESSAGE)
    }

    /// Create an internal server error.
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, INTERNAL_ERROR_MESSAGE)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<NewsError> for ApiError {
    fn from(err: NewsError) -> Self {
        match &err {
            NewsError::NoData => {
                tracing::warn!("No feed source produced data");
                ApiError::fetch_failed()
            }
            NewsError::Auth(_) => ApiError::unauthorized(),
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_news_error() {
        let err = ApiError::from(NewsError::NoData);
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Failed to Fetch RSS");

        let err = ApiError::from(NewsError::Auth("bad key".to_string()));
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Unauthorized");

        let err = ApiError::from(NewsError::Parse("boom".to_string()));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: UNAUTHORIZED_MESSAGE.to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "Unauthorized"})
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::fetch_failed().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
