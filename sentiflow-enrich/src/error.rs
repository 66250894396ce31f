//! Error types for sentiflow-enrich

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400) - undecodable push envelope
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500) - enrichment or storage failure
    #[error("Internal server error: {0}")]
    Internal(String),

    /// sentiflow-common error
    #[error("Common error: {0}")]
    Common(#[from] sentiflow_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use sentiflow_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
            ApiError::Common(CommonError::Decode(msg)) => {
                (StatusCode::BAD_REQUEST, "DECODE_ERROR", msg)
            }
            ApiError::Common(CommonError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
