//! Error plumbing shared by services and the HTTP gateway.
//!
//! Service errors carry a grepable code; [`ApiError`] turns whatever a handler
//! hit into the gateway's JSON error body (`{"error": "..."}`).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Grepable error code and retryable flag for structured logging.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Error returned by gateway handlers.
///
/// `BadRequest` carries a user-facing message. `Upstream` carries the generic
/// message sent to the client; the underlying cause is logged where it is
/// converted, never echoed back.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Upstream(&'static str),
}

impl ApiError {
    /// Log a collaborator failure and collapse it into a generic 500.
    pub fn upstream<E: ErrorCode>(message: &'static str, err: &E) -> Self {
        tracing::warn!(code = err.error_code(), retryable = err.retryable(), error = %err, "{message}");
        Self::Upstream(message)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
