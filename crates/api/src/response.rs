//! Standardized API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use telemetry::metrics;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error type mapping the core taxonomy onto HTTP statuses.
///
/// Not-found must stay distinct from validation failures: a wrong session
/// reference is a 404, malformed input is a 400, and only genuine store or
/// internal failures are 500s.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                code: code.into(),
            },
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "VALIDATION", msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NOT_FOUND, "NOT_FOUND", msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<tracker_core::Error> for ApiError {
    fn from(err: tracker_core::Error) -> Self {
        use tracker_core::Error;

        match &err {
            Error::Validation(msg) => {
                metrics().validation_failures.inc();
                ApiError::bad_request(msg)
            }
            Error::NotFound(msg) => {
                metrics().not_found_responses.inc();
                ApiError::not_found(msg)
            }
            Error::Unauthorized(msg) => {
                metrics().auth_failures.inc();
                ApiError::unauthorized(msg)
            }
            Error::Store(msg) => {
                ApiError::with_code(StatusCode::INTERNAL_SERVER_ERROR, "STORE", msg)
            }
            Error::Serialization(_) => {
                metrics().validation_failures.inc();
                ApiError::bad_request(err.to_string())
            }
            Error::Internal(msg) => ApiError::internal(msg),
        }
    }
}
