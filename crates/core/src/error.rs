//! Unified error types for the session tracker.
//!
//! The taxonomy matters to callers: validation failures (400) are rejected
//! before the lifecycle state machine runs, a missing session (wrong id,
//! wrong status, wrong app) is not-found (404), and store failures are
//! server errors (500). Handlers must never collapse these into one class.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the session tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request input (bad time string, empty user/session id).
    #[error("validation error: {0}")]
    Validation(String),

    /// No session matched the id + status + app triple.
    #[error("{0}")]
    NotFound(String),

    /// Bearer token could not be authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The document store failed.
    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Unauthorized(_) => 401,
            Self::Store(_) => 500,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }
}
