//! Request bodies for the tracking API.
//!
//! Validation runs here, before any operation touches the state machine or
//! the store: blank identifiers and malformed time strings are 400s, never
//! lifecycle outcomes.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{Error, Result};
use crate::timefmt::validate_client_time;

fn non_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Collapse validator output into a single validation error message.
pub fn check<T: Validate>(request: &T) -> Result<()> {
    request.validate().map_err(|e| {
        let detail = e
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let codes: Vec<&str> = errors.iter().map(|err| err.code.as_ref()).collect();
                format!("{field}: {}", codes.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");
        Error::validation(detail)
    })
}

/// Body for `POST /api/sessions/start`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(custom(function = "non_blank"))]
    pub user: String,
    /// Client-claimed wall-clock time.
    #[validate(custom(function = "validate_client_time"))]
    pub time: String,
    /// Accepted for wire compatibility; a new session is always active.
    #[serde(default)]
    pub status: Option<String>,
    pub app: String,
}

/// Body for pause / resume / end.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionOperationRequest {
    #[validate(custom(function = "non_blank"))]
    pub user: String,
    #[validate(custom(function = "non_blank"))]
    pub session_id: String,
    #[validate(custom(function = "validate_client_time"))]
    pub time: String,
    pub app: String,
}

/// Body for `POST /api/pages/track`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackPageRequest {
    #[validate(custom(function = "non_blank"))]
    pub user: String,
    pub page: String,
    /// Time spent in whole seconds.
    pub timespent: i64,
    pub app: String,
}

/// Body for all analytics reads: app id plus an optional user filter.
///
/// A user value that case-insensitively equals "all" disables the user
/// filter; the app filter always applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppScope {
    pub app: String,
    #[serde(default)]
    pub user: Option<String>,
}

impl AppScope {
    /// The effective user filter, with the "all" sentinel resolved away.
    pub fn user_filter(&self) -> Option<&str> {
        match self.user.as_deref() {
            Some(user) if !user.eq_ignore_ascii_case("all") => Some(user),
            _ => None,
        }
    }
}
