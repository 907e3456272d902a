//! Client time-string parsing and ISO-8601 duration formatting.
//!
//! Clients report wall-clock times as `YYYY-MM-DDTHH:MM:SS[.sss][Z]`, with
//! milliseconds and the trailing `Z` both optional. Anything else is a
//! validation failure and never reaches the lifecycle engine.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

use crate::error::{Error, Result};

/// Accepted client time format.
pub const CLIENT_TIME_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z?$";

/// Compiled time-format regex (lazy initialization).
static CLIENT_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CLIENT_TIME_PATTERN).expect("invalid client time pattern"));

/// Check whether a client-supplied time string matches the accepted format.
pub fn is_valid_client_time(time: &str) -> bool {
    !time.is_empty() && CLIENT_TIME_REGEX.is_match(time)
}

/// Validate and parse a client-supplied time string.
///
/// The trailing `Z` is stripped before parsing; the value is treated as a
/// naive wall-clock time exactly as the client claimed it.
pub fn parse_client_time(time: &str) -> Result<NaiveDateTime> {
    if time.is_empty() {
        return Err(Error::validation("Time string cannot be empty"));
    }

    if !is_valid_client_time(time) {
        return Err(Error::validation(format!(
            "Invalid time format. Expected ISO 8601 format (YYYY-MM-DDTHH:mm:ss.sssZ), got: {time}"
        )));
    }

    let clean = time.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(clean, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| Error::validation(format!("Failed to parse time string '{time}': {e}")))
}

/// `validator` adapter for request-body time fields.
pub fn validate_client_time(time: &str) -> std::result::Result<(), ValidationError> {
    if is_valid_client_time(time) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_time_format"))
    }
}

/// Convert whole seconds to an ISO 8601 duration string.
///
/// The seconds component is always present when hours and minutes are both
/// zero, so 0 renders as "PT0S" and 3665 as "PT1H1M5S".
pub fn seconds_to_iso_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut duration = String::from("PT");
    if hours != 0 {
        duration.push_str(&format!("{hours}H"));
    }
    if minutes != 0 {
        duration.push_str(&format!("{minutes}M"));
    }
    if secs != 0 || (hours == 0 && minutes == 0) {
        duration.push_str(&format!("{secs}S"));
    }
    duration
}

/// Round to two decimal places. Used for minute and mean-time fields.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
