//! Page visit documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An append-only record of time spent on a page.
///
/// Independent of sessions; no referential checks against the app id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageVisit {
    pub page: String,
    /// Time spent in whole seconds.
    pub timespent: i64,
    /// Server-assigned timestamp.
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub app: String,
}

impl PageVisit {
    /// Creates a visit record stamped with the current server time.
    pub fn record(
        page: impl Into<String>,
        timespent: i64,
        user_id: Option<String>,
        app: impl Into<String>,
    ) -> Self {
        Self {
            page: page.into(),
            timespent,
            timestamp: Utc::now(),
            user_id,
            app: app.into(),
        }
    }
}
