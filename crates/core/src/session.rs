//! Session documents and the active-time accrual engine.
//!
//! A session is an event-sourced state machine over {Active, Paused, Ended}.
//! Accrued active time is never maintained incrementally: every pause/end
//! replays the full event log, so the stored total is always derivable from
//! the immutable history alone.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle status. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Ended => "ended",
        }
    }
}

/// An immutable status-transition record.
///
/// `timestamp` is the parsed client-claimed time and is what the accrual
/// replay arithmetic runs on; `event_time` preserves the raw client string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub timestamp: NaiveDateTime,
    pub status: SessionStatus,
    pub event_time: String,
}

impl SessionEvent {
    pub fn new(status: SessionStatus, timestamp: NaiveDateTime, event_time: impl Into<String>) -> Self {
        Self {
            timestamp,
            status,
            event_time: event_time.into(),
        }
    }
}

/// A session document with its embedded event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
    /// Accrued active time in whole seconds.
    #[serde(default)]
    pub total_active_time: i64,
    pub status: SessionStatus,
    pub app: String,
}

impl Session {
    /// Creates a new session in Active state with its opening event.
    ///
    /// The event log invariant starts here: every session begins with
    /// exactly one Active event at the client-claimed start time.
    pub fn start(
        username: impl Into<String>,
        app: impl Into<String>,
        start_time: NaiveDateTime,
        event_time: impl Into<String>,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            username: username.into(),
            created_at: Utc::now(),
            ended_at: None,
            events: vec![SessionEvent::new(SessionStatus::Active, start_time, event_time)],
            total_active_time: 0,
            status: SessionStatus::Active,
            app: app.into(),
        }
    }

    /// Client-claimed start time (the first event's timestamp).
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.events.first().map(|e| e.timestamp)
    }

    /// Replays this session's log plus one pending event.
    pub fn active_seconds_with(&self, pending: &SessionEvent) -> i64 {
        let mut total = active_seconds(&self.events);
        // Fold the pending event into the replay without cloning the log.
        match pending.status {
            SessionStatus::Active => {}
            SessionStatus::Paused | SessionStatus::Ended => {
                if let Some(open) = open_interval_start(&self.events) {
                    total += (pending.timestamp - open).num_seconds();
                }
            }
        }
        total
    }
}

/// Replay an event log and compute accrued active time in whole seconds.
///
/// An Active event opens (or silently restarts) an interval; a Paused or
/// Ended event closes an open interval, adding its signed length truncated
/// toward zero; Paused/Ended with nothing open contributes nothing.
/// Out-of-order client times are not clamped, so a closed interval can
/// subtract from the total.
pub fn active_seconds(events: &[SessionEvent]) -> i64 {
    let mut total = 0i64;
    let mut open_start: Option<NaiveDateTime> = None;

    for event in events {
        match event.status {
            SessionStatus::Active => {
                open_start = Some(event.timestamp);
            }
            SessionStatus::Paused | SessionStatus::Ended => {
                if let Some(start) = open_start.take() {
                    total += (event.timestamp - start).num_seconds();
                }
            }
        }
    }

    total
}

/// The start of the currently open Active interval, if any.
fn open_interval_start(events: &[SessionEvent]) -> Option<NaiveDateTime> {
    let mut open_start = None;
    for event in events {
        match event.status {
            SessionStatus::Active => open_start = Some(event.timestamp),
            SessionStatus::Paused | SessionStatus::Ended => open_start = None,
        }
    }
    open_start
}
