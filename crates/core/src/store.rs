//! Document-store interfaces the lifecycle engine and aggregator need.
//!
//! The backing database is an external collaborator; these traits are the
//! whole contract. Sessions live in one collection keyed by session id with
//! the event log embedded; page visits are an independent append-only
//! collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::page::PageVisit;
use crate::session::{Session, SessionEvent, SessionStatus};

/// Fields updated alongside an event append.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub status: SessionStatus,
    /// New accrued total; `None` leaves the stored total untouched (resume).
    pub total_active_time: Option<i64>,
    /// Server end timestamp; only set by the end operation.
    pub ended_at: Option<DateTime<Utc>>,
}

/// Session collection operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a freshly started session document.
    async fn insert(&self, session: Session) -> Result<()>;

    /// Find a session by id and app whose status is one of `expected`.
    async fn find_for_transition(
        &self,
        session_id: &str,
        app: &str,
        expected: &[SessionStatus],
    ) -> Result<Option<Session>>;

    /// Append an event and apply `update`, conditional on the session still
    /// holding one of the `expected` statuses at write time.
    ///
    /// Returns `None` when the precondition no longer holds: a concurrent
    /// transition won the race and the caller must report not-found rather
    /// than appending a duplicate event.
    async fn append_event(
        &self,
        session_id: &str,
        app: &str,
        expected: &[SessionStatus],
        event: SessionEvent,
        update: SessionUpdate,
    ) -> Result<Option<Session>>;

    /// All sessions for an app, optionally restricted to one user.
    async fn find_by_app(&self, app: &str, user: Option<&str>) -> Result<Vec<Session>>;
}

/// Page-visit collection operations.
#[async_trait]
pub trait PageVisitStore: Send + Sync {
    /// Append a visit record.
    async fn insert(&self, visit: PageVisit) -> Result<()>;

    /// All visits for an app, optionally restricted to one user.
    async fn find_by_app(&self, app: &str, user: Option<&str>) -> Result<Vec<PageVisit>>;
}
