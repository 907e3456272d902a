//! In-process document store.
//!
//! Two collections behind `parking_lot` locks: session documents keyed by
//! session id with their event logs embedded, and an append-only page-visit
//! list. `append_event` re-checks the expected status under the write guard,
//! which is what makes the lifecycle engine's conditional transition atomic.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

use tracker_core::{
    PageVisit, PageVisitStore, Result, Session, SessionEvent, SessionStatus, SessionStore,
    SessionUpdate,
};

/// In-memory store implementing both collection traits.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Session>>,
    visits: RwLock<Vec<PageVisit>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of session documents. Test helper.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Number of page-visit documents. Test helper.
    pub fn visit_count(&self) -> usize {
        self.visits.read().len()
    }
}

fn matches(session: &Session, app: &str, expected: &[SessionStatus]) -> bool {
    session.app == app && expected.contains(&session.status)
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: Session) -> Result<()> {
        trace!(session_id = %session.session_id, "insert session");
        self.sessions
            .write()
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn find_for_transition(
        &self,
        session_id: &str,
        app: &str,
        expected: &[SessionStatus],
    ) -> Result<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .get(session_id)
            .filter(|session| matches(session, app, expected))
            .cloned())
    }

    async fn append_event(
        &self,
        session_id: &str,
        app: &str,
        expected: &[SessionStatus],
        event: SessionEvent,
        update: SessionUpdate,
    ) -> Result<Option<Session>> {
        let mut sessions = self.sessions.write();

        let Some(session) = sessions.get_mut(session_id) else {
            return Ok(None);
        };
        // Status re-check under the write guard: a transition that lost the
        // race sees None instead of appending a duplicate event.
        if !matches(session, app, expected) {
            return Ok(None);
        }

        session.events.push(event);
        session.status = update.status;
        if let Some(total) = update.total_active_time {
            session.total_active_time = total;
        }
        if update.ended_at.is_some() {
            session.ended_at = update.ended_at;
        }

        trace!(session_id = %session_id, status = session.status.as_str(), "append event");
        Ok(Some(session.clone()))
    }

    async fn find_by_app(&self, app: &str, user: Option<&str>) -> Result<Vec<Session>> {
        Ok(self
            .sessions
            .read()
            .values()
            .filter(|session| {
                session.app == app && user.map_or(true, |u| session.username == u)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PageVisitStore for MemoryStore {
    async fn insert(&self, visit: PageVisit) -> Result<()> {
        self.visits.write().push(visit);
        Ok(())
    }

    async fn find_by_app(&self, app: &str, user: Option<&str>) -> Result<Vec<PageVisit>> {
        Ok(self
            .visits
            .read()
            .iter()
            .filter(|visit| {
                visit.app == app && user.map_or(true, |u| visit.user_id.as_deref() == Some(u))
            })
            .cloned()
            .collect())
    }
}
