//! Session and page services.
//!
//! Explicitly constructed service objects holding store handles; all
//! handlers receive these through shared state rather than module globals.
//! Every mutation validates its request first, then consults the state
//! machine through the store's conditional-append primitive.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::analytics::{
    self, DailyTimeSpentResponse, HeatmapResponse, MostActiveResponse, PageStatsResponse,
    StatsResponse, SummaryResponse, TimeByPageResponse, TimelineDetailResponse, TimelineResponse,
};
use crate::error::{Error, Result};
use crate::page::PageVisit;
use crate::request::{check, AppScope, SessionOperationRequest, StartSessionRequest, TrackPageRequest};
use crate::session::{Session, SessionEvent, SessionStatus};
use crate::store::{PageVisitStore, SessionStore, SessionUpdate};
use crate::timefmt::{parse_client_time, seconds_to_iso_duration};

/// Result of starting a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedSession {
    pub session_id: String,
    pub user_id: String,
    pub start_time: NaiveDateTime,
    pub message: String,
}

/// Result of a pause or resume transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTransition {
    pub session_id: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
}

/// Result of ending a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndedSession {
    pub session_id: String,
    pub user_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Accrued active time as an ISO 8601 duration.
    pub total_active_time: String,
    pub message: String,
}

/// Result of tracking a page visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedPage {
    pub message: String,
    pub page: String,
    pub timespent: i64,
    pub timestamp: DateTime<Utc>,
}

/// Session lifecycle engine plus the read-side aggregator.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionStore>,
    pages: Arc<dyn PageVisitStore>,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionStore>, pages: Arc<dyn PageVisitStore>) -> Self {
        Self { sessions, pages }
    }

    /// Start a new session. Always succeeds for valid input.
    pub async fn start(&self, request: &StartSessionRequest) -> Result<StartedSession> {
        check(request)?;
        let start_time = parse_client_time(&request.time)?;

        let session = Session::start(request.user.trim(), &request.app, start_time, &request.time);
        let session_id = session.session_id.clone();

        self.sessions.insert(session).await?;

        info!(session_id = %session_id, app = %request.app, "session started");

        Ok(StartedSession {
            session_id,
            user_id: request.user.trim().to_string(),
            start_time,
            message: "Session started successfully".into(),
        })
    }

    /// Pause an active session, recomputing accrued active time.
    pub async fn pause(&self, request: &SessionOperationRequest) -> Result<SessionTransition> {
        check(request)?;
        let timestamp = parse_client_time(&request.time)?;

        let expected = [SessionStatus::Active];
        let session = self
            .find_or_not_found(request, &expected, "No active session found with the provided session ID")
            .await?;

        let event = SessionEvent::new(SessionStatus::Paused, timestamp, &request.time);
        let total = session.active_seconds_with(&event);

        self.transition(
            request,
            &expected,
            event,
            SessionUpdate {
                status: SessionStatus::Paused,
                total_active_time: Some(total),
                ended_at: None,
            },
            "No active session found with the provided session ID",
        )
        .await?;

        debug!(session_id = %request.session_id, total_active_time = total, "session paused");

        Ok(SessionTransition {
            session_id: request.session_id.clone(),
            message: "Session paused successfully".into(),
            timestamp,
        })
    }

    /// Resume a paused session. Accrued time is unchanged until the next
    /// pause or end closes the interval opened here.
    pub async fn resume(&self, request: &SessionOperationRequest) -> Result<SessionTransition> {
        check(request)?;
        let timestamp = parse_client_time(&request.time)?;

        let expected = [SessionStatus::Paused];
        self.find_or_not_found(request, &expected, "No paused session found with the provided session ID")
            .await?;

        let event = SessionEvent::new(SessionStatus::Active, timestamp, &request.time);

        self.transition(
            request,
            &expected,
            event,
            SessionUpdate {
                status: SessionStatus::Active,
                total_active_time: None,
                ended_at: None,
            },
            "No paused session found with the provided session ID",
        )
        .await?;

        debug!(session_id = %request.session_id, "session resumed");

        Ok(SessionTransition {
            session_id: request.session_id.clone(),
            message: "Session resumed successfully".into(),
            timestamp,
        })
    }

    /// End an active or paused session. Terminal: no transition leaves Ended.
    pub async fn end(&self, request: &SessionOperationRequest) -> Result<EndedSession> {
        check(request)?;
        let end_time = parse_client_time(&request.time)?;

        let expected = [SessionStatus::Active, SessionStatus::Paused];
        let not_found = "No active or paused session found with the provided session ID";
        let session = self.find_or_not_found(request, &expected, not_found).await?;

        let event = SessionEvent::new(SessionStatus::Ended, end_time, &request.time);
        let total = session.active_seconds_with(&event);

        self.transition(
            request,
            &expected,
            event,
            SessionUpdate {
                status: SessionStatus::Ended,
                total_active_time: Some(total),
                ended_at: Some(Utc::now()),
            },
            not_found,
        )
        .await?;

        let start_time = session
            .start_time()
            .ok_or_else(|| Error::internal("session event log is empty"))?;

        info!(
            session_id = %request.session_id,
            app = %request.app,
            total_active_time = total,
            "session ended"
        );

        Ok(EndedSession {
            session_id: request.session_id.clone(),
            user_id: session.username,
            start_time,
            end_time,
            total_active_time: seconds_to_iso_duration(total),
            message: "Session ended successfully".into(),
        })
    }

    async fn find_or_not_found(
        &self,
        request: &SessionOperationRequest,
        expected: &[SessionStatus],
        message: &str,
    ) -> Result<Session> {
        self.sessions
            .find_for_transition(request.session_id.trim(), &request.app, expected)
            .await?
            .ok_or_else(|| Error::not_found(message))
    }

    async fn transition(
        &self,
        request: &SessionOperationRequest,
        expected: &[SessionStatus],
        event: SessionEvent,
        update: SessionUpdate,
        message: &str,
    ) -> Result<Session> {
        // The store re-checks the expected status at write time; a concurrent
        // transition that got there first surfaces as not-found here instead
        // of a duplicated event.
        self.sessions
            .append_event(request.session_id.trim(), &request.app, expected, event, update)
            .await?
            .ok_or_else(|| Error::not_found(message))
    }

    // -- Read side -----------------------------------------------------------

    pub async fn heatmap(&self, scope: &AppScope) -> Result<HeatmapResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::heatmap(&sessions))
    }

    pub async fn most_active(&self, scope: &AppScope) -> Result<MostActiveResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::most_active(&sessions))
    }

    pub async fn stats(&self, scope: &AppScope) -> Result<StatsResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::stats(&sessions))
    }

    pub async fn summary(&self, scope: &AppScope) -> Result<SummaryResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::summary(&sessions))
    }

    pub async fn timeline(&self, scope: &AppScope) -> Result<TimelineResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::timeline(&sessions))
    }

    pub async fn timeline_detail(&self, scope: &AppScope) -> Result<TimelineDetailResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::timeline_detail(&sessions))
    }

    pub async fn daily_time_spent(&self, scope: &AppScope) -> Result<DailyTimeSpentResponse> {
        let sessions = self.fetch(scope).await?;
        Ok(analytics::daily_time_spent(&sessions))
    }

    pub async fn time_by_page(&self, scope: &AppScope) -> Result<TimeByPageResponse> {
        let visits = self.pages.find_by_app(&scope.app, scope.user_filter()).await?;
        Ok(analytics::time_by_page(&visits))
    }

    async fn fetch(&self, scope: &AppScope) -> Result<Vec<Session>> {
        self.sessions.find_by_app(&scope.app, scope.user_filter()).await
    }
}

/// Page visit recorder.
#[derive(Clone)]
pub struct PageService {
    pages: Arc<dyn PageVisitStore>,
}

impl PageService {
    pub fn new(pages: Arc<dyn PageVisitStore>) -> Self {
        Self { pages }
    }

    /// Append a visit with a server-assigned timestamp.
    pub async fn track(&self, request: &TrackPageRequest) -> Result<TrackedPage> {
        check(request)?;

        let visit = PageVisit::record(
            &request.page,
            request.timespent,
            Some(request.user.trim().to_string()),
            &request.app,
        );
        let tracked = TrackedPage {
            message: "Page visit tracked successfully".into(),
            page: visit.page.clone(),
            timespent: visit.timespent,
            timestamp: visit.timestamp,
        };

        self.pages.insert(visit).await?;

        debug!(page = %request.page, app = %request.app, "page visit tracked");

        Ok(tracked)
    }

    /// Per-page visit counts and mean durations.
    pub async fn stats(&self, scope: &AppScope) -> Result<PageStatsResponse> {
        let visits = self.pages.find_by_app(&scope.app, scope.user_filter()).await?;
        Ok(analytics::page_stats(&visits))
    }
}
