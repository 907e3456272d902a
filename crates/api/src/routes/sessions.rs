//! Session lifecycle and analytics handlers.
//!
//! Lifecycle endpoints drive the event-sourced state machine through the
//! session service; analytics endpoints are read-only aggregations over the
//! same store. The public summary and timeline variants skip authentication.

use axum::{extract::State, Json};
use std::time::Instant;
use telemetry::metrics;
use tracing::debug;

use tracker_core::analytics::{
    DailyTimeSpentResponse, HeatmapResponse, MostActiveResponse, StatsResponse, SummaryResponse,
    TimeByPageResponse, TimelineDetailResponse, TimelineResponse,
};
use tracker_core::service::{EndedSession, SessionTransition, StartedSession};
use tracker_core::{AppScope, SessionOperationRequest, StartSessionRequest};

use crate::extractors::CurrentUser;
use crate::response::ApiError;
use crate::state::AppState;

/// POST /api/sessions/start
pub async fn start_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<StartedSession>, ApiError> {
    let start = Instant::now();
    debug!(user = %user, app = %request.app, "session start requested");

    let started = state.sessions.start(&request).await?;

    metrics().sessions_started.inc();
    metrics().request_latency_ms.observe(start.elapsed().as_millis() as u64);
    Ok(Json(started))
}

/// POST /api/sessions/pause
pub async fn pause_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<SessionOperationRequest>,
) -> Result<Json<SessionTransition>, ApiError> {
    let start = Instant::now();

    let transition = state.sessions.pause(&request).await?;

    metrics().sessions_paused.inc();
    metrics().request_latency_ms.observe(start.elapsed().as_millis() as u64);
    Ok(Json(transition))
}

/// POST /api/sessions/resume
pub async fn resume_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<SessionOperationRequest>,
) -> Result<Json<SessionTransition>, ApiError> {
    let start = Instant::now();

    let transition = state.sessions.resume(&request).await?;

    metrics().sessions_resumed.inc();
    metrics().request_latency_ms.observe(start.elapsed().as_millis() as u64);
    Ok(Json(transition))
}

/// POST /api/sessions/end
pub async fn end_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<SessionOperationRequest>,
) -> Result<Json<EndedSession>, ApiError> {
    let start = Instant::now();

    let ended = state.sessions.end(&request).await?;

    metrics().sessions_ended.inc();
    metrics().request_latency_ms.observe(start.elapsed().as_millis() as u64);
    Ok(Json(ended))
}

/// POST /api/sessions/heatmap
pub async fn heatmap_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    Ok(Json(state.sessions.heatmap(&scope).await?))
}

/// POST /api/sessions/most-active
pub async fn most_active_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<MostActiveResponse>, ApiError> {
    Ok(Json(state.sessions.most_active(&scope).await?))
}

/// POST /api/sessions/stats
pub async fn stats_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<StatsResponse>, ApiError> {
    Ok(Json(state.sessions.stats(&scope).await?))
}

/// POST /api/sessions/summary
pub async fn summary_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<SummaryResponse>, ApiError> {
    Ok(Json(state.sessions.summary(&scope).await?))
}

/// POST /api/sessions/public-summary
///
/// Same aggregation as `/summary` but without authentication, for embedding
/// in dashboards that hold no credentials.
pub async fn public_summary_handler(
    State(state): State<AppState>,
    Json(scope): Json<AppScope>,
) -> Result<Json<SummaryResponse>, ApiError> {
    Ok(Json(state.sessions.summary(&scope).await?))
}

/// POST /api/sessions/timeline
pub async fn timeline_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<TimelineResponse>, ApiError> {
    Ok(Json(state.sessions.timeline(&scope).await?))
}

/// POST /api/sessions/public-timeline
pub async fn public_timeline_handler(
    State(state): State<AppState>,
    Json(scope): Json<AppScope>,
) -> Result<Json<TimelineResponse>, ApiError> {
    Ok(Json(state.sessions.timeline(&scope).await?))
}

/// POST /api/sessions/session-timeline-detail
pub async fn timeline_detail_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<TimelineDetailResponse>, ApiError> {
    Ok(Json(state.sessions.timeline_detail(&scope).await?))
}

/// POST /api/sessions/daily-time-spent
pub async fn daily_time_spent_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<DailyTimeSpentResponse>, ApiError> {
    Ok(Json(state.sessions.daily_time_spent(&scope).await?))
}

/// POST /api/sessions/time-by-page
pub async fn time_by_page_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<TimeByPageResponse>, ApiError> {
    Ok(Json(state.sessions.time_by_page(&scope).await?))
}
