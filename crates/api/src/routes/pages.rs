//! Page visit handlers.

use axum::{extract::State, Json};
use std::time::Instant;
use telemetry::metrics;

use tracker_core::analytics::PageStatsResponse;
use tracker_core::service::TrackedPage;
use tracker_core::{AppScope, TrackPageRequest};

use crate::extractors::CurrentUser;
use crate::response::ApiError;
use crate::state::AppState;

/// POST /api/pages/track
///
/// Unauthenticated: visits arrive from page unload hooks that cannot carry
/// a token reliably.
pub async fn track_handler(
    State(state): State<AppState>,
    Json(request): Json<TrackPageRequest>,
) -> Result<Json<TrackedPage>, ApiError> {
    let start = Instant::now();

    let tracked = state.pages.track(&request).await?;

    metrics().page_visits_tracked.inc();
    metrics().request_latency_ms.observe(start.elapsed().as_millis() as u64);
    Ok(Json(tracked))
}

/// POST /api/pages/stats
pub async fn stats_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(scope): Json<AppScope>,
) -> Result<Json<PageStatsResponse>, ApiError> {
    Ok(Json(state.pages.stats(&scope).await?))
}
