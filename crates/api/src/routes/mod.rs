//! API routes.

pub mod auth;
pub mod health;
pub mod pages;
pub mod sessions;

use axum::{routing::post, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
///
/// Every endpoint is POST and JSON. Lifecycle and analytics routes require a
/// bearer token; the public variants, page tracking, and health checks do not.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(health::root_handler))
        .route("/api/health", post(health::health_handler))
        .route("/api/auth/validate-token", post(auth::validate_token_handler))
        .route("/api/auth/token-info", post(auth::token_info_handler))
        .route("/api/auth/health", post(auth::health_handler))
        .route("/api/sessions/start", post(sessions::start_handler))
        .route("/api/sessions/pause", post(sessions::pause_handler))
        .route("/api/sessions/resume", post(sessions::resume_handler))
        .route("/api/sessions/end", post(sessions::end_handler))
        .route("/api/sessions/heatmap", post(sessions::heatmap_handler))
        .route("/api/sessions/most-active", post(sessions::most_active_handler))
        .route("/api/sessions/stats", post(sessions::stats_handler))
        .route("/api/sessions/summary", post(sessions::summary_handler))
        .route("/api/sessions/public-summary", post(sessions::public_summary_handler))
        .route("/api/sessions/timeline", post(sessions::timeline_handler))
        .route("/api/sessions/public-timeline", post(sessions::public_timeline_handler))
        .route("/api/sessions/daily-time-spent", post(sessions::daily_time_spent_handler))
        .route("/api/sessions/time-by-page", post(sessions::time_by_page_handler))
        .route(
            "/api/sessions/session-timeline-detail",
            post(sessions::timeline_detail_handler),
        )
        .route("/api/pages/track", post(pages::track_handler))
        .route("/api/pages/stats", post(pages::stats_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
