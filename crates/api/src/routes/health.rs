//! Liveness handlers.

use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use tracker_core::AppScope;

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub app: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub app: String,
}

/// POST /
pub async fn root_handler(Json(scope): Json<AppScope>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Session and Page Tracking API is running!".into(),
        app: scope.app,
    })
}

/// POST /api/health
pub async fn health_handler(Json(scope): Json<AppScope>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".into(),
        message: "Server is running".into(),
        timestamp: Utc::now().naive_utc().to_string(),
        app: scope.app,
    })
}
