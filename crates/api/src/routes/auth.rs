//! Token inspection handlers.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use tracker_core::AppScope;

use crate::extractors::CurrentUser;
use crate::response::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenValidationResponse {
    pub valid: bool,
    pub user: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub user: String,
    pub payload: Value,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthHealthResponse {
    pub status: String,
    pub service: String,
    pub message: String,
    pub app: String,
}

/// POST /api/auth/validate-token
pub async fn validate_token_handler(
    CurrentUser(user): CurrentUser,
    Json(_scope): Json<AppScope>,
) -> Result<Json<TokenValidationResponse>, ApiError> {
    Ok(Json(TokenValidationResponse {
        valid: true,
        user,
        message: "Token is valid".into(),
    }))
}

/// POST /api/auth/token-info
pub async fn token_info_handler(
    CurrentUser(user): CurrentUser,
    Json(_scope): Json<AppScope>,
) -> Result<Json<TokenInfoResponse>, ApiError> {
    let payload = json!({ "sub": user });
    Ok(Json(TokenInfoResponse {
        user,
        payload,
        message: "Token information retrieved successfully".into(),
    }))
}

/// POST /api/auth/health
///
/// Public: reports the auth seam as reachable without requiring a token.
pub async fn health_handler(Json(scope): Json<AppScope>) -> Json<AuthHealthResponse> {
    Json(AuthHealthResponse {
        status: "healthy".into(),
        service: "authentication".into(),
        message: "Auth service is running".into(),
        app: scope.app,
    })
}
