//! Token verification over HTTP with a real HS256 identity provider.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::{json, Value};

fn jwt_server() -> TestServer {
    TestServer::new(TestContext::with_jwt().router).expect("test server")
}

#[tokio::test]
async fn valid_token_is_accepted_end_to_end() {
    let server = jwt_server();
    let token = fixtures::signed_token(&json!({ "sub": "alice" }));

    let response = server
        .post("/api/auth/validate-token")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&fixtures::scope_body("all"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"], "alice");
    assert_eq!(body["message"], "Token is valid");
}

#[tokio::test]
async fn token_info_reports_the_resolved_user() {
    let server = jwt_server();
    let token = fixtures::signed_token(&json!({ "username": "bob" }));

    let response = server
        .post("/api/auth/token-info")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&fixtures::scope_body("all"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"], "bob");
    assert_eq!(body["payload"]["sub"], "bob");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let server = jwt_server();
    let token = fixtures::forged_token(&json!({ "sub": "mallory" }));

    let response = server
        .post("/api/sessions/start")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&fixtures::start_body("mallory", "2024-03-04T09:00:00Z"))
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_authorization_headers_are_401() {
    let server = jwt_server();

    // No Bearer prefix.
    let response = server
        .post("/api/auth/validate-token")
        .add_header("Authorization", "Token abc")
        .json(&fixtures::scope_body("all"))
        .await;
    assert_eq!(response.status_code(), 401);

    // Garbage token.
    let response = server
        .post("/api/auth/validate-token")
        .add_header("Authorization", "Bearer not.a.jwt")
        .json(&fixtures::scope_body("all"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn auth_health_is_public() {
    let server = jwt_server();

    let response = server
        .post("/api/auth/health")
        .json(&fixtures::scope_body("all"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "authentication");
    assert_eq!(body["app"], fixtures::APP);
}

#[tokio::test]
async fn lifecycle_works_with_a_real_token() {
    let server = jwt_server();
    let token = fixtures::signed_token(&json!({ "sub": "alice" }));

    let response = server
        .post("/api/sessions/start")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&fixtures::start_body("alice", "2024-03-04T09:00:00Z"))
        .await;
    response.assert_status_ok();
    let session_id = response.json::<Value>()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post("/api/sessions/end")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&fixtures::op_body("alice", &session_id, "2024-03-04T09:01:00Z"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total_active_time"], "PT1M");
}
