//! End-to-end session lifecycle over HTTP.
//!
//! Drives the full stack: axum router with middleware, services, and the
//! in-memory store. Only the identity provider is fixed.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

fn server() -> (TestServer, TestContext) {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("test server");
    (server, ctx)
}

async fn post_authed(server: &TestServer, path: &str, body: &Value) -> axum_test::TestResponse {
    server
        .post(path)
        .add_header("Authorization", format!("Bearer {}", fixtures::ANY_TOKEN))
        .json(body)
        .await
}

#[tokio::test]
async fn full_lifecycle_over_http() {
    let (server, ctx) = server();

    let response = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "2024-03-04T09:00:00Z"),
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Session started successfully");
    assert_eq!(body["user_id"], "alice");
    let session_id = body["session_id"].as_str().expect("session_id").to_string();
    assert_eq!(ctx.store.session_count(), 1);

    let response = post_authed(
        &server,
        "/api/sessions/pause",
        &fixtures::op_body("alice", &session_id, "2024-03-04T09:00:30Z"),
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Session paused successfully");

    let response = post_authed(
        &server,
        "/api/sessions/resume",
        &fixtures::op_body("alice", &session_id, "2024-03-04T09:01:00Z"),
    )
    .await;
    response.assert_status_ok();

    let response = post_authed(
        &server,
        "/api/sessions/end",
        &fixtures::op_body("alice", &session_id, "2024-03-04T09:02:00Z"),
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Session ended successfully");
    // 30s before the pause plus 60s after the resume.
    assert_eq!(body["total_active_time"], "PT1M30S");
    assert_eq!(body["session_id"], session_id.as_str());
}

#[tokio::test]
async fn start_then_immediate_end() {
    let (server, _ctx) = server();

    let response = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "2024-03-04T09:00:00Z"),
    )
    .await;
    let session_id = response.json::<Value>()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_authed(
        &server,
        "/api/sessions/end",
        &fixtures::op_body("alice", &session_id, "2024-03-04T09:00:05Z"),
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total_active_time"], "PT5S");
}

#[tokio::test]
async fn ended_session_rejects_further_transitions() {
    let (server, _ctx) = server();

    let response = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "2024-03-04T09:00:00Z"),
    )
    .await;
    let session_id = response.json::<Value>()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    post_authed(
        &server,
        "/api/sessions/end",
        &fixtures::op_body("alice", &session_id, "2024-03-04T09:00:10Z"),
    )
    .await
    .assert_status_ok();

    for path in ["/api/sessions/pause", "/api/sessions/resume", "/api/sessions/end"] {
        let response = post_authed(
            &server,
            path,
            &fixtures::op_body("alice", &session_id, "2024-03-04T09:00:20Z"),
        )
        .await;
        assert_eq!(response.status_code(), 404, "{path}");
    }
}

#[tokio::test]
async fn concurrent_sessions_are_independent() {
    let (server, ctx) = server();

    let first = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "2024-03-04T09:00:00Z"),
    )
    .await
    .json::<Value>()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let second = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("bob", "2024-03-04T10:00:00Z"),
    )
    .await
    .json::<Value>()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    assert_ne!(first, second);
    assert_eq!(ctx.store.session_count(), 2);

    // Pausing one leaves the other active.
    post_authed(
        &server,
        "/api/sessions/pause",
        &fixtures::op_body("alice", &first, "2024-03-04T09:00:30Z"),
    )
    .await
    .assert_status_ok();

    post_authed(
        &server,
        "/api/sessions/end",
        &fixtures::op_body("bob", &second, "2024-03-04T10:01:00Z"),
    )
    .await
    .assert_status_ok();
}
