//! Status code taxonomy: 400 for malformed input, 404 for lifecycle
//! mismatches, 401 for credential failures, 500 for store failures.
//! Each class must stay distinct.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::{json, Value};

fn server() -> TestServer {
    TestServer::new(TestContext::new().router).expect("test server")
}

async fn post_authed(server: &TestServer, path: &str, body: &Value) -> axum_test::TestResponse {
    server
        .post(path)
        .add_header("Authorization", format!("Bearer {}", fixtures::ANY_TOKEN))
        .json(body)
        .await
}

#[tokio::test]
async fn blank_user_is_400() {
    let server = server();
    let response = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("   ", "2024-03-04T09:00:00Z"),
    )
    .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "VALIDATION");
}

#[tokio::test]
async fn malformed_time_is_400_not_404() {
    let server = server();
    let response = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "yesterday at nine"),
    )
    .await;
    assert_eq!(response.status_code(), 400);

    // Malformed time on an operation is still a 400, even though the
    // session does not exist either.
    let response = post_authed(
        &server,
        "/api/sessions/pause",
        &fixtures::op_body("alice", "no-such-session", "yesterday at nine"),
    )
    .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let server = server();
    let response = post_authed(
        &server,
        "/api/sessions/pause",
        &fixtures::op_body("alice", "no-such-session", "2024-03-04T09:00:00Z"),
    )
    .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "No active session found with the provided session ID");
}

#[tokio::test]
async fn wrong_app_is_404() {
    let server = server();
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

    let mut body = fixtures::op_body("alice", &session_id, "2024-03-04T09:01:00Z");
    body["app"] = json!("some-other-app");
    let response = post_authed(&server, "/api/sessions/end", &body).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn missing_token_is_401() {
    let server = server();
    let response = server
        .post("/api/sessions/start")
        .json(&fixtures::start_body("alice", "2024-03-04T09:00:00Z"))
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn store_failure_is_500() {
    let ctx = TestContext::with_failing_store();
    let server = TestServer::new(ctx.router).expect("test server");

    let response = post_authed(
        &server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "2024-03-04T09:00:00Z"),
    )
    .await;
    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<Value>()["code"], "STORE");

    // Unauthenticated tracking hits the failing store too.
    let response = server
        .post("/api/pages/track")
        .json(&fixtures::track_body("alice", "/home", 12))
        .await;
    assert_eq!(response.status_code(), 500);
}
