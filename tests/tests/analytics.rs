//! Analytics endpoints over HTTP: aggregation shapes, user filtering, and
//! the public variants.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

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

/// One ended session for alice (90s active) and one still-active session
/// for bob. Creation timestamps are server-assigned, so date-keyed
/// assertions are made against the single date present, not a literal.
async fn seed(server: &TestServer) {
    let response = post_authed(
        server,
        "/api/sessions/start",
        &fixtures::start_body("alice", "2024-03-04T09:00:00Z"),
    )
    .await;
    let session_id = response.json::<Value>()["session_id"]
        .as_str()
        .unwrap()
        .to_string();
    post_authed(
        server,
        "/api/sessions/end",
        &fixtures::op_body("alice", &session_id, "2024-03-04T09:01:30Z"),
    )
    .await
    .assert_status_ok();

    post_authed(
        server,
        "/api/sessions/start",
        &fixtures::start_body("bob", "2024-03-04T14:00:00Z"),
    )
    .await
    .assert_status_ok();
}

#[tokio::test]
async fn heatmap_grid_shape_and_counts() {
    let server = server();
    seed(&server).await;

    let response =
        post_authed(&server, "/api/sessions/heatmap", &fixtures::scope_body("all")).await;
    response.assert_status_ok();
    let body: Value = response.json();

    let data = &body["heatmap_data"];
    assert_eq!(data["total_sessions"], 2);
    assert_eq!(data["total_days_with_activity"], 1);

    // Both sessions land on the single (server-assigned) creation date.
    let daily = data["daily_sessions"].as_object().unwrap();
    assert_eq!(daily.len(), 1);
    let (date, count) = daily.iter().next().unwrap();
    assert_eq!(count.as_u64(), Some(2));
    assert_eq!(data["date_range"]["start_date"].as_str(), Some(date.as_str()));
    assert_eq!(data["date_range"]["end_date"].as_str(), Some(date.as_str()));

    // Full 7x24 grid, counting 2 sessions in total.
    let weekly = data["weekly_hourly"].as_object().unwrap();
    assert_eq!(weekly.len(), 7);
    let mut grid_total = 0u64;
    for hours in weekly.values() {
        let hours = hours.as_object().unwrap();
        assert_eq!(hours.len(), 24);
        grid_total += hours.values().map(|v| v.as_u64().unwrap()).sum::<u64>();
    }
    assert_eq!(grid_total, 2);
}

#[tokio::test]
async fn stats_and_summary_aggregate_all_users() {
    let server = server();
    seed(&server).await;

    let response = post_authed(&server, "/api/sessions/stats", &fixtures::scope_body("all")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_users"], 2);
    // 90 accrued seconds over two sessions: 0.75 minutes.
    assert_eq!(body["avg_session_time"], 0.75);

    let response =
        post_authed(&server, "/api/sessions/summary", &fixtures::scope_body("all")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_sessions"], 2);
    // Only alice's ended session has accrued time.
    assert_eq!(body["total_sessions_time_seconds"], 90);
    assert_eq!(body["total_sessions_time"], "PT1M30S");
}

#[tokio::test]
async fn timeline_filters_by_user() {
    let server = server();
    seed(&server).await;

    let response =
        post_authed(&server, "/api/sessions/timeline", &fixtures::scope_body("all")).await;
    assert_eq!(response.json::<Value>()["total_count"], 2);

    let response =
        post_authed(&server, "/api/sessions/timeline", &fixtures::scope_body("bob")).await;
    let body: Value = response.json();
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["sessions"][0]["username"], "bob");
}

#[tokio::test]
async fn most_active_and_daily_time() {
    let server = server();
    seed(&server).await;

    let response =
        post_authed(&server, "/api/sessions/most-active", &fixtures::scope_body("all")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["most_active_days"].as_array().unwrap().len(), 1);
    assert_eq!(body["most_active_days"][0]["count"], 2);
    assert!(body["most_active_days"][0]["date"].is_string());
    assert!(body["most_active_days"][0]["day"].is_string());

    let response = post_authed(
        &server,
        "/api/sessions/daily-time-spent",
        &fixtures::scope_body("alice"),
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_days"], 1);
    assert_eq!(body["daily_time"][0]["total_time_seconds"], 90);
    assert_eq!(body["daily_time"][0]["total_time_formatted"], "PT1M30S");
    assert_eq!(body["daily_time"][0]["total_time_minutes"], 1.5);
}

#[tokio::test]
async fn public_variants_work_without_a_token() {
    let server = server();
    seed(&server).await;

    let response = server
        .post("/api/sessions/public-summary")
        .json(&fixtures::scope_body("all"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total_sessions"], 2);

    let response = server
        .post("/api/sessions/public-timeline")
        .json(&fixtures::scope_body("all"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total_count"], 2);

    // The authenticated twins still demand a token.
    let response = server
        .post("/api/sessions/summary")
        .json(&fixtures::scope_body("all"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn empty_scope_returns_defaults_not_errors() {
    let server = server();

    let response =
        post_authed(&server, "/api/sessions/stats", &fixtures::scope_body("all")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_users"], 0);
    assert_eq!(body["avg_session_time"], 0.0);

    let response =
        post_authed(&server, "/api/sessions/heatmap", &fixtures::scope_body("all")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["heatmap_data"]["total_sessions"], 0);
}
