//! Liveness endpoints.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

fn server() -> TestServer {
    TestServer::new(TestContext::new().router).expect("test server")
}

#[tokio::test]
async fn root_reports_the_service_running() {
    let server = server();

    let response = server.post("/").json(&fixtures::scope_body("all")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Session and Page Tracking API is running!");
    assert_eq!(body["app"], fixtures::APP);
}

#[tokio::test]
async fn health_carries_a_timestamp() {
    let server = server();

    let response = server
        .post("/api/health")
        .json(&fixtures::scope_body("all"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Server is running");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["app"], fixtures::APP);
}
