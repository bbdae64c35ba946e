//! API Integration Tests
//!
//! Auth tests run against a server whose database is never touched. Event tests
//! need a PostgreSQL instance and skip themselves without `DATABASE_URL`.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_json, assert_status, fixtures::*, test_database_url, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_with_database() {
    let Some(url) = test_database_url() else {
        return;
    };

    let server = TestServer::start_with_database(&url).await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

async fn login(server: &TestServer) -> TokenPair {
    let response = server.post("/login", &LoginRequest::admin()).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

#[tokio::test]
async fn test_login_issues_pair() {
    let server = TestServer::start().await.unwrap();

    let pair = login(&server).await;

    assert_eq!(pair.token.split('.').count(), 3);
    assert_eq!(pair.refresh_token.len(), 64);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/login", &LoginRequest::wrong_password())
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(body.message, "Invalid username or password");
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let server = TestServer::start().await.unwrap();
    let first = login(&server).await;

    let response = server
        .post("/refresh", &RefreshRequest::new(&first.refresh_token))
        .await
        .unwrap();
    let second: TokenPair = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(second.refresh_token, first.refresh_token);

    let reused = server
        .post("/refresh", &RefreshRequest::new(&first.refresh_token))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(reused, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.code, "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_refresh_requires_token() {
    let server = TestServer::start().await.unwrap();

    let response = server.post("/refresh", &json!({})).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_refresh_has_one_winner() {
    let server = TestServer::start().await.unwrap();
    let pair = login(&server).await;

    let body = RefreshRequest::new(&pair.refresh_token);
    let attempts = (0..6).map(|_| server.post("/refresh", &body));
    let statuses: Vec<StatusCode> = join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap().status())
        .collect();

    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let forbidden = statuses.iter().filter(|s| **s == StatusCode::FORBIDDEN).count();
    assert_eq!(ok, 1);
    assert_eq!(forbidden, statuses.len() - 1);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let server = TestServer::start().await.unwrap();
    let pair = login(&server).await;

    let response = server
        .post("/logout", &RefreshRequest::new(&pair.refresh_token))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post("/refresh", &RefreshRequest::new(&pair.refresh_token))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Logging out again is still a success
    let response = server
        .post("/logout", &RefreshRequest::new(&pair.refresh_token))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/telegram-config").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/telegram-config", "not-a-jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_event_lifecycle() {
    let Some(url) = test_database_url() else {
        return;
    };
    let server = TestServer::start_with_database(&url).await.unwrap();
    let token = login(&server).await.token;

    let request = CreateEventRequest::unique("2031-03-04");
    let response = server.post_auth("/events", &token, &request).await.unwrap();
    let created: EventBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(created.title, request.title);
    assert_eq!(created.start, "2031-03-04");
    assert_eq!(created.end, "2031-03-04");
    assert_eq!(created.task_type, "bug");
    assert_eq!(created.status, "pending");

    let path = format!("/events/{}", created.id);
    let response = server
        .put_auth(&path, &token, &json!({ "status": "complete" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/events?statuses%5B%5D=complete", &token)
        .await
        .unwrap();
    let listed: Vec<EventBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(listed.iter().any(|e| e.id == created.id));

    let response = server.delete_auth(&path, &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.delete_auth(&path, &token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
