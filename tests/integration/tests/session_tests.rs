//! Client session manager against the real server
//!
//! Run with: cargo test -p integration-tests --test session_tests

use std::sync::Arc;

use cal_client::{
    FileTokenStorage, InitialAuthState, MemoryTokenStorage, NoopUi, SessionConfig, SessionManager,
    StoredTokens, TokenStorage,
};
use integration_tests::{TestServer, ADMIN_PASSWORD, ADMIN_USERNAME};
use reqwest::{Method, StatusCode};

fn session_for(server: &TestServer, storage: Arc<dyn TokenStorage>) -> SessionManager {
    SessionManager::new(SessionConfig::new(server.base_url()), storage, Arc::new(NoopUi))
}

#[tokio::test]
async fn test_client_login_and_fetch() {
    let server = TestServer::start().await.unwrap();
    let session = session_for(&server, Arc::new(MemoryTokenStorage::new()));

    session.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let response = session
        .authenticated_fetch(Method::GET, "/health", None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_client_recovers_from_rejected_access_token() {
    let server = TestServer::start().await.unwrap();
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, storage.clone());
    session.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();

    // Corrupt the access token; the refresh token is still good
    let refresh = storage.load().unwrap().refresh_token.unwrap();
    storage
        .save(&StoredTokens::new("garbage.token.value", refresh.clone()))
        .unwrap();

    // Past the auth check the handler rejects the missing bot token
    let response = session
        .authenticated_fetch(Method::GET, "/latest-chat-id", None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let rotated = storage.load().unwrap();
    assert_ne!(rotated.refresh_token.as_deref(), Some(refresh.as_str()));
    assert_ne!(rotated.access_token.as_deref(), Some("garbage.token.value"));
}

#[tokio::test]
async fn test_client_resumes_from_file() {
    let server = TestServer::start().await.unwrap();
    let path = std::env::temp_dir().join(format!("cal-session-{}.json", std::process::id()));
    let storage: Arc<dyn TokenStorage> = Arc::new(FileTokenStorage::new(&path));

    let first = session_for(&server, storage.clone());
    first.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();

    // A new manager over the same file picks the session up
    let second = session_for(&server, storage.clone());
    assert_eq!(second.resume().await.unwrap(), InitialAuthState::Resumed);

    second.logout().await;
    assert!(storage.load().unwrap().is_empty());

    let third = session_for(&server, storage);
    assert_eq!(third.resume().await.unwrap(), InitialAuthState::LoginRequired);

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_client_logout_revokes_on_server() {
    let server = TestServer::start().await.unwrap();
    let storage = Arc::new(MemoryTokenStorage::new());
    let session = session_for(&server, storage.clone());
    session.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let refresh = storage.load().unwrap().refresh_token.unwrap();

    session.logout().await;

    let response = server
        .post("/refresh", &serde_json::json!({ "refreshToken": refresh }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
