//! Route definitions
//!
//! The calendar front-end calls these paths at the root, so nothing is nested
//! under a version prefix.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, events, health, telegram};
use crate::state::AppState;

/// Create the API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(event_routes())
        .merge(telegram_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Token endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}

/// Calendar events
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            put(events::update_event).delete(events::delete_event),
        )
}

/// Telegram notifications
fn telegram_routes() -> Router<AppState> {
    Router::new()
        .route("/latest-chat-id", get(telegram::latest_chat_id))
        .route("/check-due-tasks", post(telegram::check_due_tasks))
        .route("/test-telegram", post(telegram::test_telegram))
        .route(
            "/telegram-config",
            get(telegram::get_telegram_config).post(telegram::save_telegram_config),
        )
}
