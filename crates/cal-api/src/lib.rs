//! # cal-api
//!
//! REST API server built with Axum framework.
//!
//! Exposes the login/refresh/logout token endpoints, the bearer-protected event
//! and Telegram routes, health probes, and the static calendar front-end.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{build_service_context, create_app, create_app_state, run, run_server};
pub use state::AppState;
