//! Axum extractors for request handling
//!
//! Custom extractors for authentication, JSON bodies, paths and query strings.
//! Every rejection is an [`ApiError`](crate::response::ApiError), so clients always
//! receive the JSON error body.

mod auth;
mod json;
mod path;
mod query;

pub use auth::AuthUser;
pub use json::{JsonBody, ValidatedJson};
pub use path::IdPath;
pub use query::QueryParams;
