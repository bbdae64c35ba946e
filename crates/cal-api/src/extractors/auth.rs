//! Request authenticator
//!
//! Validates `Authorization: Bearer <token>` against the signing secret and expiry.
//! Access tokens are self-contained; the refresh-token store is never consulted here.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// `sub` claim of the access token
    pub subject: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                ApiError::from(e)
            })?;

        Ok(AuthUser {
            subject: claims.sub,
        })
    }
}
