//! Authentication handlers
//!
//! Login, token refresh and logout. None of these require an access token.

use axum::{extract::State, Json};
use cal_service::dto::{LoginRequest, LogoutRequest, RefreshTokenRequest, TokenPairResponse};
use cal_service::AuthService;

use crate::extractors::JsonBody;
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Log in with the admin credentials
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
///
/// POST /refresh
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshTokenRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Revoke a refresh token
///
/// POST /logout. Always 204, even for an unreadable body.
pub async fn logout(
    State(state): State<AppState>,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<NoContent> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    AuthService::new(state.service_context())
        .logout(request)
        .await?;
    Ok(NoContent)
}
