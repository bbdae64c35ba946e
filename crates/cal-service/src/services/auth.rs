//! Authentication service
//!
//! Issues short-lived access tokens and single-use refresh tokens. Every login and
//! every refresh produces a fresh pair; a refresh token is deleted from the store
//! before its replacement is issued, so a reused token is always rejected.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use cal_cache::RefreshSession;
use cal_common::AppError;
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, info, instrument, warn};

use crate::dto::{LoginRequest, LogoutRequest, RefreshTokenRequest, TokenPairResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Bytes of randomness in a refresh token
pub const REFRESH_TOKEN_BYTES: usize = 48;

/// Generate an opaque refresh token (64 URL-safe characters)
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sign an access token for the subject
    pub fn issue_access_token(&self, subject: &str) -> ServiceResult<String> {
        self.ctx
            .jwt_service()
            .issue_access_token(subject)
            .map_err(ServiceError::from)
    }

    /// Create a refresh session for the subject and return its token
    pub async fn issue_refresh_token(&self, subject: &str) -> ServiceResult<String> {
        let session = RefreshSession::new(subject, self.ctx.refresh_token_ttl());
        self.store_refresh_session(session).await
    }

    async fn store_refresh_session(&self, session: RefreshSession) -> ServiceResult<String> {
        let token = generate_refresh_token();
        self.ctx
            .refresh_token_store()
            .insert(&token, session)
            .await?;
        Ok(token)
    }

    /// Verify the admin credentials and issue a new token pair
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenPairResponse> {
        if let Err(e) = self
            .ctx
            .admin()
            .verify(&request.username, &request.password)
        {
            warn!("Login failed: invalid credentials");
            return Err(e.into());
        }

        self.prune_expired_refresh_tokens().await?;

        let token = self.issue_access_token(&request.username)?;
        let refresh_token = self.issue_refresh_token(&request.username).await?;

        info!("Admin logged in");
        Ok(TokenPairResponse::new(token, refresh_token))
    }

    /// Exchange a refresh token for a new pair, consuming the old token
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<TokenPairResponse> {
        let presented = request
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::validation("Refresh token is required"))?;

        self.prune_expired_refresh_tokens().await?;

        // Removal and lookup are one step; a concurrent refresh with the same token gets None
        let Some(session) = self.ctx.refresh_token_store().take(&presented).await? else {
            warn!("Refresh rejected: unknown, consumed or expired token");
            return Err(AppError::InvalidRefreshToken.into());
        };

        let token = self.issue_access_token(&session.subject)?;
        let next = RefreshSession::continued(
            session.subject.clone(),
            session.session_id.clone(),
            self.ctx.refresh_token_ttl(),
        );
        let refresh_token = self.store_refresh_session(next).await?;

        info!(session_id = %session.session_id, "Tokens refreshed");
        Ok(TokenPairResponse::new(token, refresh_token))
    }

    /// Revoke a refresh token. Always succeeds, whatever the token's state.
    #[instrument(skip(self, request))]
    pub async fn logout(&self, request: LogoutRequest) -> ServiceResult<()> {
        let Some(token) = request.refresh_token.filter(|t| !t.is_empty()) else {
            debug!("Logout without refresh token");
            return Ok(());
        };

        match self.ctx.refresh_token_store().revoke(&token).await {
            Ok(revoked) => debug!(revoked, "Logout processed"),
            // Logout reports success regardless; the session will expire on its own
            Err(e) => warn!(error = %e, "Failed to revoke refresh token on logout"),
        }
        Ok(())
    }

    /// Remove expired refresh sessions. Returns how many were removed.
    pub async fn prune_expired_refresh_tokens(&self) -> ServiceResult<usize> {
        Ok(self.ctx.refresh_token_store().prune_expired().await?)
    }
}
