//! Client session manager
//!
//! Owns the token pair and every transition of it:
//!
//! - storing a new pair reschedules the proactive refresh
//! - refreshes are single-flight; callers arriving while one is running share it,
//!   and attempts shortly after the previous one reuse its outcome
//! - a failed refresh fails closed: local tokens are dropped and the refresh token
//!   is revoked server-side without waiting for the reply
//! - an unrecoverable auth failure shows the login form once until the next
//!   successful store
//! - a pair whose access token is already expired counts as a failed store

use std::sync::{Arc, Weak};

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::SessionConfig;
use crate::error::{ClientError, ClientResult};
use crate::hint::{refresh_delay, ExpiryHint};
use crate::storage::{StoredTokens, TokenStorage};
use crate::ui::SessionUi;

/// Token pair as returned by `/login` and `/refresh`
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenPayload {
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }
}

impl std::fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPayload").finish_non_exhaustive()
    }
}

/// What `resume` found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialAuthState {
    /// No usable session; the login form is shown
    LoginRequired,
    /// Both tokens were present; the expiry check is scheduled
    Resumed,
    /// Only a refresh token was present and it was exchanged for a new pair
    SilentlyRefreshed,
}

type RefreshFuture = Shared<BoxFuture<'static, bool>>;

#[derive(Default)]
struct SessionState {
    has_auth_error: bool,
    expiry_timer: Option<JoinHandle<()>>,
    refresh_in_flight: Option<RefreshFuture>,
    last_refresh_attempt_at: Option<Instant>,
    last_refresh_succeeded: bool,
}

struct Inner {
    http: reqwest::Client,
    config: SessionConfig,
    storage: Arc<dyn TokenStorage>,
    ui: Arc<dyn SessionUi>,
    state: Mutex<SessionState>,
}

/// Session manager handle; clones share one session
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    pub fn new(
        config: SessionConfig,
        storage: Arc<dyn TokenStorage>,
        ui: Arc<dyn SessionUi>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), config, storage, ui)
    }

    pub fn with_client(
        http: reqwest::Client,
        config: SessionConfig,
        storage: Arc<dyn TokenStorage>,
        ui: Arc<dyn SessionUi>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                config,
                storage,
                ui,
                state: Mutex::new(SessionState::default()),
            }),
        }
    }

    /// Decide between login, resume and silent refresh from what storage holds
    #[instrument(skip(self))]
    pub async fn resume(&self) -> ClientResult<InitialAuthState> {
        let tokens = self.inner.storage.load()?;

        match (tokens.access_token, tokens.refresh_token) {
            (_, None) => {
                self.inner.clear_session();
                self.inner.ui.show_login();
                Ok(InitialAuthState::LoginRequired)
            }
            (None, Some(_)) => {
                if self.attempt_refresh().await {
                    self.inner.ui.show_authenticated();
                    Ok(InitialAuthState::SilentlyRefreshed)
                } else {
                    self.inner.force_relogin();
                    Ok(InitialAuthState::LoginRequired)
                }
            }
            (Some(access_token), Some(_)) => {
                self.inner.schedule_expiry_check(&access_token);
                if self.has_auth_error() {
                    return Ok(InitialAuthState::LoginRequired);
                }
                self.inner.ui.show_authenticated();
                Ok(InitialAuthState::Resumed)
            }
        }
    }

    /// Submit credentials and store the returned pair
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let response = self
            .inner
            .http
            .post(self.inner.config.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(ClientError::InvalidCredentials),
            status => return Err(ClientError::UnexpectedStatus(status)),
        }

        let payload: TokenPayload = response.json().await?;
        self.store_tokens(payload)?;
        self.inner.ui.show_authenticated();
        info!("Logged in");
        Ok(())
    }

    /// Revoke the refresh token, drop local state and show the login form
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let refresh_token = self.inner.stored_refresh_token();
        self.inner.clear_session();

        if let Some(token) = refresh_token {
            if let Err(e) = self.inner.revoke(&token).await {
                warn!(error = %e, "Logout request failed");
            }
        }
        self.inner.ui.show_login();
    }

    /// Persist a new pair. Either token missing clears the session instead.
    pub fn store_tokens(&self, payload: TokenPayload) -> ClientResult<()> {
        self.inner.store_tokens(payload)
    }

    /// Rebuild the proactive refresh timer for the given access token
    pub fn schedule_expiry_check(&self, access_token: &str) {
        self.inner.schedule_expiry_check(access_token);
    }

    /// Refresh the pair. Concurrent callers share one request.
    pub async fn attempt_refresh(&self) -> bool {
        self.inner.attempt_refresh().await
    }

    /// Send an authenticated request, refreshing and retrying once on 401/403
    pub async fn authenticated_fetch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Response> {
        self.authenticated_fetch_with(method, path, body, true).await
    }

    /// As [`authenticated_fetch`](Self::authenticated_fetch), with the retry optional
    #[instrument(skip(self, body))]
    pub async fn authenticated_fetch_with(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        allow_retry: bool,
    ) -> ClientResult<Response> {
        let mut allow_retry = allow_retry;

        loop {
            let access_token = self.ensure_access_token().await?;

            let mut request = self
                .inner
                .http
                .request(method.clone(), self.inner.config.url(path))
                .bearer_auth(&access_token);
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await?;

            if !is_auth_failure(response.status()) {
                return Ok(response);
            }

            if allow_retry && self.attempt_refresh().await {
                debug!(path, "Retrying request after refresh");
                allow_retry = false;
                continue;
            }

            self.inner.force_relogin();
            return Err(ClientError::AuthenticationRequired(Some(Box::new(response))));
        }
    }

    /// Drop the session and show the login form; repeated calls are no-ops
    /// until the next successful store
    pub fn force_relogin(&self) {
        self.inner.force_relogin();
    }

    pub fn has_auth_error(&self) -> bool {
        self.inner.state.lock().has_auth_error
    }

    /// Current access token, if one is stored
    pub fn access_token(&self) -> Option<String> {
        self.inner.stored_tokens().access_token
    }

    async fn ensure_access_token(&self) -> ClientResult<String> {
        if let Some(token) = self.access_token() {
            return Ok(token);
        }

        if self.attempt_refresh().await {
            if let Some(token) = self.access_token() {
                return Ok(token);
            }
        }

        self.inner.force_relogin();
        Err(ClientError::AuthenticationRequired(None))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.inner.config.base_url)
            .field("has_auth_error", &self.has_auth_error())
            .finish_non_exhaustive()
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Inner {
    fn stored_tokens(&self) -> StoredTokens {
        self.storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored tokens");
            StoredTokens::default()
        })
    }

    fn stored_refresh_token(&self) -> Option<String> {
        self.stored_tokens().refresh_token
    }

    fn store_tokens(self: &Arc<Self>, payload: TokenPayload) -> ClientResult<()> {
        let (Some(access_token), Some(refresh_token)) =
            (non_empty(payload.token), non_empty(payload.refresh_token))
        else {
            warn!("Token payload incomplete; clearing session");
            self.clear_session();
            return Err(ClientError::MissingTokenPayload);
        };

        self.storage
            .save(&StoredTokens::new(access_token.clone(), refresh_token))?;
        self.state.lock().has_auth_error = false;
        self.schedule_expiry_check(&access_token);
        if self.state.lock().has_auth_error {
            return Err(ClientError::ExpiredToken);
        }
        Ok(())
    }

    fn cancel_expiry_timer(&self) {
        if let Some(timer) = self.state.lock().expiry_timer.take() {
            timer.abort();
        }
    }

    fn clear_session(&self) {
        self.cancel_expiry_timer();
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
    }

    fn schedule_expiry_check(self: &Arc<Self>, access_token: &str) {
        self.cancel_expiry_timer();

        let Some(hint) = ExpiryHint::decode(access_token) else {
            debug!("Access token carries no readable expiry; no refresh scheduled");
            return;
        };

        let now = now_ms();
        if hint.is_expired_at(now) {
            info!("Access token already expired");
            self.force_relogin();
            return;
        }

        let delay = refresh_delay(
            hint.millis_until(now),
            self.config.leeway,
            self.config.min_timer_delay,
        );
        debug!(delay_ms = delay.as_millis() as u64, "Scheduled proactive refresh");

        let weak: Weak<Self> = Arc::downgrade(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // Storing the refreshed pair aborts this timer, so the refresh runs detached
            tokio::spawn(async move { inner.refresh_on_timer().await });
        });

        self.state.lock().expiry_timer = Some(timer);
    }

    async fn refresh_on_timer(self: &Arc<Self>) {
        let before = self.stored_tokens().access_token;
        if !self.attempt_refresh().await {
            self.force_relogin();
            return;
        }

        // A throttled attempt stores nothing, so nothing rescheduled the timer
        if let Some(current) = self.stored_tokens().access_token {
            if before.as_deref() == Some(current.as_str()) {
                debug!("Refresh reused a recent outcome; rescheduling from the stored token");
                self.schedule_expiry_check(&current);
            }
        }
    }

    async fn attempt_refresh(self: &Arc<Self>) -> bool {
        let refresh = {
            let mut state = self.state.lock();

            if let Some(in_flight) = &state.refresh_in_flight {
                in_flight.clone()
            } else {
                let throttled = state
                    .last_refresh_attempt_at
                    .is_some_and(|at| at.elapsed() < self.config.min_refresh_interval);
                if throttled {
                    debug!(
                        succeeded = state.last_refresh_succeeded,
                        "Refresh throttled; reusing last outcome"
                    );
                    return state.last_refresh_succeeded;
                }

                state.last_refresh_attempt_at = Some(Instant::now());
                let inner = Arc::clone(self);
                let refresh = async move {
                    let succeeded = inner.refresh_once().await;
                    let mut state = inner.state.lock();
                    state.last_refresh_succeeded = succeeded;
                    state.refresh_in_flight = None;
                    succeeded
                }
                .boxed()
                .shared();
                state.refresh_in_flight = Some(refresh.clone());
                refresh
            }
        };

        refresh.await
    }

    async fn refresh_once(self: &Arc<Self>) -> bool {
        let Some(refresh_token) = self.stored_refresh_token() else {
            debug!("No refresh token stored");
            return false;
        };

        let result = match self.request_refresh(&refresh_token).await {
            Ok(payload) => self.store_tokens(payload),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!("Tokens refreshed");
                true
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed; clearing session");
                self.clear_session();
                self.spawn_revoke(refresh_token);
                false
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> ClientResult<TokenPayload> {
        let response = self
            .http
            .post(self.config.url("/refresh"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn revoke(&self, refresh_token: &str) -> ClientResult<()> {
        self.http
            .post(self.config.url("/logout"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;
        Ok(())
    }

    fn spawn_revoke(self: &Arc<Self>, refresh_token: String) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = inner.revoke(&refresh_token).await {
                debug!(error = %e, "Best-effort revoke failed");
            }
        });
    }

    fn force_relogin(self: &Arc<Self>) {
        {
            let mut state = self.state.lock();
            if state.has_auth_error {
                return;
            }
            state.has_auth_error = true;
        }

        warn!("Session lost; login required");
        let refresh_token = self.stored_refresh_token();
        self.clear_session();
        if let Some(token) = refresh_token {
            self.spawn_revoke(token);
        }
        self.ui.show_login();
    }
}
