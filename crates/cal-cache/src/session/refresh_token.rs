//! Refresh token storage.
//!
//! Each refresh token maps to at most one live session. Using a token consumes it:
//! `take` deletes the record and hands it back in one step, so the caller can issue
//! a replacement without any window in which the old token is still valid.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::CacheResult;

/// Stored refresh session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    /// Username the session was issued to
    pub subject: String,
    /// Identifier shared by every token in one rotation chain
    pub session_id: String,
    /// Creation time (Unix epoch milliseconds)
    pub created_at: i64,
    /// Expiry time (Unix epoch milliseconds)
    pub expires_at: i64,
}

impl RefreshSession {
    /// Start a new session chain for the subject
    #[must_use]
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        Self::continued(subject, uuid::Uuid::new_v4().to_string(), ttl)
    }

    /// Continue an existing chain after rotation
    #[must_use]
    pub fn continued(subject: impl Into<String>, session_id: String, ttl: Duration) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            subject: subject.into(),
            session_id,
            created_at: now,
            expires_at: now.saturating_add(ttl.num_milliseconds()),
        }
    }

    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}

/// Storage for refresh sessions keyed by the opaque token
///
/// A multi-instance deployment needs an implementation whose `take` is an atomic
/// get-and-delete on the shared store.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a session under a freshly generated token
    async fn insert(&self, token: &str, session: RefreshSession) -> CacheResult<()>;

    /// Remove and return a live session. Expired sessions are removed and reported as absent.
    async fn take(&self, token: &str) -> CacheResult<Option<RefreshSession>>;

    /// Delete a session if present. Returns whether anything was removed.
    async fn revoke(&self, token: &str) -> CacheResult<bool>;

    /// Sweep sessions whose expiry is at or before now. Returns how many were removed.
    async fn prune_expired(&self) -> CacheResult<usize>;

    /// Number of stored sessions, expired ones included until swept
    async fn len(&self) -> CacheResult<usize>;
}

/// Shared handle used by the service layer
pub type SharedRefreshTokenStore = Arc<dyn RefreshTokenStore>;

/// Process-local store backed by a concurrent map
#[derive(Debug, Default, Clone)]
pub struct MemoryRefreshTokenStore {
    sessions: Arc<DashMap<String, RefreshSession>>,
}

impl MemoryRefreshTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in the shared trait object
    #[must_use]
    pub fn shared(self) -> SharedRefreshTokenStore {
        Arc::new(self)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn insert(&self, token: &str, session: RefreshSession) -> CacheResult<()> {
        tracing::debug!(
            subject = %session.subject,
            session_id = %session.session_id,
            "Stored refresh token"
        );
        self.sessions.insert(token.to_string(), session);
        Ok(())
    }

    async fn take(&self, token: &str) -> CacheResult<Option<RefreshSession>> {
        let Some((_, session)) = self.sessions.remove(token) else {
            return Ok(None);
        };

        if session.is_expired() {
            tracing::debug!(session_id = %session.session_id, "Discarded expired refresh token");
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn revoke(&self, token: &str) -> CacheResult<bool> {
        let removed = self.sessions.remove(token);
        if let Some((_, session)) = &removed {
            tracing::debug!(session_id = %session.session_id, "Revoked refresh token");
        }
        Ok(removed.is_some())
    }

    async fn prune_expired(&self) -> CacheResult<usize> {
        let now = Utc::now().timestamp_millis();
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = !session.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            tracing::debug!(removed, "Pruned expired refresh tokens");
        }
        Ok(removed)
    }

    async fn len(&self) -> CacheResult<usize> {
        Ok(self.sessions.len())
    }
}
