//! Service context - dependency container for services
//!
//! Holds the repositories, the refresh-token store, and the token/credential
//! services every request needs.

use std::sync::Arc;

use cal_cache::SharedRefreshTokenStore;
use cal_common::{AdminCredentials, JwtService};
use cal_core::traits::{EventRepository, TelegramConfigRepository};
use chrono::Duration;

use crate::telegram::TelegramApi;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    event_repo: Arc<dyn EventRepository>,
    telegram_repo: Arc<dyn TelegramConfigRepository>,

    // Session store
    refresh_token_store: SharedRefreshTokenStore,

    // External services
    telegram_client: Arc<dyn TelegramApi>,

    // Auth
    jwt_service: Arc<JwtService>,
    admin: Arc<AdminCredentials>,
    refresh_token_ttl: Duration,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    /// Get the event repository
    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    /// Get the Telegram configuration repository
    pub fn telegram_repo(&self) -> &dyn TelegramConfigRepository {
        self.telegram_repo.as_ref()
    }

    // === Session store ===

    /// Get the refresh token store
    pub fn refresh_token_store(&self) -> &SharedRefreshTokenStore {
        &self.refresh_token_store
    }

    // === External services ===

    /// Get the Telegram Bot API client
    pub fn telegram_client(&self) -> &dyn TelegramApi {
        self.telegram_client.as_ref()
    }

    // === Auth ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the configured admin identity
    pub fn admin(&self) -> &AdminCredentials {
        self.admin.as_ref()
    }

    /// Lifetime of a refresh session
    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("refresh_token_store", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("admin", &self.admin)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    event_repo: Option<Arc<dyn EventRepository>>,
    telegram_repo: Option<Arc<dyn TelegramConfigRepository>>,
    refresh_token_store: Option<SharedRefreshTokenStore>,
    telegram_client: Option<Arc<dyn TelegramApi>>,
    jwt_service: Option<Arc<JwtService>>,
    admin: Option<Arc<AdminCredentials>>,
    refresh_token_ttl: Option<Duration>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn telegram_repo(mut self, repo: Arc<dyn TelegramConfigRepository>) -> Self {
        self.telegram_repo = Some(repo);
        self
    }

    pub fn refresh_token_store(mut self, store: SharedRefreshTokenStore) -> Self {
        self.refresh_token_store = Some(store);
        self
    }

    pub fn telegram_client(mut self, client: Arc<dyn TelegramApi>) -> Self {
        self.telegram_client = Some(client);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn admin(mut self, admin: AdminCredentials) -> Self {
        self.admin = Some(Arc::new(admin));
        self
    }

    pub fn refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = Some(ttl);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            event_repo: required(self.event_repo, "event_repo")?,
            telegram_repo: required(self.telegram_repo, "telegram_repo")?,
            refresh_token_store: required(self.refresh_token_store, "refresh_token_store")?,
            telegram_client: required(self.telegram_client, "telegram_client")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            admin: required(self.admin, "admin")?,
            refresh_token_ttl: required(self.refresh_token_ttl, "refresh_token_ttl")?,
        })
    }
}
