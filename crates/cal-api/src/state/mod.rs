//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context and configuration.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use cal_common::{AppConfig, JwtService};
use cal_service::{DigestSchedule, ServiceContext};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Local day boundary for due-task checks
    digest_schedule: Option<DigestSchedule>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let digest_schedule = DigestSchedule::from_config(&config.digest);
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            digest_schedule,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Shared handle for background tasks
    pub fn shared_service_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn digest_schedule(&self) -> Option<DigestSchedule> {
        self.digest_schedule
    }

    /// Today in the digest's local offset, falling back to UTC
    pub fn today(&self) -> NaiveDate {
        let now = Utc::now();
        self.digest_schedule
            .map_or_else(|| now.date_naive(), |s| s.local_day(now))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("digest_schedule", &self.digest_schedule)
            .finish()
    }
}
