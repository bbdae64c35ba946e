//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{Event, EventChanges, EventFilter, NewEvent, TelegramConfig};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// List events matching the filter, ordered by start date then id
    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>>;

    /// Insert a new event and return it with its assigned id
    async fn create(&self, event: &NewEvent) -> RepoResult<Event>;

    /// Apply a partial update. Returns `false` if no row matched.
    async fn update(&self, id: i32, changes: &EventChanges) -> RepoResult<bool>;

    /// Delete an event. Returns `false` if no row matched.
    async fn delete(&self, id: i32) -> RepoResult<bool>;

    /// Outstanding events whose end date is the given day
    async fn find_due_on(&self, day: NaiveDate) -> RepoResult<Vec<Event>>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> RepoResult<()>;
}

// ============================================================================
// Telegram Config Repository
// ============================================================================

#[async_trait]
pub trait TelegramConfigRepository: Send + Sync {
    /// Get the stored configuration, if any
    async fn get(&self) -> RepoResult<Option<TelegramConfig>>;

    /// Insert or replace the single configuration row
    async fn save(&self, bot_token: &str, chat_id: &str) -> RepoResult<TelegramConfig>;
}
