//! # cal-core
//!
//! Domain layer containing calendar entities, repository traits, and domain errors.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    Event, EventChanges, EventFilter, EventStatus, NewEvent, TaskType, TelegramConfig,
};
pub use error::DomainError;
pub use traits::{EventRepository, RepoResult, TelegramConfigRepository};
