//! # cal-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `cal-core`:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers (status and task type are normalised on read)
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cal_db::{create_pool, run_migrations, DatabaseConfig, PgEventRepository};
//! use cal_core::{EventFilter, EventRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!
//!     let events = PgEventRepository::new(pool).list(&EventFilter::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_lazy_pool, create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgEventRepository, PgTelegramConfigRepository};
