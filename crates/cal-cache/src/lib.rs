//! # cal-cache
//!
//! Server-side session state for the calendar API.
//!
//! ## Features
//!
//! - **Refresh sessions**: opaque refresh tokens mapped to the subject they were issued to
//! - **Single-use rotation**: `take` removes a session in one atomic step, so two
//!   concurrent refreshes with the same token cannot both succeed
//! - **Lazy expiry**: expired sessions are never handed out, whether or not they
//!   have been swept yet
//!
//! ## Example
//!
//! ```ignore
//! use cal_cache::{MemoryRefreshTokenStore, RefreshSession, RefreshTokenStore};
//!
//! let store = MemoryRefreshTokenStore::new();
//! store.insert("opaque-token", RefreshSession::new("admin", ttl)).await?;
//!
//! // Rotation: the session is gone after this call
//! let session = store.take("opaque-token").await?;
//! ```

pub mod error;
pub mod session;

pub use error::{CacheError, CacheResult};
pub use session::{MemoryRefreshTokenStore, RefreshSession, RefreshTokenStore, SharedRefreshTokenStore};
