//! # cal-client
//!
//! Client-side session management for the task calendar API.
//!
//! [`SessionManager`] owns the access/refresh token pair, refreshes the access
//! token shortly before it expires, deduplicates concurrent refreshes, and retries a
//! request once after a 401/403. When the session cannot be recovered it clears the
//! stored tokens and asks the [`SessionUi`] to show the login form, once.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cal_client::{FileTokenStorage, NoopUi, SessionConfig, SessionManager};
//!
//! let session = SessionManager::new(
//!     SessionConfig::new("http://localhost:5001"),
//!     Arc::new(FileTokenStorage::new("session.json")),
//!     Arc::new(NoopUi),
//! );
//! session.login("admin", "password").await?;
//! let events = session.authenticated_fetch(reqwest::Method::GET, "/events", None).await?;
//! ```

pub mod config;
pub mod error;
pub mod hint;
pub mod session;
pub mod storage;
pub mod ui;

pub use config::SessionConfig;
pub use error::{ClientError, ClientResult};
pub use hint::{decode_expiry, refresh_delay, ExpiryHint};
pub use session::{InitialAuthState, SessionManager, TokenPayload};
pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageError, StoredTokens, TokenStorage};
pub use ui::{NoopUi, SessionUi};
