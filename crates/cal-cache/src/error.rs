//! Session store errors

use thiserror::Error;

/// Errors raised by a session store backend
///
/// `MemoryRefreshTokenStore` never fails. The variant exists for backends
/// behind a network hop, such as a shared store for multi-instance deployments.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store could not be reached
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for session store operations
pub type CacheResult<T> = Result<T, CacheError>;
