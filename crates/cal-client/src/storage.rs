//! Durable storage for the token pair
//!
//! Both tokens live under fixed keys, `token` and `refreshToken`. Only the
//! session manager writes them.

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed session file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persisted session state
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl std::fmt::Debug for StoredTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredTokens")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Durable key-value storage for the token pair
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<StoredTokens, StorageError>;

    fn save(&self, tokens: &StoredTokens) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local storage, mostly for tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        Ok(self.tokens.lock().clone())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        *self.tokens.lock() = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.tokens.lock() = StoredTokens::default();
        Ok(())
    }
}

/// JSON file storage: `{"token": "...", "refreshToken": "..."}`
///
/// A missing file loads as an empty session. Writes go through a sibling temp
/// file and a rename. File I/O runs under `block_in_place` on a multi-thread
/// runtime so the worker's other tasks move elsewhere; on a current-thread
/// runtime it runs inline.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Run blocking file I/O without stalling a multi-thread runtime worker
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        run_blocking(|| -> Result<StoredTokens, StorageError> {
            match std::fs::read(&self.path) {
                Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoredTokens::default()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(tokens)?;
        let tmp = self.path.with_extension("tmp");
        run_blocking(|| -> Result<(), StorageError> {
            std::fs::write(&tmp, &bytes)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        run_blocking(|| -> Result<(), StorageError> {
            match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        })
    }
}
