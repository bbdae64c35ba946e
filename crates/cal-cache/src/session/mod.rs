//! Session storage module.
//!
//! Provides storage for refresh-token sessions behind the `RefreshTokenStore` trait.

mod refresh_token;

pub use refresh_token::{
    MemoryRefreshTokenStore, RefreshSession, RefreshTokenStore, SharedRefreshTokenStore,
};
