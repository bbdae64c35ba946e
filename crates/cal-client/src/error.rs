//! Client error types

use crate::storage::StorageError;

/// Session manager errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A token response lacked the access or the refresh token
    #[error("Token payload is missing the access or refresh token")]
    MissingTokenPayload,

    /// The session could not be recovered; the user has to log in again.
    /// Carries the final unauthorized response when there was one.
    #[error("Authentication required")]
    AuthenticationRequired(Option<Box<reqwest::Response>>),

    /// The server handed out an access token that had already expired
    #[error("Received access token is already expired")]
    ExpiredToken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Token storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Whether the caller has to show the login form
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRequired(_) | Self::InvalidCredentials | Self::ExpiredToken
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
