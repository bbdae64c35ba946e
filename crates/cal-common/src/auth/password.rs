//! Admin credential checks
//!
//! The calendar has a single operator account configured through the environment.
//! The configured password is hashed with Argon2id once at startup so the plaintext
//! is not kept around and comparisons do not short-circuit on the first mismatch.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the hash is invalid
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// The configured admin identity
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Hash the configured password and keep only the hash
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn from_plaintext(username: impl Into<String>, password: &str) -> Result<Self, AppError> {
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// Check a login attempt. Both fields are always evaluated.
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` on any mismatch
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AppError> {
        let username_matches = username == self.username;
        let password_matches = verify_password(password, &self.password_hash)?;

        if username_matches && password_matches {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
