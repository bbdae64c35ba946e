//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Event not found: {0}")]
    EventNotFound(i32),

    #[error("Telegram configuration not found")]
    TelegramConfigNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No valid fields supplied for update")]
    NoFieldsToUpdate,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::TelegramConfigNotFound => "TELEGRAM_NOT_CONFIGURED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::NoFieldsToUpdate => "NO_FIELDS_TO_UPDATE",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::NoFieldsToUpdate
                | Self::InvalidDate(_)
                | Self::TelegramConfigNotFound
        )
    }

    /// Check if this is an infrastructure error
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}
