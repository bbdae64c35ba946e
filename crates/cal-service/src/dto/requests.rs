//! Request DTOs for API endpoints

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

// ============================================================================
// Auth Requests
// ============================================================================

/// Admin login request
///
/// Missing fields deserialize as empty strings and fail the credential check,
/// so the caller only ever sees the generic 401.
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Token refresh request
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Logout request; the refresh token to revoke, if the client still has one
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// ============================================================================
// Event Requests
// ============================================================================

/// Listing filter, e.g. `?statuses[]=pending&statuses[]=in-progress&types[]=bug`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    #[serde(rename = "statuses[]", default)]
    pub statuses: Vec<String>,
    #[serde(rename = "types[]", default)]
    pub types: Vec<String>,
}

/// Create event request. Dates are `YYYY-MM-DD` (a full ISO timestamp is accepted
/// and truncated to its date).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
}

/// Partial update; only these keys are honoured, anything else is ignored.
///
/// Outer `None` is an absent key and leaves the column alone. `Some(None)` is an
/// explicit `null`: it clears `description` and resets `status` / `task_type` to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_title"))]
#[allow(clippy::option_option)]
pub struct UpdateEventRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_type: Option<Option<String>>,
}

/// Only runs for keys that are present, so a `null` becomes `Some(None)`
#[allow(clippy::option_option)]
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_update_title(req: &UpdateEventRequest) -> Result<(), ValidationError> {
    match &req.title {
        Some(None) => {
            Err(ValidationError::new("title_null").with_message("Title cannot be null".into()))
        }
        Some(Some(title)) if title.is_empty() || title.chars().count() > 255 => {
            Err(ValidationError::new("title_length")
                .with_message("Title must be 1-255 characters".into()))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Telegram Requests
// ============================================================================

/// Chat ids arrive either as the number Telegram reports or as a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChatIdInput {
    Number(i64),
    Text(String),
}

impl ChatIdInput {
    /// Normalised text form; `None` when blank
    pub fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Bot credentials, used both for saving the configuration and for a test message
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramCredentialsRequest {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<ChatIdInput>,
}

impl std::fmt::Debug for TelegramCredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentialsRequest")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// `GET /latest-chat-id?botToken=...`
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestChatIdQuery {
    #[serde(default)]
    pub bot_token: Option<String>,
}
