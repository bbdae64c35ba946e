//! Response DTOs for API endpoints

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use cal_core::{EventStatus, TaskType};

// ============================================================================
// Auth Responses
// ============================================================================

/// Access + refresh token pair returned by login and refresh
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub token: String,
    pub refresh_token: String,
}

impl TokenPairResponse {
    pub fn new(token: String, refresh_token: String) -> Self {
        Self {
            token,
            refresh_token,
        }
    }
}

impl std::fmt::Debug for TokenPairResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPairResponse").finish_non_exhaustive()
    }
}

// ============================================================================
// Common Responses
// ============================================================================

/// `{ "message": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Event Responses
// ============================================================================

/// Event as the calendar front-end consumes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub start: NaiveDate,
    /// `YYYY-MM-DD`
    pub end: NaiveDate,
    pub task_type: TaskType,
    pub status: EventStatus,
}

// ============================================================================
// Telegram Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatIdResponse {
    pub chat_id: String,
}

/// Stored Telegram configuration
#[derive(Debug, Clone, Serialize)]
pub struct TelegramConfigResponse {
    pub id: i32,
    pub bot_token: String,
    pub chat_id: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
