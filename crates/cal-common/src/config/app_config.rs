//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub telegram: TelegramSettings,
    pub digest: DigestConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    /// Directory served at `/` (the calendar front-end)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// JWT configuration
///
/// Both lifetimes are in seconds. The access token is meant to be short-lived;
/// the client refreshes it proactively before `exp`.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// The single operator identity allowed to log in
#[derive(Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Telegram Bot API endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

/// Daily due-task digest schedule
#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_digest_hour")]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    /// Offset from UTC of the local day the digest follows
    #[serde(default = "default_digest_utc_offset")]
    pub utc_offset_hours: i32,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "task-calendar".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_true() -> bool {
    true
}

fn default_digest_hour() -> u32 {
    9
}

fn default_digest_utc_offset() -> i32 {
    8
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_static_dir() -> String {
    "public".to_string()
}

/// Parse an optional variable, falling back to `default` when unset or malformed
fn parse_var<T: FromStr>(name: &str, default: impl FnOnce() -> T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(default)
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT", default_port),
            },
            database: DatabaseConfig {
                url: required_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", default_min_connections),
            },
            jwt: JwtConfig {
                secret: required_var("JWT_SECRET")?,
                access_token_expiry: parse_var(
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry,
                ),
                refresh_token_expiry: parse_var(
                    "JWT_REFRESH_TOKEN_EXPIRY",
                    default_refresh_token_expiry,
                ),
            },
            admin: AdminConfig {
                username: required_var("ADMIN_USERNAME")?,
                password: required_var("ADMIN_PASSWORD")?,
            },
            telegram: TelegramSettings {
                api_url: env::var("TELEGRAM_API_URL").unwrap_or_else(|_| default_telegram_api_url()),
            },
            digest: DigestConfig {
                enabled: parse_var("DIGEST_ENABLED", default_true),
                hour: parse_var("DIGEST_HOUR", default_digest_hour),
                minute: parse_var("DIGEST_MINUTE", || 0),
                utc_offset_hours: parse_var("DIGEST_UTC_OFFSET_HOURS", default_digest_utc_offset),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                ),
                burst: parse_var("RATE_LIMIT_BURST", default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| default_static_dir()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the type system does not
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < 16 {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                "must be at least 16 bytes".to_string(),
            ));
        }
        if !(1..=MAX_TOKEN_EXPIRY_SECS).contains(&self.jwt.access_token_expiry) {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_TOKEN_EXPIRY",
                self.jwt.access_token_expiry.to_string(),
            ));
        }
        if !(1..=MAX_TOKEN_EXPIRY_SECS).contains(&self.jwt.refresh_token_expiry) {
            return Err(ConfigError::InvalidValue(
                "JWT_REFRESH_TOKEN_EXPIRY",
                self.jwt.refresh_token_expiry.to_string(),
            ));
        }
        if self.digest.hour > 23 {
            return Err(ConfigError::InvalidValue("DIGEST_HOUR", self.digest.hour.to_string()));
        }
        if self.digest.minute > 59 {
            return Err(ConfigError::InvalidValue(
                "DIGEST_MINUTE",
                self.digest.minute.to_string(),
            ));
        }
        if !(-12..=14).contains(&self.digest.utc_offset_hours) {
            return Err(ConfigError::InvalidValue(
                "DIGEST_UTC_OFFSET_HOURS",
                self.digest.utc_offset_hours.to_string(),
            ));
        }
        Ok(())
    }
}

/// Upper bound for either token lifetime: ten years, in seconds
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
