//! Test helpers for integration tests
//!
//! Provides a spawned test server, request shortcuts and status assertions.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use cal_api::{build_service_context, create_app, AppState};
use cal_common::{
    AdminConfig, AppConfig, AppSettings, CorsConfig, DatabaseConfig, DigestConfig, Environment,
    JwtConfig, RateLimitConfig, ServerConfig, TelegramSettings,
};
use cal_db::{create_lazy_pool, run_migrations};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "integration-pass";

/// Never dialled unless a test touches the database
const UNREACHABLE_DATABASE_URL: &str = "postgres://postgres@127.0.0.1:1/unused";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose database is never reached; auth endpoints only
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(UNREACHABLE_DATABASE_URL)).await
    }

    /// Start a server backed by `DATABASE_URL`, with migrations applied
    pub async fn start_with_database(database_url: &str) -> Result<Self> {
        Self::start_with_config(test_config(database_url)).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let db_config = cal_db::DatabaseConfig::from(&config.database);
        let pool = create_lazy_pool(&db_config)?;
        if config.database.url != UNREACHABLE_DATABASE_URL {
            run_migrations(&pool).await?;
        }

        let context = build_service_context(&config, pool)?;
        let app = create_app(AppState::new(context, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

/// Configuration for a test server; no env vars involved
pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "task-calendar-integration".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 2,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: "integration-secret-0123456789abcdef".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 3600,
        },
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
        telegram: TelegramSettings {
            api_url: "http://127.0.0.1:9".to_string(),
        },
        digest: DigestConfig {
            enabled: false,
            hour: 9,
            minute: 0,
            utc_offset_hours: 0,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        static_dir: std::env::temp_dir()
            .join("cal-integration-static")
            .to_string_lossy()
            .into_owned(),
    }
}

/// `DATABASE_URL` when a test database is available
pub fn test_database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var("DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            None
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
