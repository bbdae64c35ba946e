//! In-process app with in-memory repositories

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tower::ServiceExt;

use cal_api::{create_app, AppState};
use cal_cache::MemoryRefreshTokenStore;
use cal_common::{
    AdminConfig, AdminCredentials, AppConfig, AppSettings, CorsConfig, DatabaseConfig,
    DigestConfig, Environment, JwtConfig, JwtService, RateLimitConfig, ServerConfig,
    TelegramSettings,
};
use cal_core::traits::{EventRepository, RepoResult, TelegramConfigRepository};
use cal_core::{Event, EventChanges, EventFilter, NewEvent, TelegramConfig};
use cal_service::telegram::{SendMessage, TelegramApi, TelegramResult, Update};
use cal_service::ServiceContext;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret-pass";
pub const JWT_SECRET: &str = "api-test-secret-0123456789abcdef";

#[derive(Default)]
pub struct MemoryEvents {
    events: Mutex<Vec<Event>>,
    next_id: AtomicI32,
}

#[async_trait]
impl EventRepository for MemoryEvents {
    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter.statuses.is_empty() || filter.statuses.contains(&e.status))
            .filter(|e| filter.task_types.is_empty() || filter.task_types.contains(&e.task_type))
            .cloned()
            .collect())
    }

    async fn create(&self, event: &NewEvent) -> RepoResult<Event> {
        let created = Event {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            task_type: event.task_type,
            status: event.status,
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &EventChanges) -> RepoResult<bool> {
        let mut events = self.events.lock().unwrap();
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        if let Some(title) = &changes.title {
            event.title.clone_from(title);
        }
        if let Some(status) = changes.status {
            event.status = status;
        }
        if let Some(end) = changes.end {
            event.end = end;
        }
        Ok(true)
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }

    async fn find_due_on(&self, day: NaiveDate) -> RepoResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_due_on(day))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTelegramConfig {
    config: Mutex<Option<TelegramConfig>>,
}

#[async_trait]
impl TelegramConfigRepository for MemoryTelegramConfig {
    async fn get(&self) -> RepoResult<Option<TelegramConfig>> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn save(&self, bot_token: &str, chat_id: &str) -> RepoResult<TelegramConfig> {
        let config = TelegramConfig {
            id: 1,
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        };
        *self.config.lock().unwrap() = Some(config.clone());
        Ok(config)
    }
}

/// Accepts every message without contacting Telegram
#[derive(Default)]
pub struct SilentTelegram {
    pub sent: Mutex<Vec<SendMessage>>,
}

#[async_trait]
impl TelegramApi for SilentTelegram {
    async fn get_updates(&self, _bot_token: &str) -> TelegramResult<Vec<Update>> {
        Ok(Vec::new())
    }

    async fn send_message(&self, _bot_token: &str, message: &SendMessage) -> TelegramResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn test_config(static_dir: PathBuf) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "task-calendar-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
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
            utc_offset_hours: 8,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        static_dir: static_dir.to_string_lossy().into_owned(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub jwt: JwtService,
    pub telegram: Arc<SilentTelegram>,
}

pub fn test_app() -> TestApp {
    test_app_with_static(std::env::temp_dir().join("cal-api-tests-missing"))
}

pub fn test_app_with_static(static_dir: PathBuf) -> TestApp {
    let config = test_config(static_dir);
    let telegram = Arc::new(SilentTelegram::default());

    let ctx = ServiceContext::builder()
        .event_repo(Arc::new(MemoryEvents::default()))
        .telegram_repo(Arc::new(MemoryTelegramConfig::default()))
        .refresh_token_store(MemoryRefreshTokenStore::new().shared())
        .telegram_client(telegram.clone())
        .jwt_service(Arc::new(JwtService::new(JWT_SECRET, 900)))
        .admin(AdminCredentials::from_plaintext(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap())
        .refresh_token_ttl(Duration::seconds(3600))
        .build()
        .unwrap();

    TestApp {
        router: create_app(AppState::new(ctx, config)),
        jwt: JwtService::new(JWT_SECRET, 900),
        telegram,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &Value, bearer: Option<&str>) -> Response<Body> {
        self.send(json_request("POST", uri, body, bearer)).await
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Log in and return `(access, refresh)`
    pub async fn login(&self) -> (String, String) {
        let response = self
            .post_json(
                "/login",
                &serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
