//! In-memory fakes for service tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use cal_cache::{MemoryRefreshTokenStore, SharedRefreshTokenStore};
use cal_common::{AdminCredentials, JwtService};
use cal_core::traits::{EventRepository, RepoResult, TelegramConfigRepository};
use cal_core::{Event, EventChanges, EventFilter, NewEvent, TelegramConfig};
use cal_service::telegram::{SendMessage, TelegramApi, TelegramError, TelegramResult, Update};
use cal_service::ServiceContext;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const JWT_SECRET: &str = "service-test-secret-0123456789";

#[derive(Default)]
pub struct FakeEventRepository {
    events: Mutex<Vec<Event>>,
    next_id: AtomicI32,
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter.statuses.is_empty() || filter.statuses.contains(&e.status))
            .filter(|e| filter.task_types.is_empty() || filter.task_types.contains(&e.task_type))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.start, e.id));
        Ok(events)
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
        if let Some(description) = &changes.description {
            event.description.clone_from(description);
        }
        if let Some(start) = changes.start {
            event.start = start;
        }
        if let Some(end) = changes.end {
            event.end = end;
        }
        if let Some(task_type) = changes.task_type {
            event.task_type = task_type;
        }
        if let Some(status) = changes.status {
            event.status = status;
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
pub struct FakeTelegramConfigRepository {
    config: Mutex<Option<TelegramConfig>>,
}

#[async_trait]
impl TelegramConfigRepository for FakeTelegramConfigRepository {
    async fn get(&self) -> RepoResult<Option<TelegramConfig>> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn save(&self, bot_token: &str, chat_id: &str) -> RepoResult<TelegramConfig> {
        let mut slot = self.config.lock().unwrap();
        let config = TelegramConfig {
            id: slot.as_ref().map_or(1, |c| c.id),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        };
        *slot = Some(config.clone());
        Ok(config)
    }
}

/// Records sent messages and replays canned updates
#[derive(Default)]
pub struct FakeTelegram {
    pub updates: Mutex<Vec<Update>>,
    pub sent: Mutex<Vec<(String, SendMessage)>>,
    pub reject: Mutex<Option<String>>,
}

#[async_trait]
impl TelegramApi for FakeTelegram {
    async fn get_updates(&self, _bot_token: &str) -> TelegramResult<Vec<Update>> {
        if let Some(reason) = self.reject.lock().unwrap().clone() {
            return Err(TelegramError::Rejected(reason));
        }
        Ok(self.updates.lock().unwrap().clone())
    }

    async fn send_message(&self, bot_token: &str, message: &SendMessage) -> TelegramResult<()> {
        if let Some(reason) = self.reject.lock().unwrap().clone() {
            return Err(TelegramError::Rejected(reason));
        }
        self.sent
            .lock()
            .unwrap()
            .push((bot_token.to_string(), message.clone()));
        Ok(())
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub store: SharedRefreshTokenStore,
    pub events: Arc<FakeEventRepository>,
    pub telegram_repo: Arc<FakeTelegramConfigRepository>,
    pub telegram: Arc<FakeTelegram>,
    pub jwt: Arc<JwtService>,
}

pub fn harness() -> Harness {
    harness_with_ttl(Duration::days(7))
}

pub fn harness_with_ttl(refresh_ttl: Duration) -> Harness {
    let store = MemoryRefreshTokenStore::new().shared();
    let events = Arc::new(FakeEventRepository::default());
    let telegram_repo = Arc::new(FakeTelegramConfigRepository::default());
    let telegram = Arc::new(FakeTelegram::default());
    let jwt = Arc::new(JwtService::new(JWT_SECRET, 900));

    let ctx = ServiceContext::builder()
        .event_repo(events.clone())
        .telegram_repo(telegram_repo.clone())
        .refresh_token_store(store.clone())
        .telegram_client(telegram.clone())
        .jwt_service(jwt.clone())
        .admin(AdminCredentials::from_plaintext(ADMIN_USERNAME, ADMIN_PASSWORD).unwrap())
        .refresh_token_ttl(refresh_ttl)
        .build()
        .unwrap();

    Harness {
        ctx,
        store,
        events,
        telegram_repo,
        telegram,
        jwt,
    }
}
