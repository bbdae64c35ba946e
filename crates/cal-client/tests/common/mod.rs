//! Mock auth server and recording UI for session tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{json, Value};

use cal_client::{MemoryTokenStorage, SessionConfig, SessionManager, SessionUi, StoredTokens};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";

/// Build an unsigned JWT-shaped token expiring `ttl_secs` from now
pub fn make_access_token(ttl_secs: i64, jti: usize) -> String {
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": USERNAME, "exp": exp, "jti": jti }).to_string());
    format!("{header}.{payload}.signature")
}

pub struct MockAuth {
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub fail_refresh: AtomicBool,
    pub refresh_delay_ms: AtomicU64,
    pub access_ttl_secs: AtomicI64,
    issued: AtomicUsize,
    access: Mutex<HashSet<String>>,
    refresh: Mutex<HashSet<String>>,
}

impl MockAuth {
    fn new() -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
            refresh_delay_ms: AtomicU64::new(0),
            access_ttl_secs: AtomicI64::new(900),
            issued: AtomicUsize::new(0),
            access: Mutex::new(HashSet::new()),
            refresh: Mutex::new(HashSet::new()),
        }
    }

    /// Mint a pair the server will accept
    pub fn issue_pair(&self) -> (String, String) {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        let access = make_access_token(self.access_ttl_secs.load(Ordering::SeqCst), n);
        let refresh = format!("refresh-{n}");
        self.access.lock().unwrap().insert(access.clone());
        self.refresh.lock().unwrap().insert(refresh.clone());
        (access, refresh)
    }

    /// Forget every access token, as if they had all expired
    pub fn expire_access_tokens(&self) {
        self.access.lock().unwrap().clear();
    }

    pub fn knows_refresh_token(&self, token: &str) -> bool {
        self.refresh.lock().unwrap().contains(token)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

fn pair_response(state: &MockAuth) -> Response {
    let (token, refresh_token) = state.issue_pair();
    Json(json!({ "token": token, "refreshToken": refresh_token })).into_response()
}

async fn login(State(state): State<Arc<MockAuth>>, Json(body): Json<Value>) -> Response {
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        pair_response(&state)
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "code": "INVALID_CREDENTIALS" }))).into_response()
    }
}

async fn refresh(State(state): State<Arc<MockAuth>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let presented = body["refreshToken"].as_str().unwrap_or_default().to_string();
    let known = state.refresh.lock().unwrap().remove(&presented);
    if !known || state.fail_refresh.load(Ordering::SeqCst) {
        return (StatusCode::FORBIDDEN, Json(json!({ "code": "INVALID_REFRESH_TOKEN" }))).into_response();
    }
    pair_response(&state)
}

async fn logout(State(state): State<Arc<MockAuth>>, Json(body): Json<Value>) -> StatusCode {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(token) = body["refreshToken"].as_str() {
        state.refresh.lock().unwrap().remove(token);
    }
    StatusCode::NO_CONTENT
}

async fn protected(State(state): State<Arc<MockAuth>>, headers: HeaderMap) -> Response {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    match bearer {
        Some(token) if state.access.lock().unwrap().contains(&token) => {
            Json(json!({ "ok": true })).into_response()
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn always_unauthorized() -> StatusCode {
    StatusCode::UNAUTHORIZED
}

pub struct MockServer {
    pub base_url: String,
    pub auth: Arc<MockAuth>,
}

impl MockServer {
    pub async fn start() -> Self {
        let auth = Arc::new(MockAuth::new());
        let router = Router::new()
            .route("/login", post(login))
            .route("/refresh", post(refresh))
            .route("/logout", post(logout))
            .route("/protected", get(protected))
            .route("/always-401", get(always_unauthorized))
            .with_state(auth.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            auth,
        }
    }

    pub fn config(&self) -> SessionConfig {
        SessionConfig::new(&self.base_url)
    }
}

#[derive(Default)]
pub struct RecordingUi {
    pub authenticated: AtomicUsize,
    pub login: AtomicUsize,
}

impl RecordingUi {
    pub fn authenticated_shown(&self) -> usize {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn login_shown(&self) -> usize {
        self.login.load(Ordering::SeqCst)
    }
}

impl SessionUi for RecordingUi {
    fn show_authenticated(&self) {
        self.authenticated.fetch_add(1, Ordering::SeqCst);
    }

    fn show_login(&self) {
        self.login.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryTokenStorage>,
    pub ui: Arc<RecordingUi>,
    pub session: SessionManager,
}

impl Harness {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let config = server.config();
        Self::with_config(server, config, StoredTokens::default())
    }

    pub fn with_config(server: MockServer, config: SessionConfig, tokens: StoredTokens) -> Self {
        let storage = Arc::new(MemoryTokenStorage::with_tokens(tokens));
        let ui = Arc::new(RecordingUi::default());
        let session = SessionManager::new(config, storage.clone(), ui.clone());
        Self {
            server,
            storage,
            ui,
            session,
        }
    }

    pub fn stored(&self) -> StoredTokens {
        use cal_client::TokenStorage;
        self.storage.load().unwrap()
    }
}

/// Poll until `check` holds or the timeout passes
pub async fn eventually(timeout: Duration, check: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}
