//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use cal_cache::MemoryRefreshTokenStore;
use cal_common::{AdminCredentials, AppConfig, AppError, JwtService};
use cal_db::{create_pool, run_migrations, PgEventRepository, PgPool, PgTelegramConfigRepository};
use cal_service::{spawn_digest_scheduler, HttpTelegramClient, ServiceContext};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes bypass rate limiting; anything unrouted falls through to the
/// static front-end.
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();

    let router = apply_rate_limit(create_router(), &config.rate_limit)
        .merge(health_routes())
        .fallback_service(ServeDir::new(&config.static_dir));

    apply_middleware(router, &config.cors, config.app.env.is_production()).with_state(state)
}

/// Wire repositories, the token store and the Telegram client into a context
pub fn build_service_context(config: &AppConfig, pool: PgPool) -> Result<ServiceContext, AppError> {
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    let admin = AdminCredentials::from_plaintext(&config.admin.username, &config.admin.password)?;
    let refresh_token_ttl = chrono::Duration::try_seconds(config.jwt.refresh_token_expiry)
        .ok_or_else(|| {
            AppError::Config(format!(
                "refresh token expiry out of range: {}s",
                config.jwt.refresh_token_expiry
            ))
        })?;

    ServiceContext::builder()
        .event_repo(Arc::new(PgEventRepository::new(pool.clone())))
        .telegram_repo(Arc::new(PgTelegramConfigRepository::new(pool)))
        .refresh_token_store(MemoryRefreshTokenStore::new().shared())
        .telegram_client(Arc::new(HttpTelegramClient::new(&config.telegram.api_url)))
        .jwt_service(jwt_service)
        .admin(admin)
        .refresh_token_ttl(refresh_token_ttl)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = cal_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Database migrations applied");

    let service_context = build_service_context(&config, pool)?;
    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;

    let scheduler = match (state.config().digest.enabled, state.digest_schedule()) {
        (true, Some(schedule)) => Some(spawn_digest_scheduler(
            state.shared_service_context(),
            schedule,
        )),
        (true, None) => {
            tracing::warn!("Digest schedule is invalid; daily digest disabled");
            None
        }
        (false, _) => None,
    };

    let app = create_app(state);
    let result = run_server(app, addr).await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    result
}
