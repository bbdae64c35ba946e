//! Telegram handlers

use axum::{extract::State, Json};
use cal_service::dto::{
    ChatIdResponse, LatestChatIdQuery, MessageResponse, TelegramCredentialsRequest,
};
use cal_service::TelegramService;
use serde_json::Value;

use crate::extractors::{AuthUser, JsonBody, QueryParams};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Chat id of the newest message the bot received
///
/// GET /latest-chat-id?botToken=...
pub async fn latest_chat_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<LatestChatIdQuery>,
) -> ApiResult<Json<ChatIdResponse>> {
    let response = TelegramService::new(state.service_context())
        .latest_chat_id(query.bot_token)
        .await?;
    Ok(Json(response))
}

/// Send today's due-task digest now
///
/// POST /check-due-tasks
pub async fn check_due_tasks(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    let outcome = TelegramService::new(state.service_context())
        .check_due_tasks(state.today())
        .await?;
    Ok(Json(MessageResponse::new(outcome.message())))
}

/// Send a greeting with the supplied credentials
///
/// POST /test-telegram
pub async fn test_telegram(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(request): JsonBody<TelegramCredentialsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    TelegramService::new(state.service_context())
        .send_test_message(request)
        .await?;
    Ok(Json(MessageResponse::new("Test message sent successfully!")))
}

/// Store the bot credentials
///
/// POST /telegram-config
pub async fn save_telegram_config(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(request): JsonBody<TelegramCredentialsRequest>,
) -> ApiResult<Json<MessageResponse>> {
    TelegramService::new(state.service_context())
        .save_config(request)
        .await?;
    Ok(Json(MessageResponse::new("Configuration saved successfully!")))
}

/// Stored configuration, or `{}` when none is saved
///
/// GET /telegram-config
pub async fn get_telegram_config(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Value>> {
    let config = TelegramService::new(state.service_context())
        .get_config()
        .await?;

    let body = match config {
        Some(config) => serde_json::to_value(config).map_err(ApiError::internal)?,
        None => Value::Object(serde_json::Map::new()),
    };
    Ok(Json(body))
}
