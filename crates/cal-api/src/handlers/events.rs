//! Event handlers
//!
//! Calendar CRUD. Every route requires a valid access token.

use axum::{extract::State, Json};
use cal_service::dto::{
    CreateEventRequest, EventListQuery, EventResponse, MessageResponse, UpdateEventRequest,
};
use cal_service::EventService;

use crate::extractors::{AuthUser, IdPath, QueryParams, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// List events
///
/// GET /events?statuses[]=pending&types[]=bug
pub async fn list_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(query): QueryParams<EventListQuery>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = EventService::new(state.service_context()).list(query).await?;
    Ok(Json(events))
}

/// Create an event
///
/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let event = EventService::new(state.service_context())
        .create(request)
        .await?;
    Ok(Json(event))
}

/// Partially update an event
///
/// PUT /events/:id
pub async fn update_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Json<MessageResponse>> {
    EventService::new(state.service_context())
        .update(id, request)
        .await?;
    Ok(Json(MessageResponse::new("Event was updated!")))
}

/// Delete an event
///
/// DELETE /events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    EventService::new(state.service_context()).delete(id).await?;
    Ok(Json(MessageResponse::new("Event was deleted!")))
}
