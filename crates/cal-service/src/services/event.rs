//! Event service
//!
//! CRUD over calendar events. Status and task type are normalised on the way in;
//! unknown values fall back to `pending` / `feature`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{info, instrument};
use validator::Validate;

use cal_core::{DomainError, EventChanges, EventFilter, EventStatus, NewEvent, TaskType};

use crate::dto::{CreateEventRequest, EventListQuery, EventResponse, UpdateEventRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Parse a calendar date. Accepts `YYYY-MM-DD` or an ISO timestamp, keeping the date part.
pub fn parse_event_date(value: &str) -> Result<NaiveDate, DomainError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .map_err(|_| DomainError::InvalidDate(value.to_string()))
}

/// Date column from a partial update; the columns are required, so `null` is rejected
#[allow(clippy::option_option)]
fn changed_date(value: Option<Option<String>>, field: &str) -> ServiceResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(None) => Err(ServiceError::validation(format!("{field} cannot be null"))),
        Some(Some(raw)) => Ok(Some(parse_event_date(&raw)?)),
    }
}

/// Build the repository filter. `None` means the request asked only for values
/// that cannot match anything.
fn build_filter(query: &EventListQuery) -> Option<EventFilter> {
    let statuses: Vec<EventStatus> = query
        .statuses
        .iter()
        .filter_map(|s| s.trim().to_lowercase().parse().ok())
        .collect();
    let task_types: Vec<TaskType> = query
        .types
        .iter()
        .filter_map(|t| t.trim().to_lowercase().parse().ok())
        .collect();

    if (!query.statuses.is_empty() && statuses.is_empty())
        || (!query.types.is_empty() && task_types.is_empty())
    {
        return None;
    }

    Some(EventFilter {
        statuses,
        task_types,
    })
}

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    /// Create a new EventService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List events, optionally filtered by status and task type
    #[instrument(skip(self))]
    pub async fn list(&self, query: EventListQuery) -> ServiceResult<Vec<EventResponse>> {
        let Some(filter) = build_filter(&query) else {
            return Ok(Vec::new());
        };

        let events = self.ctx.event_repo().list(&filter).await?;
        Ok(events.into_iter().map(EventResponse::from).collect())
    }

    /// Create an event
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(&self, request: CreateEventRequest) -> ServiceResult<EventResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let event = NewEvent {
            title: request.title,
            description: request.description,
            start: parse_event_date(&request.start_date)?,
            end: parse_event_date(&request.end_date)?,
            task_type: TaskType::normalise(request.task_type.as_deref()),
            status: EventStatus::normalise(request.status.as_deref()),
        };

        let created = self.ctx.event_repo().create(&event).await?;
        info!(event_id = created.id, "Event created");
        Ok(EventResponse::from(created))
    }

    /// Apply a partial update
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: UpdateEventRequest) -> ServiceResult<()> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let changes = EventChanges {
            title: request.title.flatten(),
            description: request.description,
            start: changed_date(request.start_date, "start_date")?,
            end: changed_date(request.end_date, "end_date")?,
            task_type: request.task_type.map(|t| TaskType::normalise(t.as_deref())),
            status: request.status.map(|s| EventStatus::normalise(s.as_deref())),
        };

        if changes.is_empty() {
            return Err(DomainError::NoFieldsToUpdate.into());
        }

        if !self.ctx.event_repo().update(id, &changes).await? {
            return Err(DomainError::EventNotFound(id).into());
        }

        info!(event_id = id, "Event updated");
        Ok(())
    }

    /// Delete an event
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        if !self.ctx.event_repo().delete(id).await? {
            return Err(DomainError::EventNotFound(id).into());
        }

        info!(event_id = id, "Event deleted");
        Ok(())
    }
}
