//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use cal_core::entities::{Event, EventChanges, EventFilter, EventStatus, NewEvent};
use cal_core::traits::{EventRepository, RepoResult};

use crate::models::EventModel;

use super::error::map_db_error;

const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, task_type, status";

/// PostgreSQL implementation of EventRepository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Create a new PgEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the listing query; empty filter lists add no condition
fn list_query(filter: &EventFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events"));
    let mut has_where = false;

    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter.statuses.iter().map(|s| s.as_str().to_string()).collect();
        qb.push(" WHERE status = ANY(").push_bind(statuses).push(")");
        has_where = true;
    }

    if !filter.task_types.is_empty() {
        let types: Vec<String> = filter.task_types.iter().map(|t| t.as_str().to_string()).collect();
        qb.push(if has_where { " AND " } else { " WHERE " })
            .push("task_type = ANY(")
            .push_bind(types)
            .push(")");
    }

    qb.push(" ORDER BY start_date, id");
    qb
}

/// Build the partial update; `None` when there is nothing to set
fn update_query(id: i32, changes: &EventChanges) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE events SET ");
    let mut set = qb.separated(", ");

    if let Some(title) = &changes.title {
        set.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(description) = &changes.description {
        set.push("description = ").push_bind_unseparated(description.clone());
    }
    if let Some(start) = changes.start {
        set.push("start_date = ").push_bind_unseparated(start);
    }
    if let Some(end) = changes.end {
        set.push("end_date = ").push_bind_unseparated(end);
    }
    if let Some(status) = changes.status {
        set.push("status = ").push_bind_unseparated(status.as_str());
    }
    if let Some(task_type) = changes.task_type {
        set.push("task_type = ").push_bind_unseparated(task_type.as_str());
    }

    qb.push(" WHERE id = ").push_bind(id);
    Some(qb)
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        let rows = list_query(filter)
            .build_query_as::<EventModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self, event), fields(title = %event.title))]
    async fn create(&self, event: &NewEvent) -> RepoResult<Event> {
        let row = sqlx::query_as::<_, EventModel>(
            r"
            INSERT INTO events (title, description, start_date, end_date, task_type, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, start_date, end_date, task_type, status
            ",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.task_type.as_str())
        .bind(event.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Event::from(row))
    }

    #[instrument(skip(self))]
    async fn update(&self, id: i32, changes: &EventChanges) -> RepoResult<bool> {
        let Some(mut qb) = update_query(id, changes) else {
            return Ok(false);
        };

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_due_on(&self, day: NaiveDate) -> RepoResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventModel>(
            r"
            SELECT id, title, description, start_date, end_date, task_type, status
            FROM events
            WHERE end_date = $1
              AND COALESCE(status, 'pending') NOT IN ($2, $3)
            ORDER BY id
            ",
        )
        .bind(day)
        .bind(EventStatus::Complete.as_str())
        .bind(EventStatus::Rejected.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
