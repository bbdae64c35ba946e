//! Event database model

use chrono::NaiveDate;
use sqlx::FromRow;

/// Database model for events table
#[derive(Debug, Clone, FromRow)]
pub struct EventModel {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub task_type: Option<String>,
    pub status: Option<String>,
}
