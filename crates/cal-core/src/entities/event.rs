//! Event entity - a task placed on the calendar

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
    Rejected,
}

impl EventStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Complete,
        Self::Rejected,
    ];

    /// Wire/database representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
            Self::Rejected => "rejected",
        }
    }

    /// Lenient parse: unknown or missing values fall back to `pending`.
    pub fn normalise(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().to_lowercase().parse().ok())
            .unwrap_or_default()
    }

    /// Whether the task still counts as outstanding for due-date reminders
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Complete | Self::Rejected)
    }
}

impl FromStr for EventStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Feature,
    Bug,
    Scheduled,
    Announcement,
}

impl TaskType {
    pub const ALL: [Self; 4] = [
        Self::Feature,
        Self::Bug,
        Self::Scheduled,
        Self::Announcement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Bug => "bug",
            Self::Scheduled => "scheduled",
            Self::Announcement => "announcement",
        }
    }

    /// Lenient parse: unknown or missing values fall back to `feature`.
    pub fn normalise(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().to_lowercase().parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for TaskType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub task_type: TaskType,
    pub status: EventStatus,
}

impl Event {
    /// Check if the event ends on the given day and is still outstanding
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.end == day && self.status.is_open()
    }
}

/// Values for inserting a new event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub task_type: TaskType,
    pub status: EventStatus,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::option_option)]
pub struct EventChanges {
    pub title: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub task_type: Option<TaskType>,
    pub status: Option<EventStatus>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.task_type.is_none()
            && self.status.is_none()
    }
}

/// Listing filter. Empty vectors mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub statuses: Vec<EventStatus>,
    pub task_types: Vec<TaskType>,
}
