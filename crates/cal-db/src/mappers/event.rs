//! Event model -> entity mapper

use cal_core::entities::{Event, EventStatus, TaskType};

use crate::models::EventModel;

/// Convert EventModel to Event entity, normalising legacy values
impl From<EventModel> for Event {
    fn from(model: EventModel) -> Self {
        Event {
            id: model.id,
            title: model.title,
            description: model.description,
            start: model.start_date,
            end: model.end_date,
            task_type: TaskType::normalise(model.task_type.as_deref()),
            status: EventStatus::normalise(model.status.as_deref()),
        }
    }
}
