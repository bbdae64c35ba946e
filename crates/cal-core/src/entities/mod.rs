//! Domain entities - core business objects

mod event;
mod telegram;

pub use event::{Event, EventChanges, EventFilter, EventStatus, NewEvent, TaskType};
pub use telegram::TelegramConfig;
