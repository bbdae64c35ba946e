//! Database models
//!
//! Row shapes as stored in PostgreSQL. Text columns for status and task type are
//! kept raw here; normalisation happens in the mappers.

mod event;
mod telegram;

pub use event::EventModel;
pub use telegram::TelegramConfigModel;
