//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use cal_core::{Event, TelegramConfig};

use super::responses::{EventResponse, TelegramConfigResponse};

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start: event.start,
            end: event.end,
            task_type: event.task_type,
            status: event.status,
        }
    }
}

impl From<TelegramConfig> for TelegramConfigResponse {
    fn from(config: TelegramConfig) -> Self {
        Self {
            id: config.id,
            bot_token: config.bot_token,
            chat_id: config.chat_id,
        }
    }
}
