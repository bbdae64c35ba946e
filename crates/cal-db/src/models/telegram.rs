//! Telegram configuration database model

use sqlx::FromRow;

/// Database model for telegram_config table
#[derive(Clone, FromRow)]
pub struct TelegramConfigModel {
    pub id: i32,
    pub bot_token: String,
    pub chat_id: String,
}
