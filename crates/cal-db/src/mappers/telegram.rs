//! Telegram configuration model -> entity mapper

use cal_core::entities::TelegramConfig;

use crate::models::TelegramConfigModel;

impl From<TelegramConfigModel> for TelegramConfig {
    fn from(model: TelegramConfigModel) -> Self {
        TelegramConfig {
            id: model.id,
            bot_token: model.bot_token,
            chat_id: model.chat_id,
        }
    }
}
