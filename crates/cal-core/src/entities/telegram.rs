//! Telegram notification settings

/// Bot credentials and destination chat for due-task notifications.
///
/// Only one configuration exists at a time; saving replaces it.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub id: i32,
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("id", &self.id)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}
