//! Telegram Bot API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Telegram client errors
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram rejected the request: {0}")]
    Rejected(String),
}

pub type TelegramResult<T> = Result<T, TelegramError>;

/// One entry from `getUpdates`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub channel_post: Option<ChatMessage>,
}

impl Update {
    /// Chat the update came from; direct messages take precedence over channel posts
    pub fn chat_id(&self) -> Option<i64> {
        self.message
            .as_ref()
            .or(self.channel_post.as_ref())
            .map(|m| m.chat.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub chat: Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// `sendMessage` payload
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

impl SendMessage {
    /// Plain text message
    pub fn plain(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: None,
        }
    }

    /// Message whose text is already MarkdownV2-escaped
    pub fn markdown_v2(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: Some("MarkdownV2"),
        }
    }
}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> TelegramResult<Option<T>> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(TelegramError::Rejected(
                self.description
                    .unwrap_or_else(|| "no description".to_string()),
            ))
        }
    }
}

/// Operations the calendar needs from the Bot API
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Pending updates for the bot, oldest first
    async fn get_updates(&self, bot_token: &str) -> TelegramResult<Vec<Update>>;

    /// Deliver a message
    async fn send_message(&self, bot_token: &str, message: &SendMessage) -> TelegramResult<()>;
}

/// `reqwest`-backed Bot API client
#[derive(Debug, Clone)]
pub struct HttpTelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTelegramClient {
    /// Create a client against the given API root (e.g. `https://api.telegram.org`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn method_url(&self, bot_token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, bot_token, method)
    }
}

#[async_trait]
impl TelegramApi for HttpTelegramClient {
    #[instrument(skip_all)]
    async fn get_updates(&self, bot_token: &str) -> TelegramResult<Vec<Update>> {
        let envelope: Envelope<Vec<Update>> = self
            .http
            .get(self.method_url(bot_token, "getUpdates"))
            .send()
            .await?
            .json()
            .await?;

        let updates = envelope.into_result()?.unwrap_or_default();
        tracing::debug!(count = updates.len(), "Fetched Telegram updates");
        Ok(updates)
    }

    #[instrument(skip_all, fields(chat_id = %message.chat_id))]
    async fn send_message(&self, bot_token: &str, message: &SendMessage) -> TelegramResult<()> {
        let envelope: Envelope<serde_json::Value> = self
            .http
            .post(self.method_url(bot_token, "sendMessage"))
            .json(message)
            .send()
            .await?
            .json()
            .await?;

        envelope.into_result()?;
        tracing::debug!("Telegram message delivered");
        Ok(())
    }
}
