//! Telegram notification service
//!
//! Chat-id discovery, test messages, configuration storage and the due-task digest.

use chrono::NaiveDate;
use tracing::{info, instrument};

use cal_core::DomainError;

use crate::dto::{ChatIdResponse, TelegramConfigResponse, TelegramCredentialsRequest};
use crate::telegram::{build_digest, SendMessage};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Greeting sent by the "test" button
pub const TEST_MESSAGE: &str = "Hello from your Project Calendar!";

/// Result of a digest run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    /// No outstanding task ends on the day
    NothingDue,
    /// A digest listing this many tasks was delivered
    Sent(usize),
}

impl DigestOutcome {
    /// User-facing summary
    pub fn message(self) -> &'static str {
        match self {
            Self::NothingDue => "No tasks due today.",
            Self::Sent(_) => "Notification sent successfully!",
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_credentials(request: TelegramCredentialsRequest) -> ServiceResult<(String, String)> {
    match (
        non_blank(request.bot_token),
        request.chat_id.and_then(|c| c.into_text()),
    ) {
        (Some(bot_token), Some(chat_id)) => Ok((bot_token, chat_id)),
        _ => Err(ServiceError::validation("Bot token and chat ID are required")),
    }
}

/// Telegram service
pub struct TelegramService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TelegramService<'a> {
    /// Create a new TelegramService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Chat id of the most recent message or channel post the bot has seen
    #[instrument(skip_all)]
    pub async fn latest_chat_id(&self, bot_token: Option<String>) -> ServiceResult<ChatIdResponse> {
        let bot_token =
            non_blank(bot_token).ok_or_else(|| ServiceError::validation("Bot token is required"))?;

        let updates = self.ctx.telegram_client().get_updates(&bot_token).await?;
        let last = updates
            .last()
            .ok_or_else(|| ServiceError::not_found("Telegram updates"))?;
        let chat_id = last
            .chat_id()
            .ok_or_else(|| ServiceError::not_found("Telegram messages"))?;

        Ok(ChatIdResponse {
            chat_id: chat_id.to_string(),
        })
    }

    /// Send the greeting with ad-hoc credentials
    #[instrument(skip_all)]
    pub async fn send_test_message(&self, request: TelegramCredentialsRequest) -> ServiceResult<()> {
        let (bot_token, chat_id) = require_credentials(request)?;

        self.ctx
            .telegram_client()
            .send_message(&bot_token, &SendMessage::plain(chat_id, TEST_MESSAGE))
            .await?;

        info!("Telegram test message sent");
        Ok(())
    }

    /// Insert or replace the stored configuration
    #[instrument(skip_all)]
    pub async fn save_config(
        &self,
        request: TelegramCredentialsRequest,
    ) -> ServiceResult<TelegramConfigResponse> {
        let (bot_token, chat_id) = require_credentials(request)?;
        let saved = self.ctx.telegram_repo().save(&bot_token, &chat_id).await?;
        Ok(saved.into())
    }

    /// Stored configuration, if any
    pub async fn get_config(&self) -> ServiceResult<Option<TelegramConfigResponse>> {
        Ok(self.ctx.telegram_repo().get().await?.map(Into::into))
    }

    /// Send the digest of outstanding tasks ending on `day`
    #[instrument(skip(self))]
    pub async fn check_due_tasks(&self, day: NaiveDate) -> ServiceResult<DigestOutcome> {
        let config = self
            .ctx
            .telegram_repo()
            .get()
            .await?
            .ok_or(DomainError::TelegramConfigNotFound)?;

        let due = self.ctx.event_repo().find_due_on(day).await?;
        let Some(text) = build_digest(day, &due) else {
            info!("No tasks due");
            return Ok(DigestOutcome::NothingDue);
        };

        self.ctx
            .telegram_client()
            .send_message(&config.bot_token, &SendMessage::markdown_v2(config.chat_id, text))
            .await?;

        info!(count = due.len(), "Due-task digest sent");
        Ok(DigestOutcome::Sent(due.len()))
    }
}
