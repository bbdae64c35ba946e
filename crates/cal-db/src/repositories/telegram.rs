//! PostgreSQL implementation of TelegramConfigRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use cal_core::entities::TelegramConfig;
use cal_core::traits::{RepoResult, TelegramConfigRepository};

use crate::models::TelegramConfigModel;

use super::error::map_db_error;

/// PostgreSQL implementation of TelegramConfigRepository
#[derive(Clone)]
pub struct PgTelegramConfigRepository {
    pool: PgPool,
}

impl PgTelegramConfigRepository {
    /// Create a new PgTelegramConfigRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelegramConfigRepository for PgTelegramConfigRepository {
    #[instrument(skip(self))]
    async fn get(&self) -> RepoResult<Option<TelegramConfig>> {
        let result = sqlx::query_as::<_, TelegramConfigModel>(
            "SELECT id, bot_token, chat_id FROM telegram_config ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TelegramConfig::from))
    }

    #[instrument(skip(self, bot_token))]
    async fn save(&self, bot_token: &str, chat_id: &str) -> RepoResult<TelegramConfig> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM telegram_config ORDER BY id LIMIT 1 FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let saved = match existing {
            Some(id) => {
                sqlx::query_as::<_, TelegramConfigModel>(
                    r"
                    UPDATE telegram_config SET bot_token = $1, chat_id = $2
                    WHERE id = $3
                    RETURNING id, bot_token, chat_id
                    ",
                )
                .bind(bot_token)
                .bind(chat_id)
                .bind(id)
                .fetch_one(&mut *tx)
                .await
            }
            None => {
                sqlx::query_as::<_, TelegramConfigModel>(
                    r"
                    INSERT INTO telegram_config (bot_token, chat_id)
                    VALUES ($1, $2)
                    RETURNING id, bot_token, chat_id
                    ",
                )
                .bind(bot_token)
                .bind(chat_id)
                .fetch_one(&mut *tx)
                .await
            }
        }
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        tracing::info!(id = saved.id, "Saved Telegram configuration");
        Ok(TelegramConfig::from(saved))
    }
}
