//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use alumni_core::entities::ChatMessage;
use alumni_core::traits::{ChatRepository, RepoResult};

use crate::models::ChatMessageModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, sender, receiver, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(message.id.into_inner())
        .bind(&message.sender)
        .bind(&message.receiver)
        .bind(&message.message)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_conversation(&self, a: &str, b: &str) -> RepoResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessageModel>(
            r"
            SELECT id, sender, receiver, message, created_at
            FROM chat_messages
            WHERE (sender = $1 AND receiver = $2)
               OR (sender = $2 AND receiver = $1)
            ORDER BY id ASC
            ",
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_partners(&self, name: &str) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r"
            SELECT partner FROM (
                SELECT receiver AS partner FROM chat_messages WHERE sender = $1
                UNION
                SELECT sender AS partner FROM chat_messages WHERE receiver = $1
            ) partners
            ORDER BY partner
            ",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
