use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{ChatRepository, RepositoryError};
use crate::domain::{Chat, ChatId, UserId};

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
    #[instrument(skip(self, chat), fields(chat_id = %chat.id.as_uuid()))]
    async fn create(&self, chat: &Chat) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chats (id, user_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(chat.id.as_uuid())
        .bind(chat.user_id.as_uuid())
        .bind(&chat.title)
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(chat_id = %id.as_uuid()))]
    async fn get(&self, id: ChatId) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(|r| chat_from_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()))]
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Chat>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM chats
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(chat_from_row).collect()
    }
}

fn chat_from_row(row: &PgRow) -> Result<Chat, RepositoryError> {
    Ok(Chat {
        id: ChatId::from_uuid(row.try_get("id").map_err(query_failed)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(query_failed)?),
        title: row.try_get("title").map_err(query_failed)?,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}
