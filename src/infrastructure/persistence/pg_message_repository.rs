use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{DocumentItem, MessageRepository, RepositoryError};
use crate::domain::{
    BlobPathname, ChatId, DocumentAttachment, Message, MessageId, MessageSender, UserId,
};

pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(
        skip(self, message),
        fields(message_id = %message.id.as_uuid(), chat_id = %message.chat_id.as_uuid())
    )]
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        let (blob_pathname, extracted_text, original_file_name) = match &message.document {
            Some(attachment) => (
                Some(attachment.blob_pathname.as_str().to_string()),
                Some(attachment.extracted_text.clone()),
                attachment.original_file_name.clone(),
            ),
            None => (None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO messages
                (id, chat_id, sender, content, blob_pathname, extracted_text, original_file_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.chat_id.as_uuid())
        .bind(message.sender.as_str())
        .bind(&message.content)
        .bind(blob_pathname)
        .bind(extracted_text)
        .bind(original_file_name)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE chats
            SET updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(now)
        .bind(message.chat_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(message_id = %id.as_uuid()))]
    async fn get(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, chat_id, sender, content, blob_pathname, extracted_text,
                   original_file_name, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(|r| message_from_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(chat_id = %chat_id.as_uuid()))]
    async fn list_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, chat_id, sender, content, blob_pathname, extracted_text,
                   original_file_name, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(chat_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter().map(message_from_row).collect()
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()))]
    async fn list_document_bearing_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DocumentItem>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.chat_id,
                   COALESCE(m.original_file_name, m.blob_pathname) AS file_name,
                   m.created_at, c.title AS chat_title
            FROM messages m
            JOIN chats c ON c.id = m.chat_id
            WHERE c.user_id = $1
              AND m.blob_pathname IS NOT NULL
              AND m.extracted_text IS NOT NULL
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter()
            .map(|row| {
                Ok(DocumentItem {
                    document_id: MessageId::from_uuid(row.try_get("id").map_err(query_failed)?),
                    chat_id: ChatId::from_uuid(row.try_get("chat_id").map_err(query_failed)?),
                    file_name: row.try_get("file_name").map_err(query_failed)?,
                    upload_date: row.try_get("created_at").map_err(query_failed)?,
                    chat_title: row.try_get("chat_title").map_err(query_failed)?,
                })
            })
            .collect()
    }
}

fn message_from_row(row: &PgRow) -> Result<Message, RepositoryError> {
    let sender: String = row.try_get("sender").map_err(query_failed)?;
    let sender = sender
        .parse::<MessageSender>()
        .map_err(RepositoryError::QueryFailed)?;

    let blob_pathname: Option<String> = row.try_get("blob_pathname").map_err(query_failed)?;
    let extracted_text: Option<String> = row.try_get("extracted_text").map_err(query_failed)?;
    let original_file_name: Option<String> =
        row.try_get("original_file_name").map_err(query_failed)?;

    // A row carrying only one of the pair is a partial upload; it maps to
    // "no attachment" and the synchronizer treats it as unusable.
    let document = match (blob_pathname, extracted_text) {
        (Some(blob), Some(text)) => Some(DocumentAttachment {
            blob_pathname: BlobPathname::from_raw(blob),
            extracted_text: text,
            original_file_name,
        }),
        _ => None,
    };

    Ok(Message {
        id: MessageId::from_uuid(row.try_get("id").map_err(query_failed)?),
        chat_id: ChatId::from_uuid(row.try_get("chat_id").map_err(query_failed)?),
        sender,
        content: row.try_get("content").map_err(query_failed)?,
        document,
        created_at: row.try_get("created_at").map_err(query_failed)?,
    })
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}
