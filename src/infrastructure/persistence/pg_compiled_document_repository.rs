use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{
    CompiledDocumentRepository, CreateOutcome, RepositoryError,
};
use crate::domain::{
    BlobPathname, ChatId, CompiledDocument, CompiledDocumentId, HistoryEntry, MessageId,
};

pub struct PgCompiledDocumentRepository {
    pool: PgPool,
}

impl PgCompiledDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompiledDocumentRepository for PgCompiledDocumentRepository {
    #[instrument(
        skip(self, document),
        fields(
            compiled_document_id = %document.id.as_uuid(),
            chat_id = %document.chat_id.as_uuid()
        )
    )]
    async fn create(&self, document: &CompiledDocument) -> Result<CreateOutcome, RepositoryError> {
        let snapshot = snapshot_to_json(&document.history_snapshot)?;

        let result = sqlx::query(
            r#"
            INSERT INTO compiled_documents
                (id, chat_id, source_message_id, original_file_name, extracted_text,
                 source_file_blob_pathname, history_snapshot, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.chat_id.as_uuid())
        .bind(document.source_message_id.as_uuid())
        .bind(&document.original_file_name)
        .bind(&document.extracted_text)
        .bind(document.source_file_blob_pathname.as_str())
        .bind(snapshot)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(CreateOutcome::Created),
            // The unique constraint on chat_id is the sole consistency
            // mechanism for concurrent creation; losing the race is an
            // ordinary outcome, not a fault.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(query_failed(e)),
        }
    }

    #[instrument(skip(self), fields(chat_id = %chat_id.as_uuid()))]
    async fn get_by_chat(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<CompiledDocument>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, chat_id, source_message_id, original_file_name, extracted_text,
                   source_file_blob_pathname, history_snapshot, created_at, updated_at
            FROM compiled_documents
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(|r| compiled_document_from_row(&r)).transpose()
    }

    #[instrument(skip(self, snapshot), fields(compiled_document_id = %id.as_uuid()))]
    async fn update_history_snapshot(
        &self,
        id: CompiledDocumentId,
        snapshot: &[HistoryEntry],
    ) -> Result<(), RepositoryError> {
        let snapshot = snapshot_to_json(snapshot)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE compiled_documents
            SET history_snapshot = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(snapshot)
        .bind(now)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }
}

fn compiled_document_from_row(row: &PgRow) -> Result<CompiledDocument, RepositoryError> {
    let snapshot: serde_json::Value = row.try_get("history_snapshot").map_err(query_failed)?;
    let history_snapshot: Vec<HistoryEntry> = serde_json::from_value(snapshot)
        .map_err(|e| RepositoryError::QueryFailed(format!("history snapshot decode: {}", e)))?;

    let blob: String = row
        .try_get("source_file_blob_pathname")
        .map_err(query_failed)?;

    Ok(CompiledDocument {
        id: CompiledDocumentId::from_uuid(row.try_get("id").map_err(query_failed)?),
        chat_id: ChatId::from_uuid(row.try_get("chat_id").map_err(query_failed)?),
        source_message_id: MessageId::from_uuid(
            row.try_get("source_message_id").map_err(query_failed)?,
        ),
        original_file_name: row.try_get("original_file_name").map_err(query_failed)?,
        extracted_text: row.try_get("extracted_text").map_err(query_failed)?,
        source_file_blob_pathname: BlobPathname::from_raw(blob),
        history_snapshot,
        created_at: row.try_get("created_at").map_err(query_failed)?,
        updated_at: row.try_get("updated_at").map_err(query_failed)?,
    })
}

fn snapshot_to_json(snapshot: &[HistoryEntry]) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(snapshot)
        .map_err(|e| RepositoryError::QueryFailed(format!("history snapshot encode: {}", e)))
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}
