use std::sync::Arc;

use crate::application::ports::{
    CompiledDocumentRepository, CreateOutcome, MessageRepository, RepositoryError,
};
use crate::domain::{ChatId, CompiledDocument, HistoryEntry, Message, MessageId};

/// Maintains the 1:1 mapping from chat to compiled document: selects and
/// validates the source message and re-snapshots the chat history into the
/// artifact whenever the message log grows.
pub struct DocumentSyncService {
    messages: Arc<dyn MessageRepository>,
    compiled_documents: Arc<dyn CompiledDocumentRepository>,
}

#[derive(Debug)]
pub enum SyncOutcome {
    Created(CompiledDocument),
    Updated(CompiledDocument),
    /// No source message could be resolved; nothing was written.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The recorded source message row is gone.
    #[error("source message missing: {}", .0.as_uuid())]
    SourceMessageMissing(MessageId),
    /// The resolved source message lacks its blob handle or extracted text
    /// (partial upload). Recoverable: the send flow logs and continues.
    #[error("cannot synchronize from message {}: document fields incomplete", .0.as_uuid())]
    CannotSynchronize(MessageId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DocumentSyncService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        compiled_documents: Arc<dyn CompiledDocumentRepository>,
    ) -> Self {
        Self {
            messages,
            compiled_documents,
        }
    }

    /// Bring the chat's compiled document in line with its message log.
    ///
    /// Source selection, first match wins:
    /// 1. an existing compiled document's recorded source message,
    /// 2. the candidate, when no compiled document exists and the candidate
    ///    is document-bearing,
    /// 3. otherwise: skip.
    #[tracing::instrument(
        skip(self, candidate),
        fields(chat_id = %chat_id.as_uuid(), candidate_id = %candidate.id.as_uuid())
    )]
    pub async fn synchronize(
        &self,
        chat_id: ChatId,
        candidate: &Message,
    ) -> Result<SyncOutcome, SyncError> {
        let existing = self.compiled_documents.get_by_chat(chat_id).await?;

        let source = match &existing {
            Some(document) => self
                .messages
                .get(document.source_message_id)
                .await?
                .ok_or(SyncError::SourceMessageMissing(document.source_message_id))?,
            None if candidate.is_document_bearing() => candidate.clone(),
            None => {
                tracing::debug!("No source message resolvable, skipping synchronization");
                return Ok(SyncOutcome::Skipped);
            }
        };

        let attachment = source
            .document
            .clone()
            .ok_or(SyncError::CannotSynchronize(source.id))?;

        match existing {
            Some(mut document) => {
                let snapshot = self
                    .snapshot_history(chat_id, document.source_message_id, &document.original_file_name)
                    .await?;
                self.compiled_documents
                    .update_history_snapshot(document.id, &snapshot)
                    .await?;
                document.history_snapshot = snapshot;
                Ok(SyncOutcome::Updated(document))
            }
            None => {
                let file_name = attachment.display_file_name();
                let snapshot = self.snapshot_history(chat_id, source.id, &file_name).await?;
                let document =
                    CompiledDocument::from_source(chat_id, source.id, &attachment, snapshot);

                match self.compiled_documents.create(&document).await? {
                    CreateOutcome::Created => {
                        tracing::info!(
                            compiled_document_id = %document.id.as_uuid(),
                            source_message_id = %document.source_message_id.as_uuid(),
                            "Compiled document created"
                        );
                        Ok(SyncOutcome::Created(document))
                    }
                    CreateOutcome::AlreadyExists => self.resnapshot_winner(chat_id).await,
                }
            }
        }
    }

    /// Lost a concurrent-create race: the row that won is authoritative,
    /// including its choice of source message. Re-snapshot onto it.
    async fn resnapshot_winner(&self, chat_id: ChatId) -> Result<SyncOutcome, SyncError> {
        let mut winner = self
            .compiled_documents
            .get_by_chat(chat_id)
            .await?
            .ok_or_else(|| {
                SyncError::Repository(RepositoryError::NotFound(format!(
                    "compiled document for chat {}",
                    chat_id.as_uuid()
                )))
            })?;

        let snapshot = self
            .snapshot_history(chat_id, winner.source_message_id, &winner.original_file_name)
            .await?;
        self.compiled_documents
            .update_history_snapshot(winner.id, &snapshot)
            .await?;
        winner.history_snapshot = snapshot;
        Ok(SyncOutcome::Updated(winner))
    }

    async fn snapshot_history(
        &self,
        chat_id: ChatId,
        source_message_id: MessageId,
        source_file_name: &str,
    ) -> Result<Vec<HistoryEntry>, SyncError> {
        let messages = self.messages.list_by_chat(chat_id).await?;

        Ok(messages
            .into_iter()
            .map(|message| {
                let is_source = message.id == source_message_id;
                HistoryEntry {
                    sender: message.sender,
                    content: message.content,
                    created_at: message.created_at,
                    is_source_document: is_source,
                    file_name: is_source.then(|| source_file_name.to_string()),
                }
            })
            .collect())
    }
}
