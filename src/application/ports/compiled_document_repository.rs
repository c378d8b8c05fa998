use async_trait::async_trait;

use crate::domain::{ChatId, CompiledDocument, CompiledDocumentId, HistoryEntry};

use super::RepositoryError;

/// Result of a compiled-document insert. A concurrent creation for the
/// same chat surfaces as `AlreadyExists` (unique constraint on chat id),
/// not as an error: the caller falls back to the update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[async_trait]
pub trait CompiledDocumentRepository: Send + Sync {
    async fn create(&self, document: &CompiledDocument) -> Result<CreateOutcome, RepositoryError>;

    async fn get_by_chat(&self, chat_id: ChatId)
        -> Result<Option<CompiledDocument>, RepositoryError>;

    /// Overwrite the history snapshot and bump `updated_at`. Every other
    /// field is write-once and never touched after creation.
    async fn update_history_snapshot(
        &self,
        id: CompiledDocumentId,
        snapshot: &[HistoryEntry],
    ) -> Result<(), RepositoryError>;
}
