use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BlobPathname, ChatId, CompiledDocumentId, DocumentAttachment, MessageId, MessageSender,
};

/// One entry of the chat-history snapshot embedded in a compiled document.
/// The entry for the source message carries the source flag and the file
/// name; all others leave both fields empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub sender: MessageSender,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_source_document: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// The per-chat derived artifact: original-file metadata, extracted text
/// and a snapshot of the chat history. At most one exists per chat.
///
/// Everything except `history_snapshot` and `updated_at` is write-once.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub id: CompiledDocumentId,
    pub chat_id: ChatId,
    pub source_message_id: MessageId,
    pub original_file_name: String,
    pub extracted_text: String,
    pub source_file_blob_pathname: BlobPathname,
    pub history_snapshot: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompiledDocument {
    pub fn from_source(
        chat_id: ChatId,
        source_message_id: MessageId,
        attachment: &DocumentAttachment,
        history_snapshot: Vec<HistoryEntry>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CompiledDocumentId::new(),
            chat_id,
            source_message_id,
            original_file_name: attachment.display_file_name(),
            extracted_text: attachment.extracted_text.clone(),
            source_file_blob_pathname: attachment.blob_pathname.clone(),
            history_snapshot,
            created_at: now,
            updated_at: now,
        }
    }
}
