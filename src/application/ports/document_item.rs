use chrono::{DateTime, Utc};

use crate::domain::{ChatId, MessageId};

/// Projection of a document-bearing message for the per-user document
/// listing.
#[derive(Debug, Clone)]
pub struct DocumentItem {
    pub document_id: MessageId,
    pub chat_id: ChatId,
    pub file_name: String,
    pub upload_date: DateTime<Utc>,
    pub chat_title: Option<String>,
}
