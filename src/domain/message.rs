use chrono::{DateTime, Utc};

use super::{BlobPathname, ChatId, MessageId, MessageSender};

/// Document fields of an upload-carrying message. The blob handle and the
/// extracted text are both required: a message either has a complete
/// attachment or none at all.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAttachment {
    pub blob_pathname: BlobPathname,
    pub extracted_text: String,
    pub original_file_name: Option<String>,
}

impl DocumentAttachment {
    /// Human-readable name of the upload, falling back to the storage
    /// handle when the client did not supply one.
    pub fn display_file_name(&self) -> String {
        self.original_file_name
            .clone()
            .unwrap_or_else(|| self.blob_pathname.as_str().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender: MessageSender,
    pub content: String,
    pub document: Option<DocumentAttachment>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: ChatId, sender: MessageSender, content: String) -> Self {
        Self {
            id: MessageId::new(),
            chat_id,
            sender,
            content,
            document: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_document(
        chat_id: ChatId,
        sender: MessageSender,
        content: String,
        document: DocumentAttachment,
    ) -> Self {
        Self {
            id: MessageId::new(),
            chat_id,
            sender,
            content,
            document: Some(document),
            created_at: Utc::now(),
        }
    }

    pub fn is_document_bearing(&self) -> bool {
        self.document.is_some()
    }
}
