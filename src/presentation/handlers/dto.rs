use serde::Serialize;

use crate::application::ports::DocumentItem;
use crate::application::services::SendMessageOutcome;
use crate::domain::{Chat, CompiledDocument, HistoryEntry, Message, MessageSender};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub chat_id: String,
    pub sender: MessageSender,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_pathname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    pub created_at: String,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        let document = message.document.as_ref();
        Self {
            id: message.id.as_uuid().to_string(),
            chat_id: message.chat_id.as_uuid().to_string(),
            sender: message.sender,
            content: message.content.clone(),
            blob_pathname: document.map(|d| d.blob_pathname.as_str().to_string()),
            extracted_text: document.map(|d| d.extracted_text.clone()),
            original_file_name: document.and_then(|d| d.original_file_name.clone()),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummaryDto {
    pub id: String,
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Chat> for ChatSummaryDto {
    fn from(chat: &Chat) -> Self {
        Self {
            id: chat.id.as_uuid().to_string(),
            title: chat.title.clone(),
            created_at: chat.created_at.to_rfc3339(),
            updated_at: chat.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledDocumentDto {
    pub id: String,
    pub chat_id: String,
    pub source_message_id: String,
    pub original_file_name: String,
    pub source_file_blob_pathname: String,
    pub extracted_text: String,
    pub history_snapshot: Vec<HistoryEntry>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&CompiledDocument> for CompiledDocumentDto {
    fn from(document: &CompiledDocument) -> Self {
        Self {
            id: document.id.as_uuid().to_string(),
            chat_id: document.chat_id.as_uuid().to_string(),
            source_message_id: document.source_message_id.as_uuid().to_string(),
            original_file_name: document.original_file_name.clone(),
            source_file_blob_pathname: document.source_file_blob_pathname.as_str().to_string(),
            extracted_text: document.extracted_text.clone(),
            history_snapshot: document.history_snapshot.clone(),
            created_at: document.created_at.to_rfc3339(),
            updated_at: document.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItemDto {
    pub document_id: String,
    pub chat_id: String,
    pub file_name: String,
    pub upload_date: String,
    pub chat_title: Option<String>,
}

impl From<&DocumentItem> for DocumentItemDto {
    fn from(item: &DocumentItem) -> Self {
        Self {
            document_id: item.document_id.as_uuid().to_string(),
            chat_id: item.chat_id.as_uuid().to_string(),
            file_name: item.file_name.clone(),
            upload_date: item.upload_date.to_rfc3339(),
            chat_title: item.chat_title.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotResponseDto {
    pub id: String,
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub chat_id: String,
    pub chat_title: Option<String>,
    pub user_message: MessageDto,
    pub bot_response: BotResponseDto,
    pub is_new_chat: bool,
}

impl From<&SendMessageOutcome> for SendMessageResponse {
    fn from(outcome: &SendMessageOutcome) -> Self {
        Self {
            chat_id: outcome.chat_id.as_uuid().to_string(),
            chat_title: outcome.chat_title.clone(),
            user_message: MessageDto::from(&outcome.user_message),
            bot_response: BotResponseDto {
                id: outcome.bot_message.id.as_uuid().to_string(),
                content: outcome.bot_message.content.clone(),
            },
            is_new_chat: outcome.is_new_chat,
        }
    }
}
