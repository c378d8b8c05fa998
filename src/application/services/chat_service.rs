use std::sync::Arc;

use crate::application::ports::{
    ChatRepository, ChatTurn, CompiledDocumentRepository, DocumentItem, LlmClient, LlmClientError,
    MessageRepository, RepositoryError,
};
use crate::domain::{
    BlobPathname, Chat, ChatId, CompiledDocument, DocumentAttachment, Message, MessageSender,
    UserId,
};

use super::access_guard::{AccessError, AccessGuard};
use super::sync_service::{DocumentSyncService, SyncOutcome};

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub chat_id: Option<ChatId>,
    pub message: String,
    pub extracted_text: Option<String>,
    pub blob_pathname: Option<String>,
    pub original_file_name: Option<String>,
}

#[derive(Debug)]
pub struct SendMessageOutcome {
    pub chat_id: ChatId,
    pub chat_title: Option<String>,
    pub user_message: Message,
    pub bot_message: Message,
    pub is_new_chat: bool,
}

#[derive(Debug, Clone)]
pub struct CreateChatRequest {
    pub blob_pathname: String,
    pub extracted_text: String,
    pub original_file_name: Option<String>,
    pub initial_user_message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("a document is required to start a new chat")]
    DocumentRequired,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("compiled document not found for chat {}", .0.as_uuid())]
    CompiledDocumentNotFound(ChatId),
    #[error("completion failed: {0}")]
    Completion(#[from] LlmClientError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Orchestrates the message-send flow (append, complete, reply, then
/// synchronize the compiled document) and the chat read surface.
pub struct ChatService<L>
where
    L: LlmClient,
{
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    compiled_documents: Arc<dyn CompiledDocumentRepository>,
    access: Arc<AccessGuard>,
    llm_client: Arc<L>,
    sync: Arc<DocumentSyncService>,
}

impl<L> ChatService<L>
where
    L: LlmClient,
{
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        compiled_documents: Arc<dyn CompiledDocumentRepository>,
        access: Arc<AccessGuard>,
        llm_client: Arc<L>,
        sync: Arc<DocumentSyncService>,
    ) -> Self {
        Self {
            chats,
            messages,
            compiled_documents,
            access,
            llm_client,
            sync,
        }
    }

    #[tracing::instrument(skip(self, request), fields(user_id = %user_id.as_uuid()))]
    pub async fn send_message(
        &self,
        user_id: UserId,
        request: SendMessageRequest,
    ) -> Result<SendMessageOutcome, ChatServiceError> {
        if request.chat_id.is_none() && request.blob_pathname.is_none() {
            return Err(ChatServiceError::DocumentRequired);
        }

        let title_file_name = request
            .original_file_name
            .clone()
            .or_else(|| request.blob_pathname.clone());
        let (chat, is_new_chat) = self
            .find_or_create_chat(
                user_id,
                request.chat_id,
                &request.message,
                title_file_name.as_deref(),
            )
            .await?;

        let user_message = match build_attachment(&request) {
            Some(attachment) => Message::with_document(
                chat.id,
                MessageSender::User,
                request.message.clone(),
                attachment,
            ),
            None => Message::new(chat.id, MessageSender::User, request.message.clone()),
        };

        // Prior turns exclude the message being sent.
        let prior_turns: Vec<ChatTurn> = self
            .messages
            .list_by_chat(chat.id)
            .await?
            .into_iter()
            .map(|m| ChatTurn {
                sender: m.sender,
                content: m.content,
            })
            .collect();

        self.messages.append(&user_message).await?;
        tracing::debug!(
            message_id = %user_message.id.as_uuid(),
            document_bearing = user_message.is_document_bearing(),
            "User message appended"
        );

        let completion = self
            .llm_client
            .get_completion(
                &request.message,
                &prior_turns,
                user_message
                    .document
                    .as_ref()
                    .map(|d| d.extracted_text.as_str()),
                user_message.document.as_ref().map(|d| &d.blob_pathname),
            )
            .await?;

        let bot_message = Message::new(chat.id, MessageSender::Bot, completion);
        self.messages.append(&bot_message).await?;

        self.run_synchronization(chat.id, user_message.clone()).await;

        Ok(SendMessageOutcome {
            chat_id: chat.id,
            chat_title: chat.title.clone(),
            user_message,
            bot_message,
            is_new_chat,
        })
    }

    /// Document-first chat creation: the upload seeds both the title and
    /// the first message, and the compiled document is derived right away.
    #[tracing::instrument(skip(self, request), fields(user_id = %user_id.as_uuid()))]
    pub async fn create_chat(
        &self,
        user_id: UserId,
        request: CreateChatRequest,
    ) -> Result<Chat, ChatServiceError> {
        let display_name = request
            .original_file_name
            .clone()
            .unwrap_or_else(|| request.blob_pathname.clone());

        let title = Chat::derive_title(&format!("Document: {}", display_name));
        let chat = Chat::new(user_id, Some(title));
        self.chats.create(&chat).await?;
        tracing::info!(chat_id = %chat.id.as_uuid(), "Created new chat");

        let content = request
            .initial_user_message
            .clone()
            .unwrap_or_else(|| format!("Uploaded: {}", display_name));
        let attachment = DocumentAttachment {
            blob_pathname: BlobPathname::from_raw(request.blob_pathname),
            extracted_text: request.extracted_text,
            original_file_name: request.original_file_name,
        };
        let first_message =
            Message::with_document(chat.id, MessageSender::User, content, attachment);
        self.messages.append(&first_message).await?;

        self.run_synchronization(chat.id, first_message).await;

        Ok(chat)
    }

    pub async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, ChatServiceError> {
        Ok(self.chats.list_by_user(user_id).await?)
    }

    pub async fn get_chat_messages(
        &self,
        user_id: UserId,
        chat_id: ChatId,
    ) -> Result<Vec<Message>, ChatServiceError> {
        self.access.ensure_owner(chat_id, user_id).await?;
        Ok(self.messages.list_by_chat(chat_id).await?)
    }

    pub async fn list_documents(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DocumentItem>, ChatServiceError> {
        Ok(self.messages.list_document_bearing_by_user(user_id).await?)
    }

    pub async fn get_compiled_document(
        &self,
        user_id: UserId,
        chat_id: ChatId,
    ) -> Result<CompiledDocument, ChatServiceError> {
        self.access.ensure_owner(chat_id, user_id).await?;
        self.compiled_documents
            .get_by_chat(chat_id)
            .await?
            .ok_or(ChatServiceError::CompiledDocumentNotFound(chat_id))
    }

    /// Synchronization is best-effort bookkeeping: it must survive request
    /// cancellation and its failures never fail the send flow. Spawned so
    /// that dropping the request future cannot abort it, then awaited so
    /// callers observe a settled compiled document.
    async fn run_synchronization(&self, chat_id: ChatId, candidate: Message) {
        let sync = Arc::clone(&self.sync);
        let handle = tokio::spawn(async move {
            match sync.synchronize(chat_id, &candidate).await {
                Ok(SyncOutcome::Skipped) => {
                    tracing::debug!(
                        chat_id = %chat_id.as_uuid(),
                        "Compiled-document synchronization skipped"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        chat_id = %chat_id.as_uuid(),
                        error = %e,
                        "Compiled-document synchronization failed"
                    );
                }
            }
        });

        if let Err(e) = handle.await {
            tracing::warn!(
                chat_id = %chat_id.as_uuid(),
                error = %e,
                "Compiled-document synchronization task aborted"
            );
        }
    }

    async fn find_or_create_chat(
        &self,
        user_id: UserId,
        existing: Option<ChatId>,
        first_message: &str,
        file_name: Option<&str>,
    ) -> Result<(Chat, bool), ChatServiceError> {
        match existing {
            Some(chat_id) => {
                let chat = self.access.ensure_owner(chat_id, user_id).await?;
                Ok((chat, false))
            }
            None => {
                let title = match file_name {
                    Some(name) => Chat::derive_title(&format!("Document: {}", name)),
                    None => Chat::derive_title(first_message),
                };
                let chat = Chat::new(user_id, Some(title));
                self.chats.create(&chat).await?;
                tracing::info!(
                    chat_id = %chat.id.as_uuid(),
                    title = chat.title.as_deref().unwrap_or_default(),
                    "Created new chat"
                );
                Ok((chat, true))
            }
        }
    }
}

/// The blob handle and extracted text come as a pair or not at all; a
/// request carrying only one of the two stores a plain message.
fn build_attachment(request: &SendMessageRequest) -> Option<DocumentAttachment> {
    match (&request.blob_pathname, &request.extracted_text) {
        (Some(blob), Some(text)) => Some(DocumentAttachment {
            blob_pathname: BlobPathname::from_raw(blob.clone()),
            extracted_text: text.clone(),
            original_file_name: request.original_file_name.clone(),
        }),
        (None, None) => None,
        _ => {
            tracing::warn!(
                "Upload carried only one of blob pathname / extracted text, storing message without document fields"
            );
            None
        }
    }
}
