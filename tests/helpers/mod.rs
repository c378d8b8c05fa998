#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use docuchat::application::ports::{
    BlobStore, BlobStoreError, ChatRepository, ChatTurn, CompiledDocumentRepository,
    CompiledPdfPayload, CreateOutcome, DocumentItem, LlmClient, LlmClientError, MessageRepository,
    PdfRenderer, PdfRendererError, RepositoryError, TextExtractor, TextExtractorError,
};
use docuchat::domain::{
    BlobPathname, Chat, ChatId, CompiledDocument, CompiledDocumentId, DocumentAttachment, Message,
    MessageId, MessageSender, UserId,
};

pub struct InMemoryChatRepository {
    chats: Mutex<Vec<Chat>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self {
            chats: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Vec<Chat> {
        self.chats.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create(&self, chat: &Chat) -> Result<(), RepositoryError> {
        self.chats.lock().unwrap().push(chat.clone());
        Ok(())
    }

    async fn get(&self, id: ChatId) -> Result<Option<Chat>, RepositoryError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Chat>, RepositoryError> {
        let mut chats: Vec<Chat> = self
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(chats)
    }
}

pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<Message>>,
    chats: Arc<InMemoryChatRepository>,
}

impl InMemoryMessageRepository {
    pub fn new(chats: Arc<InMemoryChatRepository>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            chats,
        }
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn get(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn list_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn list_document_bearing_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DocumentItem>, RepositoryError> {
        let chats = self.chats.snapshot();
        let mut items: Vec<DocumentItem> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| {
                let attachment = m.document.as_ref()?;
                let chat = chats
                    .iter()
                    .find(|c| c.id == m.chat_id && c.user_id == user_id)?;
                Some(DocumentItem {
                    document_id: m.id,
                    chat_id: m.chat_id,
                    file_name: attachment.display_file_name(),
                    upload_date: m.created_at,
                    chat_title: chat.title.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(items)
    }
}

pub struct InMemoryCompiledDocumentRepository {
    documents: Mutex<Vec<CompiledDocument>>,
}

impl InMemoryCompiledDocumentRepository {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl CompiledDocumentRepository for InMemoryCompiledDocumentRepository {
    async fn create(&self, document: &CompiledDocument) -> Result<CreateOutcome, RepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        if documents.iter().any(|d| d.chat_id == document.chat_id) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        documents.push(document.clone());
        Ok(CreateOutcome::Created)
    }

    async fn get_by_chat(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<CompiledDocument>, RepositoryError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.chat_id == chat_id)
            .cloned())
    }

    async fn update_history_snapshot(
        &self,
        id: CompiledDocumentId,
        snapshot: &[docuchat::domain::HistoryEntry],
    ) -> Result<(), RepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("{:?}", id)))?;
        document.history_snapshot = snapshot.to_vec();
        document.updated_at = Utc::now();
        Ok(())
    }
}

pub struct InMemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_fetches: AtomicBool,
    fetch_attempted: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_fetches: AtomicBool::new(false),
            fetch_attempted: AtomicBool::new(false),
        }
    }

    pub fn fail_fetches(&self) {
        self.fail_fetches.store(true, Ordering::SeqCst);
    }

    pub fn fetch_was_attempted(&self) -> bool {
        self.fetch_attempted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, pathname: &BlobPathname, data: Bytes) -> Result<(), BlobStoreError> {
        self.objects
            .lock()
            .unwrap()
            .insert(pathname.as_str().to_string(), data.to_vec());
        Ok(())
    }

    async fn fetch(
        &self,
        pathname: &BlobPathname,
        _purpose: &str,
    ) -> Result<Vec<u8>, BlobStoreError> {
        self.fetch_attempted.store(true, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(BlobStoreError::DownloadFailed("injected failure".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(pathname.as_str())
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(pathname.as_str().to_string()))
    }
}

pub struct MockLlmClient {
    pub reply: String,
}

impl MockLlmClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn get_completion(
        &self,
        _user_text: &str,
        _prior_turns: &[ChatTurn],
        _source_text: Option<&str>,
        _source_blob: Option<&BlobPathname>,
    ) -> Result<String, LlmClientError> {
        Ok(self.reply.clone())
    }
}

pub struct FailingLlmClient;

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn get_completion(
        &self,
        _user_text: &str,
        _prior_turns: &[ChatTurn],
        _source_text: Option<&str>,
        _source_blob: Option<&BlobPathname>,
    ) -> Result<String, LlmClientError> {
        Err(LlmClientError::ApiRequestFailed("injected failure".to_string()))
    }
}

pub struct MockTextExtractor {
    pub text: String,
}

impl MockTextExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    async fn extract_text(
        &self,
        _data: &[u8],
        _original_file_name: &str,
    ) -> Result<String, TextExtractorError> {
        Ok(self.text.clone())
    }
}

pub struct MockPdfRenderer {
    last_payload: Mutex<Option<CompiledPdfPayload>>,
    render_count: AtomicUsize,
}

impl MockPdfRenderer {
    pub fn new() -> Self {
        Self {
            last_payload: Mutex::new(None),
            render_count: AtomicUsize::new(0),
        }
    }

    pub fn last_payload(&self) -> Option<CompiledPdfPayload> {
        self.last_payload.lock().unwrap().clone()
    }

    pub fn render_invocations(&self) -> usize {
        self.render_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PdfRenderer for MockPdfRenderer {
    async fn render_compiled_pdf(
        &self,
        payload: &CompiledPdfPayload,
    ) -> Result<Vec<u8>, PdfRendererError> {
        self.render_count.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        Ok(b"%PDF-1.4 mock".to_vec())
    }
}

pub struct FailingPdfRenderer;

#[async_trait]
impl PdfRenderer for FailingPdfRenderer {
    async fn render_compiled_pdf(
        &self,
        _payload: &CompiledPdfPayload,
    ) -> Result<Vec<u8>, PdfRendererError> {
        Err(PdfRendererError::RenderFailed("injected failure".to_string()))
    }
}

pub fn document_attachment(blob: &str, text: &str, name: Option<&str>) -> DocumentAttachment {
    DocumentAttachment {
        blob_pathname: BlobPathname::from_raw(blob),
        extracted_text: text.to_string(),
        original_file_name: name.map(String::from),
    }
}

pub fn document_message(
    chat_id: ChatId,
    content: &str,
    blob: &str,
    text: &str,
    name: Option<&str>,
) -> Message {
    Message::with_document(
        chat_id,
        MessageSender::User,
        content.to_string(),
        document_attachment(blob, text, name),
    )
}
