mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use docuchat::application::ports::{
    ChatRepository, CompiledDocumentRepository, CreateOutcome, MessageRepository, RepositoryError,
};
use docuchat::application::services::{DocumentSyncService, SyncError, SyncOutcome};
use docuchat::domain::{
    Chat, ChatId, CompiledDocument, CompiledDocumentId, HistoryEntry, Message, MessageSender,
    UserId,
};

use helpers::{
    document_attachment, document_message, InMemoryChatRepository,
    InMemoryCompiledDocumentRepository, InMemoryMessageRepository,
};

struct SyncFixture {
    chats: Arc<InMemoryChatRepository>,
    messages: Arc<InMemoryMessageRepository>,
    compiled_documents: Arc<InMemoryCompiledDocumentRepository>,
    sync: DocumentSyncService,
}

fn fixture() -> SyncFixture {
    let chats = Arc::new(InMemoryChatRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new(Arc::clone(&chats)));
    let compiled_documents = Arc::new(InMemoryCompiledDocumentRepository::new());
    let sync = DocumentSyncService::new(
        Arc::clone(&messages) as Arc<dyn MessageRepository>,
        Arc::clone(&compiled_documents) as Arc<dyn CompiledDocumentRepository>,
    );
    SyncFixture {
        chats,
        messages,
        compiled_documents,
        sync,
    }
}

async fn seed_chat(fixture: &SyncFixture) -> Chat {
    let chat = Chat::new(UserId::new(), Some("Document: inv.pdf".to_string()));
    fixture.chats.create(&chat).await.unwrap();
    chat
}

#[tokio::test]
async fn given_empty_chat_when_document_message_arrives_then_compiled_document_is_created() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let message = document_message(
        chat.id,
        "What is the total?",
        "b1",
        "Invoice total: $42",
        Some("inv.pdf"),
    );
    fixture.messages.append(&message).await.unwrap();

    let outcome = fixture.sync.synchronize(chat.id, &message).await.unwrap();

    let document = match outcome {
        SyncOutcome::Created(document) => document,
        other => panic!("expected Created, got {:?}", other),
    };

    assert_eq!(document.chat_id, chat.id);
    assert_eq!(document.source_message_id, message.id);
    assert_eq!(document.original_file_name, "inv.pdf");
    assert_eq!(document.extracted_text, "Invoice total: $42");
    assert_eq!(document.source_file_blob_pathname.as_str(), "b1");
    assert_eq!(document.history_snapshot.len(), 1);
    assert!(document.history_snapshot[0].is_source_document);
    assert_eq!(
        document.history_snapshot[0].file_name.as_deref(),
        Some("inv.pdf")
    );
    assert_eq!(fixture.compiled_documents.count(), 1);
}

#[tokio::test]
async fn given_existing_compiled_document_when_bot_reply_arrives_then_history_is_resnapshotted() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let source = document_message(chat.id, "Here you go", "b1", "Invoice total: $42", Some("inv.pdf"));
    fixture.messages.append(&source).await.unwrap();
    fixture.sync.synchronize(chat.id, &source).await.unwrap();

    let reply = Message::new(chat.id, MessageSender::Bot, "Processed inv.pdf".to_string());
    fixture.messages.append(&reply).await.unwrap();

    let outcome = fixture.sync.synchronize(chat.id, &reply).await.unwrap();

    let document = match outcome {
        SyncOutcome::Updated(document) => document,
        other => panic!("expected Updated, got {:?}", other),
    };

    assert_eq!(document.source_message_id, source.id);
    assert_eq!(document.history_snapshot.len(), 2);
    assert!(document.history_snapshot[0].is_source_document);
    assert!(!document.history_snapshot[1].is_source_document);
    assert_eq!(document.history_snapshot[1].sender, MessageSender::Bot);
    assert_eq!(fixture.compiled_documents.count(), 1);
}

#[tokio::test]
async fn given_compiled_document_when_second_upload_arrives_then_original_source_wins() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let first = document_message(chat.id, "First upload", "b1", "Invoice total: $42", Some("inv.pdf"));
    fixture.messages.append(&first).await.unwrap();
    fixture.sync.synchronize(chat.id, &first).await.unwrap();

    let second = document_message(chat.id, "Oops, again", "b2", "Receipt total: $7", Some("receipt.pdf"));
    fixture.messages.append(&second).await.unwrap();

    let outcome = fixture.sync.synchronize(chat.id, &second).await.unwrap();

    let document = match outcome {
        SyncOutcome::Updated(document) => document,
        other => panic!("expected Updated, got {:?}", other),
    };

    assert_eq!(document.source_message_id, first.id);
    assert_eq!(document.original_file_name, "inv.pdf");
    assert_eq!(document.extracted_text, "Invoice total: $42");
    assert_eq!(fixture.compiled_documents.count(), 1);

    // Only the original source entry carries the flag.
    let flagged: Vec<&HistoryEntry> = document
        .history_snapshot
        .iter()
        .filter(|e| e.is_source_document)
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].content, "First upload");
}

#[tokio::test]
async fn given_no_new_messages_when_synchronizing_twice_then_snapshot_is_identical() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let source = document_message(chat.id, "Upload", "b1", "text", Some("inv.pdf"));
    fixture.messages.append(&source).await.unwrap();
    fixture.sync.synchronize(chat.id, &source).await.unwrap();

    let first = match fixture.sync.synchronize(chat.id, &source).await.unwrap() {
        SyncOutcome::Updated(document) => document.history_snapshot,
        other => panic!("expected Updated, got {:?}", other),
    };
    let second = match fixture.sync.synchronize(chat.id, &source).await.unwrap() {
        SyncOutcome::Updated(document) => document.history_snapshot,
        other => panic!("expected Updated, got {:?}", other),
    };

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[tokio::test]
async fn given_repeated_synchronizations_then_write_once_fields_never_change() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let source = document_message(chat.id, "Upload", "b1", "text", Some("inv.pdf"));
    fixture.messages.append(&source).await.unwrap();
    fixture.sync.synchronize(chat.id, &source).await.unwrap();
    let original = fixture
        .compiled_documents
        .get_by_chat(chat.id)
        .await
        .unwrap()
        .unwrap();

    for i in 0..3 {
        let reply = Message::new(chat.id, MessageSender::Bot, format!("reply {}", i));
        fixture.messages.append(&reply).await.unwrap();
        fixture.sync.synchronize(chat.id, &reply).await.unwrap();
    }

    let current = fixture
        .compiled_documents
        .get_by_chat(chat.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(current.id, original.id);
    assert_eq!(current.source_message_id, original.source_message_id);
    assert_eq!(current.original_file_name, original.original_file_name);
    assert_eq!(current.extracted_text, original.extracted_text);
    assert_eq!(
        current.source_file_blob_pathname,
        original.source_file_blob_pathname
    );
    assert_eq!(current.created_at, original.created_at);
    assert_eq!(current.history_snapshot.len(), 4);
}

#[tokio::test]
async fn given_plain_message_and_no_compiled_document_then_synchronization_is_skipped() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let message = Message::new(chat.id, MessageSender::User, "Just a question".to_string());
    fixture.messages.append(&message).await.unwrap();

    let outcome = fixture.sync.synchronize(chat.id, &message).await.unwrap();

    assert!(matches!(outcome, SyncOutcome::Skipped));
    assert_eq!(fixture.compiled_documents.count(), 0);
}

#[tokio::test]
async fn given_snapshot_length_always_matches_message_count() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    let source = document_message(chat.id, "Upload", "b1", "text", Some("inv.pdf"));
    fixture.messages.append(&source).await.unwrap();
    fixture.sync.synchronize(chat.id, &source).await.unwrap();

    for i in 0..5usize {
        let message = Message::new(chat.id, MessageSender::User, format!("follow-up {}", i));
        fixture.messages.append(&message).await.unwrap();
        let outcome = fixture.sync.synchronize(chat.id, &message).await.unwrap();
        let document = match outcome {
            SyncOutcome::Updated(document) => document,
            other => panic!("expected Updated, got {:?}", other),
        };
        assert_eq!(document.history_snapshot.len(), 2 + i);
        assert!(document
            .history_snapshot
            .iter()
            .any(|e| e.is_source_document));
    }
}

#[tokio::test]
async fn given_source_message_without_document_fields_then_synchronization_aborts_recoverably() {
    let fixture = fixture();
    let chat = seed_chat(&fixture).await;

    // A compiled document whose recorded source message lost its document
    // fields (partial upload): the stored row has no attachment.
    let bare_source = Message::new(chat.id, MessageSender::User, "Upload".to_string());
    fixture.messages.append(&bare_source).await.unwrap();

    let document = CompiledDocument::from_source(
        chat.id,
        bare_source.id,
        &document_attachment("b1", "text", Some("inv.pdf")),
        Vec::new(),
    );
    fixture.compiled_documents.create(&document).await.unwrap();

    let follow_up = Message::new(chat.id, MessageSender::User, "Hello?".to_string());
    fixture.messages.append(&follow_up).await.unwrap();

    let result = fixture.sync.synchronize(chat.id, &follow_up).await;

    assert!(matches!(result, Err(SyncError::CannotSynchronize(id)) if id == bare_source.id));
}

/// Compiled-document repository that simulates losing the creation race:
/// the first existence check sees nothing, the insert reports that another
/// request already created the row.
struct RacingCompiledDocumentRepository {
    inner: InMemoryCompiledDocumentRepository,
    winner: CompiledDocument,
    winner_installed: AtomicBool,
}

#[async_trait]
impl CompiledDocumentRepository for RacingCompiledDocumentRepository {
    async fn create(&self, _document: &CompiledDocument) -> Result<CreateOutcome, RepositoryError> {
        self.inner.create(&self.winner).await?;
        self.winner_installed.store(true, Ordering::SeqCst);
        Ok(CreateOutcome::AlreadyExists)
    }

    async fn get_by_chat(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<CompiledDocument>, RepositoryError> {
        if !self.winner_installed.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.get_by_chat(chat_id).await
    }

    async fn update_history_snapshot(
        &self,
        id: CompiledDocumentId,
        snapshot: &[HistoryEntry],
    ) -> Result<(), RepositoryError> {
        self.inner.update_history_snapshot(id, snapshot).await
    }
}

#[tokio::test]
async fn given_concurrent_creation_race_then_loser_falls_back_to_update_path() {
    let chats = Arc::new(InMemoryChatRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new(Arc::clone(&chats)));

    let chat = Chat::new(UserId::new(), None);
    chats.create(&chat).await.unwrap();

    let winner_message =
        document_message(chat.id, "First upload", "b1", "winner text", Some("inv.pdf"));
    messages.append(&winner_message).await.unwrap();

    let loser_message =
        document_message(chat.id, "Duplicate upload", "b2", "loser text", Some("dup.pdf"));
    messages.append(&loser_message).await.unwrap();

    let winner_document = CompiledDocument::from_source(
        chat.id,
        winner_message.id,
        winner_message.document.as_ref().unwrap(),
        Vec::new(),
    );

    let racing = Arc::new(RacingCompiledDocumentRepository {
        inner: InMemoryCompiledDocumentRepository::new(),
        winner: winner_document,
        winner_installed: AtomicBool::new(false),
    });

    let sync = DocumentSyncService::new(
        Arc::clone(&messages) as Arc<dyn MessageRepository>,
        Arc::clone(&racing) as Arc<dyn CompiledDocumentRepository>,
    );

    let outcome = sync.synchronize(chat.id, &loser_message).await.unwrap();

    let document = match outcome {
        SyncOutcome::Updated(document) => document,
        other => panic!("expected Updated, got {:?}", other),
    };

    // The row that won keeps its source; the loser only re-snapshots it.
    assert_eq!(document.source_message_id, winner_message.id);
    assert_eq!(document.original_file_name, "inv.pdf");
    assert_eq!(document.history_snapshot.len(), 2);
    let flagged: Vec<&HistoryEntry> = document
        .history_snapshot
        .iter()
        .filter(|e| e.is_source_document)
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].content, "First upload");
    assert_eq!(racing.inner.count(), 1);
}
