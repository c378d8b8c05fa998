mod blob_store;
mod chat_repository;
mod compiled_document_repository;
mod document_item;
mod llm_client;
mod message_repository;
mod pdf_renderer;
mod repository_error;
mod text_extractor;

pub use blob_store::{BlobStore, BlobStoreError};
pub use chat_repository::ChatRepository;
pub use compiled_document_repository::{CompiledDocumentRepository, CreateOutcome};
pub use document_item::DocumentItem;
pub use llm_client::{ChatTurn, LlmClient, LlmClientError};
pub use message_repository::MessageRepository;
pub use pdf_renderer::{CompiledPdfPayload, PdfRenderer, PdfRendererError};
pub use repository_error::RepositoryError;
pub use text_extractor::{TextExtractor, TextExtractorError};
