mod pg_chat_repository;
mod pg_compiled_document_repository;
mod pg_message_repository;
mod pg_pool;

pub use pg_chat_repository::PgChatRepository;
pub use pg_compiled_document_repository::PgCompiledDocumentRepository;
pub use pg_message_repository::PgMessageRepository;
pub use pg_pool::{create_pool, run_migrations};
