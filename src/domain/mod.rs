mod blob_pathname;
mod chat;
mod chat_id;
mod compiled_document;
mod compiled_document_id;
mod file_kind;
mod message;
mod message_id;
mod message_sender;
mod user_id;

pub use blob_pathname::BlobPathname;
pub use chat::Chat;
pub use chat_id::ChatId;
pub use compiled_document::{CompiledDocument, HistoryEntry};
pub use compiled_document_id::CompiledDocumentId;
pub use file_kind::FileKind;
pub use message::{DocumentAttachment, Message};
pub use message_id::MessageId;
pub use message_sender::MessageSender;
pub use user_id::UserId;
