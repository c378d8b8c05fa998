mod chats;
mod compiled_document;
mod create_chat;
pub mod dto;
mod documents;
mod health;
mod ocr;
mod send_message;

pub use chats::{chat_messages_handler, list_chats_handler};
pub use compiled_document::{compiled_document_handler, download_compiled_document_handler};
pub use create_chat::create_chat_handler;
pub use documents::documents_handler;
pub use health::health_handler;
pub use ocr::{extract_text_handler, upload_handler};
pub use send_message::send_message_handler;
