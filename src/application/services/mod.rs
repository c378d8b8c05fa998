mod access_guard;
mod chat_service;
mod download_service;
mod extraction_service;
mod sync_service;

pub use access_guard::{AccessError, AccessGuard};
pub use chat_service::{
    ChatService, ChatServiceError, CreateChatRequest, SendMessageOutcome, SendMessageRequest,
};
pub use download_service::{download_file_name, DownloadBundle, DownloadError, DownloadService};
pub use extraction_service::{ExtractionError, ExtractionService};
pub use sync_service::{DocumentSyncService, SyncError, SyncOutcome};
