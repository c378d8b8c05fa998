use std::sync::Arc;

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::application::services::{ChatService, DownloadService, ExtractionService};

pub struct AppState<L, X, P>
where
    L: LlmClient,
    X: TextExtractor,
    P: PdfRenderer,
{
    pub chat_service: Arc<ChatService<L>>,
    pub extraction_service: Arc<ExtractionService<X>>,
    pub download_service: Arc<DownloadService<P>>,
}

impl<L, X, P> Clone for AppState<L, X, P>
where
    L: LlmClient,
    X: TextExtractor,
    P: PdfRenderer,
{
    fn clone(&self) -> Self {
        Self {
            chat_service: Arc::clone(&self.chat_service),
            extraction_service: Arc::clone(&self.extraction_service),
            download_service: Arc::clone(&self.download_service),
        }
    }
}
