use async_trait::async_trait;

use crate::domain::{FileKind, HistoryEntry};

/// Everything the renderer needs to lay out the downloadable PDF: file
/// metadata, extracted text, the conversation, and (when it could be
/// fetched and is of an embeddable kind) the original file bytes.
#[derive(Debug, Clone)]
pub struct CompiledPdfPayload {
    pub original_file_name: String,
    pub extracted_text: String,
    pub history_snapshot: Vec<HistoryEntry>,
    pub raw_file_bytes: Option<Vec<u8>>,
    pub file_kind: FileKind,
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_compiled_pdf(
        &self,
        payload: &CompiledPdfPayload,
    ) -> Result<Vec<u8>, PdfRendererError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PdfRendererError {
    #[error("render failed: {0}")]
    RenderFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
