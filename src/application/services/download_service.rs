use std::sync::Arc;

use crate::application::ports::{
    BlobStore, CompiledDocumentRepository, CompiledPdfPayload, PdfRenderer, PdfRendererError,
    RepositoryError,
};
use crate::domain::{ChatId, FileKind, UserId};

use super::access_guard::{AccessError, AccessGuard};

/// The assembled download: a rendered PDF and the name to serve it under.
#[derive(Debug)]
pub struct DownloadBundle {
    pub file_name: String,
    pub buffer: Vec<u8>,
    pub content_type: &'static str,
}

/// Turns a chat's compiled document plus the original file bytes into a
/// renderable PDF payload and hands it to the rendering collaborator.
pub struct DownloadService<P>
where
    P: PdfRenderer,
{
    access: Arc<AccessGuard>,
    compiled_documents: Arc<dyn CompiledDocumentRepository>,
    blob_store: Arc<dyn BlobStore>,
    renderer: Arc<P>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("compiled document not found for chat {}", .0.as_uuid())]
    CompiledDocumentNotFound(ChatId),
    #[error("pdf render failed: {0}")]
    Render(#[from] PdfRendererError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<P> DownloadService<P>
where
    P: PdfRenderer,
{
    pub fn new(
        access: Arc<AccessGuard>,
        compiled_documents: Arc<dyn CompiledDocumentRepository>,
        blob_store: Arc<dyn BlobStore>,
        renderer: Arc<P>,
    ) -> Self {
        Self {
            access,
            compiled_documents,
            blob_store,
            renderer,
        }
    }

    /// Assemble the downloadable PDF for a chat. Ownership is checked
    /// before anything else is read; the whole operation is read-only with
    /// respect to persisted state.
    #[tracing::instrument(
        skip(self),
        fields(chat_id = %chat_id.as_uuid(), user_id = %user_id.as_uuid())
    )]
    pub async fn assemble_bundle(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<DownloadBundle, DownloadError> {
        self.access.ensure_owner(chat_id, user_id).await?;

        let document = self
            .compiled_documents
            .get_by_chat(chat_id)
            .await?
            .ok_or(DownloadError::CompiledDocumentNotFound(chat_id))?;

        // A failed fetch degrades to a bundle without the embedded
        // original; the download itself still succeeds.
        let (raw_file_bytes, file_kind) = match self
            .blob_store
            .fetch(&document.source_file_blob_pathname, "embedding in compiled pdf")
            .await
        {
            Ok(bytes) => (
                Some(bytes),
                FileKind::from_file_name(&document.original_file_name),
            ),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    blob = %document.source_file_blob_pathname,
                    "Original file fetch failed, bundling without it"
                );
                (None, FileKind::Unsupported)
            }
        };

        let payload = CompiledPdfPayload {
            original_file_name: document.original_file_name.clone(),
            extracted_text: document.extracted_text.clone(),
            history_snapshot: document.history_snapshot.clone(),
            raw_file_bytes,
            file_kind,
        };

        let buffer = self.renderer.render_compiled_pdf(&payload).await?;
        let file_name = download_file_name(&document.original_file_name, chat_id);

        tracing::info!(
            file_name = %file_name,
            bytes = buffer.len(),
            "Compiled PDF assembled for download"
        );

        Ok(DownloadBundle {
            file_name,
            buffer,
            content_type: "application/pdf",
        })
    }
}

/// Deterministic download name:
/// `compiled_<sanitized stem>_<first 8 chars of chat id>.pdf`.
pub fn download_file_name(original_file_name: &str, chat_id: ChatId) -> String {
    let stem = original_file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original_file_name);

    let safe: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let chat = chat_id.as_uuid().to_string();
    format!("compiled_{}_{}.pdf", safe, &chat[..8])
}
