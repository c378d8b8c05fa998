use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{
    BlobStore, BlobStoreError, TextExtractor, TextExtractorError,
};
use crate::domain::BlobPathname;

/// Stores uploads into blob storage and runs the OCR collaborator over
/// stored files.
pub struct ExtractionService<X>
where
    X: TextExtractor,
{
    blob_store: Arc<dyn BlobStore>,
    extractor: Arc<X>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Blob(#[from] BlobStoreError),
    #[error(transparent)]
    Extractor(#[from] TextExtractorError),
}

impl<X> ExtractionService<X>
where
    X: TextExtractor,
{
    pub fn new(blob_store: Arc<dyn BlobStore>, extractor: Arc<X>) -> Self {
        Self {
            blob_store,
            extractor,
        }
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %original_file_name, bytes = data.len()))]
    pub async fn store_upload(
        &self,
        original_file_name: &str,
        data: Bytes,
    ) -> Result<BlobPathname, ExtractionError> {
        let pathname = BlobPathname::generate(original_file_name);
        self.blob_store.store(&pathname, data).await?;
        tracing::info!(blob = %pathname, "Stored uploaded file");
        Ok(pathname)
    }

    #[tracing::instrument(skip(self), fields(blob = %blob_pathname, file_name = %original_file_name))]
    pub async fn extract_text(
        &self,
        blob_pathname: &BlobPathname,
        original_file_name: &str,
    ) -> Result<String, ExtractionError> {
        let data = self.blob_store.fetch(blob_pathname, "ocr extraction").await?;
        let text = self
            .extractor
            .extract_text(&data, original_file_name)
            .await?;
        tracing::debug!(chars = text.len(), "Text extraction complete");
        Ok(text)
    }
}
