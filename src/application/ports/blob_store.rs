use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::BlobPathname;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, pathname: &BlobPathname, data: Bytes) -> Result<(), BlobStoreError>;

    /// Fetch the raw bytes of a stored file. `purpose` labels the fetch in
    /// logs (e.g. "ocr extraction", "embedding in compiled pdf").
    async fn fetch(
        &self,
        pathname: &BlobPathname,
        purpose: &str,
    ) -> Result<Vec<u8>, BlobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
}
