use async_trait::async_trait;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        original_file_name: &str,
    ) -> Result<String, TextExtractorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextExtractorError {
    #[error("unsupported file: {0}")]
    UnsupportedFile(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}
