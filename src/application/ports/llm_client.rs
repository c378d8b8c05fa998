use async_trait::async_trait;

use crate::domain::{BlobPathname, MessageSender};

/// One prior conversation turn handed to the completion call.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub sender: MessageSender,
    pub content: String,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete the user's message given prior turns and, when the current
    /// message carries an upload, the extracted document text.
    async fn get_completion(
        &self,
        user_text: &str,
        prior_turns: &[ChatTurn],
        source_text: Option<&str>,
        source_blob: Option<&BlobPathname>,
    ) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
