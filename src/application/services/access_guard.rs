use std::sync::Arc;

use crate::application::ports::{ChatRepository, RepositoryError};
use crate::domain::{Chat, ChatId, UserId};

/// Confirms chat ownership before synchronizer or assembler outputs are
/// exposed. Stateless, no side effects.
pub struct AccessGuard {
    chats: Arc<dyn ChatRepository>,
}

impl AccessGuard {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }

    pub async fn ensure_owner(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<Chat, AccessError> {
        let chat = self
            .chats
            .get(chat_id)
            .await?
            .ok_or(AccessError::ChatNotFound(chat_id))?;

        if chat.user_id != user_id {
            tracing::warn!(
                chat_id = %chat_id.as_uuid(),
                user_id = %user_id.as_uuid(),
                "User attempted to access a chat belonging to another user"
            );
            return Err(AccessError::Forbidden);
        }

        Ok(chat)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("chat not found: {}", .0.as_uuid())]
    ChatNotFound(ChatId),
    #[error("requester does not own this chat")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
