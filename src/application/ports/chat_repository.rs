use async_trait::async_trait;

use crate::domain::{Chat, ChatId, UserId};

use super::RepositoryError;

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn create(&self, chat: &Chat) -> Result<(), RepositoryError>;

    async fn get(&self, id: ChatId) -> Result<Option<Chat>, RepositoryError>;

    /// Chats of one user, most recently updated first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Chat>, RepositoryError>;
}
