use async_trait::async_trait;

use crate::domain::{ChatId, Message, MessageId, UserId};

use super::{DocumentItem, RepositoryError};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError>;

    async fn get(&self, id: MessageId) -> Result<Option<Message>, RepositoryError>;

    /// All messages of a chat, ordered by creation time ascending.
    async fn list_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError>;

    /// Every document-bearing message across a user's chats, newest first.
    async fn list_document_bearing_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DocumentItem>, RepositoryError>;
}
