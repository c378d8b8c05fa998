use chrono::{DateTime, Utc};

use super::{ChatId, UserId};

const MAX_TITLE_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub struct Chat {
    pub id: ChatId,
    pub user_id: UserId,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(user_id: UserId, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ChatId::new(),
            user_id,
            title,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derive a chat title from its seed text (uploaded file name or first
    /// user message), truncated to 50 characters.
    pub fn derive_title(seed: &str) -> String {
        let title: String = seed.chars().take(MAX_TITLE_CHARS).collect();
        if title.chars().count() == MAX_TITLE_CHARS {
            format!("{}...", title)
        } else {
            title
        }
    }
}
