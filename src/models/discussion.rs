use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::Identified;

/// A discussion board users join before posting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(title: impl Into<String>, description: impl Into<String>, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            title: title.into(),
            description: description.into(),
            tags,
            participants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

impl Identified for Board {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub board_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(content: impl Into<String>, author_id: &str, board_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            content: content.into(),
            author_id: author_id.to_string(),
            board_id: board_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identified for Post {
    fn id(&self) -> &str {
        &self.id
    }
}
