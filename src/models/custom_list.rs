use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::Identified;

/// A user-curated collection of movies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomList {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub movies: Vec<String>,
    pub creator_id: String,
    pub followers: Vec<String>,
    pub is_public: bool,
    pub shareable_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomList {
    pub fn new(name: impl Into<String>, creator_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            name: name.into(),
            description: None,
            movies: Vec::new(),
            creator_id: creator_id.to_string(),
            followers: Vec::new(),
            is_public: true,
            shareable_link: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assigns a shareable link once the list is public
    pub fn ensure_link(&mut self, base_url: &str) {
        if self.is_public && self.shareable_link.is_none() {
            self.shareable_link = Some(format!(
                "{}/custom-lists/{}",
                base_url.trim_end_matches('/'),
                self.id
            ));
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }
}

impl Identified for CustomList {
    fn id(&self) -> &str {
        &self.id
    }
}
