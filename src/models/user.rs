use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content preferences driving recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub preferences: Preferences,
    pub wishlist: Vec<String>,
    pub custom_lists: Vec<String>,
    pub followed_lists: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            name: name.into(),
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            preferences: Preferences::default(),
            wishlist: Vec::new(),
            custom_lists: Vec::new(),
            followed_lists: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
