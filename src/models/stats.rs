use serde::{Deserialize, Serialize};

use crate::pagination::Identified;

/// Occurrence count for a genre or actor name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct CountBucket {
    pub name: String,
    pub count: i64,
}

impl Identified for CountBucket {
    fn id(&self) -> &str {
        &self.name
    }
}

/// Movie ranked by its summed critic scores
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRow {
    pub id: String,
    pub title: String,
    pub total_ratings: f64,
}

impl Identified for EngagementRow {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Movie ranked by attached news coverage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionRow {
    pub id: String,
    pub title: String,
    pub news_count: i64,
}

impl Identified for DiscussionRow {
    fn id(&self) -> &str {
        &self.id
    }
}
