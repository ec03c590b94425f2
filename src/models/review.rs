use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::Identified;

/// A user's 1-5 rating of a movie with optional review text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    pub fn new(movie_id: &str, user_id: &str, rating: i32, review: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            movie_id: movie_id.to_string(),
            user_id: user_id.to_string(),
            rating,
            review,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rating_in_range(rating: i32) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
    }
}

impl Identified for Review {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Review joined with the reviewer's username and the movie title
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub username: Option<String>,
    pub movie_title: Option<String>,
}

impl Identified for ReviewView {
    fn id(&self) -> &str {
        &self.review.id
    }
}

/// Highly rated review with engagement counts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHighlight {
    #[serde(flatten)]
    pub review: ReviewView,
    pub like_count: i64,
    pub comment_count: i64,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    pub review_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(review_id: &str, user_id: &str) -> Self {
        Self {
            id: super::new_id(),
            review_id: review_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub review_id: String,
    pub user_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(review_id: &str, user_id: &str, comment: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            review_id: review_id.to_string(),
            user_id: user_id.to_string(),
            comment: comment.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(!Review::rating_in_range(0));
        assert!(Review::rating_in_range(1));
        assert!(Review::rating_in_range(5));
        assert!(!Review::rating_in_range(6));
    }

    #[test]
    fn test_view_flattens_review() {
        let review = Review::new("m1", "u1", 4, Some("Great".into()));
        let view = ReviewView {
            review: review.clone(),
            username: Some("ada".into()),
            movie_title: Some("Heat".into()),
        };
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], review.id);
        assert_eq!(json["rating"], 4);
        assert_eq!(json["movieTitle"], "Heat");
    }
}
