use async_trait::async_trait;

use crate::{
    db::store::ReviewStore,
    error::AppResult,
    models::{Comment, Like, Review},
    pagination::PageWindow,
};

use super::{limit_param, PgStore};

const REVIEW_COLUMNS: &str = "id, movie_id, user_id, rating, review, created_at, updated_at";

#[async_trait]
impl ReviewStore for PgStore {
    async fn create_review(&self, review: &Review) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO reviews (id, movie_id, user_id, rating, review, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&review.id)
        .bind(&review.movie_id)
        .bind(&review.user_id)
        .bind(review.rating)
        .bind(&review.review)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_review(&self, id: &str) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE id = $1",
            REVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(review)
    }

    async fn find_review(&self, movie_id: &str, user_id: &str) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE movie_id = $1 AND user_id = $2",
            REVIEW_COLUMNS
        ))
        .bind(movie_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(review)
    }

    async fn update_review(&self, review: &Review) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = $2, review = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(&review.id)
        .bind(review.rating)
        .bind(&review.review)
        .bind(review.updated_at)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reviews(
        &self,
        movie_id: Option<String>,
        window: &PageWindow,
    ) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews \
             WHERE ($1::text IS NULL OR movie_id = $1) AND ($2::text IS NULL OR id > $2) \
             ORDER BY id LIMIT $3",
            REVIEW_COLUMNS
        ))
        .bind(movie_id)
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(reviews)
    }

    async fn top_reviews(&self, movie_id: Option<String>, limit: usize) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE ($1::text IS NULL OR movie_id = $1) \
             ORDER BY rating DESC, id ASC LIMIT $2",
            REVIEW_COLUMNS
        ))
        .bind(movie_id)
        .bind(limit_param(limit))
        .fetch_all(self.pool())
        .await?;
        Ok(reviews)
    }

    async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE user_id = $1 ORDER BY id",
            REVIEW_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(reviews)
    }

    async fn reviews_by_users(&self, user_ids: &[String]) -> AppResult<Vec<Review>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE user_id = ANY($1) ORDER BY id",
            REVIEW_COLUMNS
        ))
        .bind(user_ids)
        .fetch_all(self.pool())
        .await?;
        Ok(reviews)
    }

    async fn find_like(&self, review_id: &str, user_id: &str) -> AppResult<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(
            "SELECT id, review_id, user_id, created_at FROM likes WHERE review_id = $1 AND user_id = $2",
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(like)
    }

    async fn add_like(&self, like: &Like) -> AppResult<()> {
        sqlx::query("INSERT INTO likes (id, review_id, user_id, created_at) VALUES ($1, $2, $3, $4)")
            .bind(&like.id)
            .bind(&like.review_id)
            .bind(&like.user_id)
            .bind(like.created_at)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn count_likes(&self, review_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn add_comment(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, review_id, user_id, comment, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&comment.id)
        .bind(&comment.review_id)
        .bind(&comment.user_id)
        .bind(&comment.comment)
        .bind(comment.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn comments_for_review(&self, review_id: &str) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, review_id, user_id, comment, created_at FROM comments \
             WHERE review_id = $1 ORDER BY id",
        )
        .bind(review_id)
        .fetch_all(self.pool())
        .await?;
        Ok(comments)
    }
}
