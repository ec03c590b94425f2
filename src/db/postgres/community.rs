use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    db::store::{BoardStore, ListStore, TrailerStore},
    error::{AppError, AppResult},
    models::{Board, CustomList, Post, Trailer},
    pagination::PageWindow,
};

use super::{limit_param, PgStore};

const LIST_COLUMNS: &str = "id, name, description, movies, creator_id, followers, is_public, \
     shareable_link, created_at, updated_at";
const BOARD_COLUMNS: &str = "id, title, description, tags, participants, created_at, updated_at";
const POST_COLUMNS: &str = "id, content, author_id, board_id, created_at, updated_at";
const TRAILER_COLUMNS: &str = "id, movie_id, trailer_name, trailer_url, trailer_type, release_date, \
     duration, description, language, region_restrictions, is_public, created_at, updated_at";

#[async_trait]
impl ListStore for PgStore {
    async fn create_list(&self, list: &CustomList) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO custom_lists (id, name, description, movies, creator_id, followers, is_public, \
             shareable_link, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&list.id)
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.movies)
        .bind(&list.creator_id)
        .bind(&list.followers)
        .bind(list.is_public)
        .bind(&list.shareable_link)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_list(&self, id: &str) -> AppResult<Option<CustomList>> {
        let list = sqlx::query_as::<_, CustomList>(&format!(
            "SELECT {} FROM custom_lists WHERE id = $1",
            LIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(list)
    }

    async fn update_list(&self, list: &CustomList) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE custom_lists SET name = $2, description = $3, movies = $4, followers = $5, \
             is_public = $6, shareable_link = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(&list.id)
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.movies)
        .bind(&list.followers)
        .bind(list.is_public)
        .bind(&list.shareable_link)
        .bind(list.updated_at)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_list(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM custom_lists WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn lists(&self, window: &PageWindow) -> AppResult<Vec<CustomList>> {
        let lists = sqlx::query_as::<_, CustomList>(&format!(
            "SELECT {} FROM custom_lists WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2",
            LIST_COLUMNS
        ))
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(lists)
    }
}

#[async_trait]
impl BoardStore for PgStore {
    async fn create_board(&self, board: &Board) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO boards (id, title, description, tags, participants, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&board.id)
        .bind(&board.title)
        .bind(&board.description)
        .bind(&board.tags)
        .bind(&board.participants)
        .bind(board.created_at)
        .bind(board.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_board(&self, id: &str) -> AppResult<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "SELECT {} FROM boards WHERE id = $1",
            BOARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(board)
    }

    async fn update_board(&self, board: &Board) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE boards SET title = $2, description = $3, tags = $4, participants = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(&board.id)
        .bind(&board.title)
        .bind(&board.description)
        .bind(&board.tags)
        .bind(&board.participants)
        .bind(board.updated_at)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_board(&self, id: &str) -> AppResult<bool> {
        // posts cascade
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn boards(&self, window: &PageWindow) -> AppResult<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            "SELECT {} FROM boards WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2",
            BOARD_COLUMNS
        ))
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(boards)
    }

    async fn create_post(&self, post: &Post) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO posts (id, content, author_id, board_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&post.id)
        .bind(&post.content)
        .bind(&post.author_id)
        .bind(&post.board_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_post(&self, id: &str) -> AppResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(post)
    }

    async fn update_post(&self, post: &Post) -> AppResult<bool> {
        let result = sqlx::query("UPDATE posts SET content = $2, updated_at = $3 WHERE id = $1")
            .bind(&post.id)
            .bind(&post.content)
            .bind(post.updated_at)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_post(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn posts_for_board(&self, board_id: &str, window: &PageWindow) -> AppResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE board_id = $1 AND ($2::text IS NULL OR id > $2) \
             ORDER BY id LIMIT $3",
            POST_COLUMNS
        ))
        .bind(board_id)
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(posts)
    }
}

#[derive(sqlx::FromRow)]
struct TrailerRow {
    id: String,
    movie_id: Option<String>,
    trailer_name: String,
    trailer_url: String,
    trailer_type: String,
    release_date: NaiveDate,
    duration: i32,
    description: String,
    language: Option<String>,
    region_restrictions: Vec<String>,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TrailerRow> for Trailer {
    type Error = AppError;

    fn try_from(row: TrailerRow) -> Result<Self, Self::Error> {
        Ok(Trailer {
            id: row.id,
            movie_id: row.movie_id,
            trailer_name: row.trailer_name,
            trailer_url: row.trailer_url,
            trailer_type: row.trailer_type.parse().map_err(AppError::Internal)?,
            release_date: row.release_date,
            duration: row.duration,
            description: row.description,
            language: row.language,
            region_restrictions: row.region_restrictions,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TrailerStore for PgStore {
    async fn create_trailer(&self, trailer: &Trailer) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO trailers (id, movie_id, trailer_name, trailer_url, trailer_type, release_date, \
             duration, description, language, region_restrictions, is_public, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&trailer.id)
        .bind(&trailer.movie_id)
        .bind(&trailer.trailer_name)
        .bind(&trailer.trailer_url)
        .bind(trailer.trailer_type.to_string())
        .bind(trailer.release_date)
        .bind(trailer.duration)
        .bind(&trailer.description)
        .bind(&trailer.language)
        .bind(&trailer.region_restrictions)
        .bind(trailer.is_public)
        .bind(trailer.created_at)
        .bind(trailer.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_trailer(&self, id: &str) -> AppResult<Option<Trailer>> {
        let row = sqlx::query_as::<_, TrailerRow>(&format!(
            "SELECT {} FROM trailers WHERE id = $1",
            TRAILER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        row.map(Trailer::try_from).transpose()
    }

    async fn find_trailer_by_url(
        &self,
        movie_id: Option<String>,
        url: &str,
    ) -> AppResult<Option<Trailer>> {
        let row = sqlx::query_as::<_, TrailerRow>(&format!(
            "SELECT {} FROM trailers WHERE movie_id IS NOT DISTINCT FROM $1 AND trailer_url = $2 LIMIT 1",
            TRAILER_COLUMNS
        ))
        .bind(movie_id)
        .bind(url)
        .fetch_optional(self.pool())
        .await?;
        row.map(Trailer::try_from).transpose()
    }

    async fn update_trailer(&self, trailer: &Trailer) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE trailers SET movie_id = $2, trailer_name = $3, trailer_url = $4, trailer_type = $5, \
             release_date = $6, duration = $7, description = $8, language = $9, \
             region_restrictions = $10, is_public = $11, updated_at = $12 WHERE id = $1",
        )
        .bind(&trailer.id)
        .bind(&trailer.movie_id)
        .bind(&trailer.trailer_name)
        .bind(&trailer.trailer_url)
        .bind(trailer.trailer_type.to_string())
        .bind(trailer.release_date)
        .bind(trailer.duration)
        .bind(&trailer.description)
        .bind(&trailer.language)
        .bind(&trailer.region_restrictions)
        .bind(trailer.is_public)
        .bind(trailer.updated_at)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_trailer(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM trailers WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn trailers(&self, window: &PageWindow) -> AppResult<Vec<Trailer>> {
        let rows = sqlx::query_as::<_, TrailerRow>(&format!(
            "SELECT {} FROM trailers WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2",
            TRAILER_COLUMNS
        ))
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(Trailer::try_from).collect()
    }
}
