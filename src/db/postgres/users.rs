use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::store::UserStore,
    error::AppResult,
    models::{Preferences, User},
};

use super::PgStore;

const USER_COLUMNS: &str = "id, name, email, username, password_hash, is_admin, preferred_genres, \
     preferred_actors, wishlist, custom_lists, followed_lists, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    username: String,
    password_hash: String,
    is_admin: bool,
    preferred_genres: Vec<String>,
    preferred_actors: Vec<String>,
    wishlist: Vec<String>,
    custom_lists: Vec<String>,
    followed_lists: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            preferences: Preferences {
                genres: row.preferred_genres,
                actors: row.preferred_actors,
            },
            wishlist: row.wishlist,
            custom_lists: row.custom_lists,
            followed_lists: row.followed_lists,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PgStore {
    async fn user_where(&self, clause: &str, value: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE {} = $1",
            USER_COLUMNS, clause
        ))
        .bind(value)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, username, password_hash, is_admin, preferred_genres, \
             preferred_actors, wishlist, custom_lists, followed_lists, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(&user.preferences.genres)
        .bind(&user.preferences.actors)
        .bind(&user.wishlist)
        .bind(&user.custom_lists)
        .bind(&user.followed_lists)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        self.user_where("id", id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.user_where("email", email).await
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.user_where("username", username).await
    }

    async fn update_user(&self, user: &User) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, username = $4, password_hash = $5, is_admin = $6, \
             preferred_genres = $7, preferred_actors = $8, wishlist = $9, custom_lists = $10, \
             followed_lists = $11, updated_at = $12 WHERE id = $1",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(&user.preferences.genres)
        .bind(&user.preferences.actors)
        .bind(&user.wishlist)
        .bind(&user.custom_lists)
        .bind(&user.followed_lists)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn users_sharing_genres(&self, genres: &[String], exclude: &str) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE preferred_genres && $1 AND id <> $2 ORDER BY id",
            USER_COLUMNS
        ))
        .bind(genres)
        .bind(exclude)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
