//! Persistence seams, one trait per collection.
//!
//! Handlers and services only ever see these traits; [`super::PgStore`] and
//! [`super::MemoryStore`] implement all of them. List operations take a
//! [`PageWindow`] and must return at most `window.limit()` items, all with an
//! id (or aggregation key) strictly greater than the window's cursor.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        Board, Comment, CountBucket, CustomList, DiscussionRow, EngagementRow, Like, Movie, Post,
        Review, Trailer, User,
    },
    pagination::PageWindow,
};

use super::query::{MovieFilter, MovieSort};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn insert_movie(&self, movie: &Movie) -> AppResult<()>;

    async fn get_movie(&self, id: &str) -> AppResult<Option<Movie>>;

    async fn find_movie_by_title(&self, title: &str) -> AppResult<Option<Movie>>;

    /// Replaces every field of an existing movie. Returns false when absent.
    async fn replace_movie(&self, movie: &Movie) -> AppResult<bool>;

    async fn delete_movie(&self, id: &str) -> AppResult<bool>;

    /// Movies matching `filter` after the window's cursor, ordered by `sort`
    async fn find_movies(
        &self,
        filter: &MovieFilter,
        sort: MovieSort,
        window: &PageWindow,
    ) -> AppResult<Vec<Movie>>;

    /// Movies with the given ids, in ascending id order; unknown ids are skipped
    async fn movies_by_ids(&self, ids: &[String]) -> AppResult<Vec<Movie>>;

    /// Movies per genre, count descending
    async fn genre_counts(&self, window: &PageWindow) -> AppResult<Vec<CountBucket>>;

    /// Movies per cast member name, count descending
    async fn actor_counts(&self, window: &PageWindow) -> AppResult<Vec<CountBucket>>;

    /// Movies by summed IMDb, Rotten Tomatoes and Metacritic scores, descending
    async fn engagement(&self, window: &PageWindow) -> AppResult<Vec<EngagementRow>>;

    /// Movies by number of attached articles, descending
    async fn most_discussed(&self, window: &PageWindow) -> AppResult<Vec<DiscussionRow>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> AppResult<()>;

    async fn get_user(&self, id: &str) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn update_user(&self, user: &User) -> AppResult<bool>;

    async fn delete_user(&self, id: &str) -> AppResult<bool>;

    /// Users other than `exclude` whose preferred genres intersect `genres`
    async fn users_sharing_genres(&self, genres: &[String], exclude: &str) -> AppResult<Vec<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create_review(&self, review: &Review) -> AppResult<()>;

    async fn get_review(&self, id: &str) -> AppResult<Option<Review>>;

    async fn find_review(&self, movie_id: &str, user_id: &str) -> AppResult<Option<Review>>;

    async fn update_review(&self, review: &Review) -> AppResult<bool>;

    /// Reviews after the cursor in id order, optionally for one movie
    async fn list_reviews(
        &self,
        movie_id: Option<String>,
        window: &PageWindow,
    ) -> AppResult<Vec<Review>>;

    /// Highest ratings first, optionally for one movie
    async fn top_reviews(&self, movie_id: Option<String>, limit: usize) -> AppResult<Vec<Review>>;

    async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<Review>>;

    async fn reviews_by_users(&self, user_ids: &[String]) -> AppResult<Vec<Review>>;

    async fn find_like(&self, review_id: &str, user_id: &str) -> AppResult<Option<Like>>;

    async fn add_like(&self, like: &Like) -> AppResult<()>;

    async fn count_likes(&self, review_id: &str) -> AppResult<i64>;

    async fn add_comment(&self, comment: &Comment) -> AppResult<()>;

    /// Comments on a review, oldest first
    async fn comments_for_review(&self, review_id: &str) -> AppResult<Vec<Comment>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn create_list(&self, list: &CustomList) -> AppResult<()>;

    async fn get_list(&self, id: &str) -> AppResult<Option<CustomList>>;

    async fn update_list(&self, list: &CustomList) -> AppResult<bool>;

    async fn delete_list(&self, id: &str) -> AppResult<bool>;

    async fn lists(&self, window: &PageWindow) -> AppResult<Vec<CustomList>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn create_board(&self, board: &Board) -> AppResult<()>;

    async fn get_board(&self, id: &str) -> AppResult<Option<Board>>;

    async fn update_board(&self, board: &Board) -> AppResult<bool>;

    /// Deletes the board together with its posts
    async fn delete_board(&self, id: &str) -> AppResult<bool>;

    async fn boards(&self, window: &PageWindow) -> AppResult<Vec<Board>>;

    async fn create_post(&self, post: &Post) -> AppResult<()>;

    async fn get_post(&self, id: &str) -> AppResult<Option<Post>>;

    async fn update_post(&self, post: &Post) -> AppResult<bool>;

    async fn delete_post(&self, id: &str) -> AppResult<bool>;

    async fn posts_for_board(&self, board_id: &str, window: &PageWindow) -> AppResult<Vec<Post>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrailerStore: Send + Sync {
    async fn create_trailer(&self, trailer: &Trailer) -> AppResult<()>;

    async fn get_trailer(&self, id: &str) -> AppResult<Option<Trailer>>;

    async fn find_trailer_by_url(
        &self,
        movie_id: Option<String>,
        url: &str,
    ) -> AppResult<Option<Trailer>>;

    async fn update_trailer(&self, trailer: &Trailer) -> AppResult<bool>;

    async fn delete_trailer(&self, id: &str) -> AppResult<bool>;

    async fn trailers(&self, window: &PageWindow) -> AppResult<Vec<Trailer>>;
}

/// Every collection behind one handle
pub trait Store: MovieStore + UserStore + ReviewStore + ListStore + BoardStore + TrailerStore {}

impl<T> Store for T where
    T: MovieStore + UserStore + ReviewStore + ListStore + BoardStore + TrailerStore
{
}
