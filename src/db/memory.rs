use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        Board, Comment, CountBucket, CustomList, DiscussionRow, EngagementRow, Like, Movie, Post,
        Review, Trailer, User,
    },
    pagination::{Identified, PageWindow},
};

use super::query::{MovieFilter, MovieSort};
use super::store::{BoardStore, ListStore, MovieStore, ReviewStore, TrailerStore, UserStore};

/// In-process store used when no database is configured and by tests.
///
/// Collections are id-keyed `BTreeMap`s, so iteration is already in cursor order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

#[derive(Default)]
struct Collections {
    movies: BTreeMap<String, Movie>,
    users: BTreeMap<String, User>,
    reviews: BTreeMap<String, Review>,
    likes: BTreeMap<String, Like>,
    comments: BTreeMap<String, Comment>,
    lists: BTreeMap<String, CustomList>,
    boards: BTreeMap<String, Board>,
    posts: BTreeMap<String, Post>,
    trailers: BTreeMap<String, Trailer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Same outcome as a unique-constraint violation in Postgres
fn duplicate() -> AppError {
    AppError::Conflict("Resource already exists".to_string())
}

fn identity_taken(users: &BTreeMap<String, User>, user: &User) -> bool {
    users
        .values()
        .any(|u| u.id != user.id && (u.email == user.email || u.username == user.username))
}

/// Upserts only when the key already exists
fn replace<T: Identified + Clone>(map: &mut BTreeMap<String, T>, item: &T) -> bool {
    match map.get_mut(item.id()) {
        Some(slot) => {
            *slot = item.clone();
            true
        }
        None => false,
    }
}

/// Counts descending, key ascending on ties, then windowed by key
fn ranked_counts(counts: HashMap<String, i64>, window: &PageWindow) -> Vec<CountBucket> {
    let mut buckets: Vec<CountBucket> = counts
        .into_iter()
        .map(|(name, count)| CountBucket { name, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    window.select(buckets)
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn insert_movie(&self, movie: &Movie) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.movies.insert(movie.id.clone(), movie.clone());
        Ok(())
    }

    async fn get_movie(&self, id: &str) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.get(id).cloned())
    }

    async fn find_movie_by_title(&self, title: &str) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.values().find(|m| m.title == title).cloned())
    }

    async fn replace_movie(&self, movie: &Movie) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(replace(&mut inner.movies, movie))
    }

    async fn delete_movie(&self, id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.movies.remove(id).is_some())
    }

    async fn find_movies(
        &self,
        filter: &MovieFilter,
        sort: MovieSort,
        window: &PageWindow,
    ) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Movie> = inner
            .movies
            .values()
            .filter(|m| window.admits(&m.id) && filter.matches(m))
            .cloned()
            .collect();
        matching.sort_by(|a, b| sort.compare(a, b));
        matching.truncate(window.limit());
        Ok(matching)
    }

    async fn movies_by_ids(&self, ids: &[String]) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let mut movies: Vec<Movie> = ids
            .iter()
            .filter_map(|id| inner.movies.get(id).cloned())
            .collect();
        movies.sort_by(|a, b| a.id.cmp(&b.id));
        movies.dedup_by(|a, b| a.id == b.id);
        Ok(movies)
    }

    async fn genre_counts(&self, window: &PageWindow) -> AppResult<Vec<CountBucket>> {
        let inner = self.inner.read().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for genre in inner.movies.values().flat_map(|m| m.genre.iter()) {
            *counts.entry(genre.clone()).or_default() += 1;
        }
        Ok(ranked_counts(counts, window))
    }

    async fn actor_counts(&self, window: &PageWindow) -> AppResult<Vec<CountBucket>> {
        let inner = self.inner.read().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for person in inner.movies.values().flat_map(|m| m.cast.iter()) {
            *counts.entry(person.name.clone()).or_default() += 1;
        }
        Ok(ranked_counts(counts, window))
    }

    async fn engagement(&self, window: &PageWindow) -> AppResult<Vec<EngagementRow>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<EngagementRow> = inner
            .movies
            .values()
            .map(|m| EngagementRow {
                id: m.id.clone(),
                title: m.title.clone(),
                total_ratings: m.ratings.engagement_total(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_ratings
                .total_cmp(&a.total_ratings)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(window.select(rows))
    }

    async fn most_discussed(&self, window: &PageWindow) -> AppResult<Vec<DiscussionRow>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<DiscussionRow> = inner
            .movies
            .values()
            .map(|m| DiscussionRow {
                id: m.id.clone(),
                title: m.title.clone(),
                news_count: m.news_and_articles.len() as i64,
            })
            .collect();
        rows.sort_by(|a, b| b.news_count.cmp(&a.news_count).then_with(|| a.id.cmp(&b.id)));
        Ok(window.select(rows))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if identity_taken(&inner.users, user) {
            return Err(duplicate());
        }
        inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: &User) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        if identity_taken(&inner.users, user) {
            return Err(duplicate());
        }
        match inner.users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.remove(id).is_some())
    }

    async fn users_sharing_genres(&self, genres: &[String], exclude: &str) -> AppResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .filter(|u| u.id != exclude)
            .filter(|u| u.preferences.genres.iter().any(|g| genres.contains(g)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn create_review(&self, review: &Review) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .reviews
            .values()
            .any(|r| r.movie_id == review.movie_id && r.user_id == review.user_id)
        {
            return Err(duplicate());
        }
        inner.reviews.insert(review.id.clone(), review.clone());
        Ok(())
    }

    async fn get_review(&self, id: &str) -> AppResult<Option<Review>> {
        let inner = self.inner.read().await;
        Ok(inner.reviews.get(id).cloned())
    }

    async fn find_review(&self, movie_id: &str, user_id: &str) -> AppResult<Option<Review>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .values()
            .find(|r| r.movie_id == movie_id && r.user_id == user_id)
            .cloned())
    }

    async fn update_review(&self, review: &Review) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(replace(&mut inner.reviews, review))
    }

    async fn list_reviews(
        &self,
        movie_id: Option<String>,
        window: &PageWindow,
    ) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        Ok(window.select(
            inner
                .reviews
                .values()
                .filter(|r| movie_id.as_deref().map_or(true, |m| r.movie_id == m))
                .cloned(),
        ))
    }

    async fn top_reviews(&self, movie_id: Option<String>, limit: usize) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        let mut reviews: Vec<Review> = inner
            .reviews
            .values()
            .filter(|r| movie_id.as_deref().map_or(true, |m| r.movie_id == m))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        reviews.truncate(limit);
        Ok(reviews)
    }

    async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn reviews_by_users(&self, user_ids: &[String]) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .values()
            .filter(|r| user_ids.contains(&r.user_id))
            .cloned()
            .collect())
    }

    async fn find_like(&self, review_id: &str, user_id: &str) -> AppResult<Option<Like>> {
        let inner = self.inner.read().await;
        Ok(inner
            .likes
            .values()
            .find(|l| l.review_id == review_id && l.user_id == user_id)
            .cloned())
    }

    async fn add_like(&self, like: &Like) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .likes
            .values()
            .any(|l| l.review_id == like.review_id && l.user_id == like.user_id)
        {
            return Err(duplicate());
        }
        inner.likes.insert(like.id.clone(), like.clone());
        Ok(())
    }

    async fn count_likes(&self, review_id: &str) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.likes.values().filter(|l| l.review_id == review_id).count() as i64)
    }

    async fn add_comment(&self, comment: &Comment) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.comments.insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    async fn comments_for_review(&self, review_id: &str) -> AppResult<Vec<Comment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .values()
            .filter(|c| c.review_id == review_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn create_list(&self, list: &CustomList) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.lists.insert(list.id.clone(), list.clone());
        Ok(())
    }

    async fn get_list(&self, id: &str) -> AppResult<Option<CustomList>> {
        let inner = self.inner.read().await;
        Ok(inner.lists.get(id).cloned())
    }

    async fn update_list(&self, list: &CustomList) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(replace(&mut inner.lists, list))
    }

    async fn delete_list(&self, id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.lists.remove(id).is_some())
    }

    async fn lists(&self, window: &PageWindow) -> AppResult<Vec<CustomList>> {
        let inner = self.inner.read().await;
        Ok(window.select(inner.lists.values().cloned()))
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn create_board(&self, board: &Board) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.boards.insert(board.id.clone(), board.clone());
        Ok(())
    }

    async fn get_board(&self, id: &str) -> AppResult<Option<Board>> {
        let inner = self.inner.read().await;
        Ok(inner.boards.get(id).cloned())
    }

    async fn update_board(&self, board: &Board) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(replace(&mut inner.boards, board))
    }

    async fn delete_board(&self, id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.boards.remove(id).is_some();
        if removed {
            inner.posts.retain(|_, p| p.board_id != id);
        }
        Ok(removed)
    }

    async fn boards(&self, window: &PageWindow) -> AppResult<Vec<Board>> {
        let inner = self.inner.read().await;
        Ok(window.select(inner.boards.values().cloned()))
    }

    async fn create_post(&self, post: &Post) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn get_post(&self, id: &str) -> AppResult<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.get(id).cloned())
    }

    async fn update_post(&self, post: &Post) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(replace(&mut inner.posts, post))
    }

    async fn delete_post(&self, id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.posts.remove(id).is_some())
    }

    async fn posts_for_board(&self, board_id: &str, window: &PageWindow) -> AppResult<Vec<Post>> {
        let inner = self.inner.read().await;
        Ok(window.select(
            inner
                .posts
                .values()
                .filter(|p| p.board_id == board_id)
                .cloned(),
        ))
    }
}

#[async_trait]
impl TrailerStore for MemoryStore {
    async fn create_trailer(&self, trailer: &Trailer) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.trailers.insert(trailer.id.clone(), trailer.clone());
        Ok(())
    }

    async fn get_trailer(&self, id: &str) -> AppResult<Option<Trailer>> {
        let inner = self.inner.read().await;
        Ok(inner.trailers.get(id).cloned())
    }

    async fn find_trailer_by_url(
        &self,
        movie_id: Option<String>,
        url: &str,
    ) -> AppResult<Option<Trailer>> {
        let inner = self.inner.read().await;
        Ok(inner
            .trailers
            .values()
            .find(|t| t.trailer_url == url && t.movie_id == movie_id)
            .cloned())
    }

    async fn update_trailer(&self, trailer: &Trailer) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(replace(&mut inner.trailers, trailer))
    }

    async fn delete_trailer(&self, id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.trailers.remove(id).is_some())
    }

    async fn trailers(&self, window: &PageWindow) -> AppResult<Vec<Trailer>> {
        let inner = self.inner.read().await;
        Ok(window.select(inner.trailers.values().cloned()))
    }
}
