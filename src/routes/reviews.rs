//! Ratings, reviews and their likes and comments.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Comment, Like, Movie, Review, ReviewHighlight, ReviewView},
    pagination::{Page, PageResponse},
};

use super::{extract::{Json, Query}, non_blank, protected, AppState};

pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", get(list_reviews).post(add_review).put(update_review))
        .route("/highlights", get(highlights));
    protected(authenticated, state)
}

pub fn like_routes(state: &AppState) -> Router<AppState> {
    protected(Router::new().route("/", post(add_like)), state)
}

pub fn comment_routes(state: &AppState) -> Router<AppState> {
    protected(Router::new().route("/", post(add_comment)), state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub movie_id: Option<String>,
    pub rating: Option<i32>,
    pub review: Option<String>,
}

impl ReviewRequest {
    fn validated(self) -> AppResult<(String, i32, Option<String>)> {
        let movie_id =
            non_blank(self.movie_id).ok_or_else(|| AppError::invalid("Invalid movieId."))?;
        let rating = self
            .rating
            .filter(|r| Review::rating_in_range(*r))
            .ok_or_else(|| AppError::invalid("Rating must be between 1 and 5."))?;
        Ok((movie_id, rating, self.review))
    }
}

async fn existing_movie(state: &AppState, movie_id: &str) -> AppResult<Movie> {
    state
        .store
        .get_movie(movie_id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie"))
}

async fn add_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (movie_id, rating, text) = body.validated()?;
    let movie = existing_movie(&state, &movie_id).await?;

    if state.store.find_review(&movie_id, &auth.user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "You have already reviewed this movie.".to_string(),
        ));
    }

    let review = Review::new(&movie_id, &auth.user_id, rating, text);
    state.store.create_review(&review).await?;

    tracing::info!(review_id = %review.id, movie_id = %movie_id, rating, "Review added");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review added successfully",
            "ratingReview": review,
            "movie": movie.summary(),
        })),
    ))
}

async fn update_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ReviewRequest>,
) -> AppResult<Json<Value>> {
    let (movie_id, rating, text) = body.validated()?;

    let mut review = state
        .store
        .find_review(&movie_id, &auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found.".to_string()))?;
    let movie = existing_movie(&state, &movie_id).await?;

    review.rating = rating;
    review.review = text;
    review.updated_at = chrono::Utc::now();
    if !state.store.update_review(&review).await? {
        return Err(AppError::NotFound("Review not found.".to_string()));
    }

    Ok(Json(json!({
        "message": "Review updated successfully",
        "ratingReview": review,
        "movie": movie.summary(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub movie_id: Option<String>,
}

/// Joins reviews with usernames and movie titles, looking each up once
async fn populate(state: &AppState, reviews: Vec<Review>) -> AppResult<Vec<ReviewView>> {
    let mut usernames: HashMap<String, Option<String>> = HashMap::new();
    let mut titles: HashMap<String, Option<String>> = HashMap::new();
    let mut views = Vec::with_capacity(reviews.len());

    for review in reviews {
        if !usernames.contains_key(&review.user_id) {
            let name = state.store.get_user(&review.user_id).await?.map(|u| u.username);
            usernames.insert(review.user_id.clone(), name);
        }
        if !titles.contains_key(&review.movie_id) {
            let title = state.store.get_movie(&review.movie_id).await?.map(|m| m.title);
            titles.insert(review.movie_id.clone(), title);
        }
        views.push(ReviewView {
            username: usernames.get(&review.user_id).cloned().flatten(),
            movie_title: titles.get(&review.movie_id).cloned().flatten(),
            review,
        });
    }
    Ok(views)
}

async fn list_reviews(
    State(state): State<AppState>,
    Page(window): Page,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<PageResponse<ReviewView>>> {
    let reviews = state
        .store
        .list_reviews(non_blank(query.movie_id), &window)
        .await?;
    let views = populate(&state, reviews).await?;
    Ok(Json(PageResponse::new(&window, views)))
}

async fn highlights(
    State(state): State<AppState>,
    Page(window): Page,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<Value>> {
    let top = state
        .store
        .top_reviews(non_blank(query.movie_id), window.limit())
        .await?;

    let mut highlights = Vec::new();
    for view in populate(&state, top).await? {
        let like_count = state.store.count_likes(&view.review.id).await?;
        let comments = state.store.comments_for_review(&view.review.id).await?;
        if like_count > 0 && !comments.is_empty() {
            highlights.push(ReviewHighlight {
                like_count,
                comment_count: comments.len() as i64,
                comments,
                review: view,
            });
        }
    }

    Ok(Json(json!({ "reviewHighlights": highlights })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub review_id: Option<String>,
}

async fn existing_review(state: &AppState, review_id: Option<String>) -> AppResult<Review> {
    let review_id = non_blank(review_id).ok_or_else(|| AppError::invalid("Invalid reviewId."))?;
    state
        .store
        .get_review(&review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))
}

async fn add_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<LikeRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let review = existing_review(&state, body.review_id).await?;

    if state.store.find_like(&review.id, &auth.user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "You have already liked this review.".to_string(),
        ));
    }
    state.store.add_like(&Like::new(&review.id, &auth.user_id)).await?;

    let like_count = state.store.count_likes(&review.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Like added successfully", "likeCount": like_count })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub review_id: Option<String>,
    pub comment: Option<String>,
}

async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let text = non_blank(body.comment)
        .ok_or_else(|| AppError::invalid("Comment text is required."))?;
    let review = existing_review(&state, body.review_id).await?;

    let comment = Comment::new(&review.id, &auth.user_id, text);
    state.store.add_comment(&comment).await?;

    let comment_count = state.store.comments_for_review(&review.id).await?.len();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment added successfully",
            "comment": comment,
            "commentCount": comment_count,
        })),
    ))
}
