//! Catalog administration.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};

use crate::{
    db::{MovieFilter, MovieSort},
    error::{AppError, AppResult},
    models::{new_id, Movie},
    pagination::{Page, PageResponse},
};

use super::{admin_only, extract::{Json, Path}, protected, AppState};

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/:id", put(replace_movie).delete(delete_movie));
    let authenticated = Router::new().route("/:id", get(get_movie));

    admin_only(admin, state).merge(protected(authenticated, state))
}

async fn create_movie(
    State(state): State<AppState>,
    Json(mut movie): Json<Movie>,
) -> AppResult<(StatusCode, Json<Value>)> {
    movie.title = movie.title.trim().to_string();
    if movie.title.is_empty() {
        return Err(AppError::invalid("Title is required"));
    }
    if state.store.find_movie_by_title(&movie.title).await?.is_some() {
        return Err(AppError::Conflict(
            "Movie already exists in the database".to_string(),
        ));
    }

    movie.id = new_id();
    state.store.insert_movie(&movie).await?;

    tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie added");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Movie added successfully", "movie": movie })),
    ))
}

async fn list_movies(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<Movie>>> {
    let movies = state
        .store
        .find_movies(&MovieFilter::default(), MovieSort::Id, &window)
        .await?;
    Ok(Json(PageResponse::new(&window, movies)))
}

async fn get_movie(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Movie>> {
    state
        .store
        .get_movie(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Movie"))
}

async fn replace_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut movie): Json<Movie>,
) -> AppResult<Json<Value>> {
    movie.id = id;
    movie.title = movie.title.trim().to_string();
    if movie.title.is_empty() {
        return Err(AppError::invalid("Title is required"));
    }
    if !state.store.replace_movie(&movie).await? {
        return Err(AppError::not_found("Movie"));
    }

    tracing::info!(movie_id = %movie.id, "Movie updated");
    Ok(Json(json!({ "message": "Movie updated successfully", "movie": movie })))
}

async fn delete_movie(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    if !state.store.delete_movie(&id).await? {
        return Err(AppError::not_found("Movie"));
    }
    tracing::info!(movie_id = %id, "Movie deleted");
    Ok(Json(json!({ "message": "Movie deleted successfully" })))
}
