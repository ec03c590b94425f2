use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    pagination::Page,
    services::recommendations::{self, Recommendations},
};

use super::{extract::{Json, Path}, load_user, protected, AppState};

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/trending", get(trending))
        .route("/top-rated", get(top_rated))
        .route("/similar/:movie_id", get(similar));
    let authenticated = Router::new().route("/", get(recommend));

    public.merge(protected(authenticated, state))
}

async fn recommend(
    State(state): State<AppState>,
    auth: AuthUser,
    Page(window): Page,
) -> AppResult<Json<Recommendations>> {
    let user = load_user(&state, &auth).await?;
    let store = state.store.as_ref();
    let result = state
        .recommender
        .recommend(store, store, store, &user, &window)
        .await?;
    Ok(Json(result))
}

async fn trending(State(state): State<AppState>, Page(window): Page) -> AppResult<Json<Value>> {
    let movies = recommendations::trending(state.store.as_ref(), &window).await?;
    let next_cursor = window.next_cursor(&movies);
    Ok(Json(json!({ "trendingMovies": movies, "nextCursor": next_cursor })))
}

async fn top_rated(State(state): State<AppState>, Page(window): Page) -> AppResult<Json<Value>> {
    let movies = recommendations::top_rated(state.store.as_ref(), &window).await?;
    let next_cursor = window.next_cursor(&movies);
    Ok(Json(json!({ "topRatedMovies": movies, "nextCursor": next_cursor })))
}

async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Page(window): Page,
) -> AppResult<Json<Value>> {
    let movies = recommendations::similar(state.store.as_ref(), &movie_id, &window).await?;
    let next_cursor = window.next_cursor(&movies);
    Ok(Json(json!({ "similarMovies": movies, "nextCursor": next_cursor })))
}
