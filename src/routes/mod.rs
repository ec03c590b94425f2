use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware, require_admin, require_auth, AuthUser},
    models::User,
};

pub mod admin;
pub mod boards;
pub mod details;
pub mod extract;
pub mod lists;
pub mod movies;
pub mod recommendations;
pub mod reviews;
pub mod search;
pub mod state;
pub mod trailers;
pub mod users;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .nest("/api", api_routes(&state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/users", users::routes(state))
        .nest("/movies", movies::routes(state))
        .nest("/search", search::routes(state))
        .nest("/rating-reviews", reviews::routes(state))
        .nest("/likes", reviews::like_routes(state))
        .nest("/comments", reviews::comment_routes(state))
        .nest("/recommendations", recommendations::routes(state))
        .nest("/custom-lists", lists::routes(state))
        .nest("/discussion-boards", boards::routes(state))
        .nest("/posts", boards::post_routes(state))
        .nest("/trailers", trailers::routes(state))
        .nest("/admin-stats", admin::routes(state))
        .nest("/box-office-awards", details::box_office_routes(state))
        .nest("/news-and-updates", details::news_routes(state))
}

/// Requires a valid bearer token on every route of `router`
pub(crate) fn protected(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Requires an admin bearer token on every route of `router`
pub(crate) fn admin_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    protected(router.route_layer(middleware::from_fn(require_admin)), state)
}

/// Trimmed value, or `None` when absent or blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a comma-separated query value, dropping empty items
pub(crate) fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// The authenticated caller's account
pub(crate) async fn load_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    state
        .store
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

/// Persists `user` with a fresh `updated_at`; a vanished account is a 404
pub(crate) async fn save_user(state: &AppState, user: &mut User) -> AppResult<()> {
    user.touch();
    if !state.store.update_user(user).await? {
        return Err(AppError::not_found("User"));
    }
    Ok(())
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn banner() -> &'static str {
    "Movie Recommendation System API is running..."
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::Config, db::MemoryStore};

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Ada ".into())), Some("Ada".to_string()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("Drama, Crime,,")), vec!["Drama", "Crime"]);
        assert!(split_list(None).is_empty());
    }

    #[tokio::test]
    async fn test_save_user_reports_missing_account() {
        let state = AppState::new(Config::default(), Arc::new(MemoryStore::new()));
        let mut ghost = User::new("Ghost", "ghost@example.com", "ghost", "hash");

        let result = save_user(&state, &mut ghost).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "User not found"));
    }

    #[tokio::test]
    async fn test_save_user_touches_existing_account() {
        let state = AppState::new(Config::default(), Arc::new(MemoryStore::new()));
        let mut user = User::new("Ada", "ada@example.com", "ada", "hash");
        state.store.create_user(&user).await.unwrap();
        let before = user.updated_at;

        user.wishlist.push("m1".into());
        save_user(&state, &mut user).await.unwrap();

        let stored = state.store.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.wishlist, vec!["m1".to_string()]);
        assert!(stored.updated_at >= before);
    }
}
