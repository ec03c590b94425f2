//! User-curated movie lists.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{CustomList, Movie},
    pagination::{Page, PageResponse},
    services::{notifier::dispatch, Recipients},
};

use super::{extract::{Json, Path}, load_user, non_blank, protected, save_user, AppState};

const DEFAULT_SHARE_MESSAGE: &str = "Check out this amazing custom list!";

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/:id", get(get_list));

    let authenticated = Router::new()
        .route("/", get(list_lists).post(create_list))
        .route("/follow", put(follow))
        .route("/unfollow", put(unfollow))
        .route("/add-movie", put(add_movie))
        .route("/remove-movie", put(remove_movie))
        .route("/share/:id", post(share_list))
        .route("/:id", put(update_list).delete(delete_list));

    public.merge(protected(authenticated, state))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    #[serde(default)]
    pub movies: Vec<String>,
}

async fn find_list(state: &AppState, id: &str) -> AppResult<CustomList> {
    state
        .store
        .get_list(id)
        .await?
        .ok_or_else(|| AppError::not_found("Custom list"))
}

/// Loads a list the caller is allowed to modify
async fn owned_list(state: &AppState, auth: &AuthUser, id: &str) -> AppResult<CustomList> {
    let list = find_list(state, id).await?;
    if !list.is_owned_by(&auth.user_id) {
        return Err(AppError::Forbidden(
            "Only the creator can modify this list".to_string(),
        ));
    }
    Ok(list)
}

async fn store_list(state: &AppState, list: &mut CustomList) -> AppResult<()> {
    list.updated_at = Utc::now();
    list.ensure_link(&state.config.public_base_url);
    if !state.store.update_list(list).await? {
        return Err(AppError::not_found("Custom list"));
    }
    Ok(())
}

async fn create_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ListRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let name = non_blank(body.name).ok_or_else(|| AppError::invalid("Name is required"))?;
    let mut owner = load_user(&state, &auth).await?;

    let mut list = CustomList::new(name, &auth.user_id);
    list.description = non_blank(body.description);
    list.is_public = body.is_public.unwrap_or(true);
    list.movies = body.movies;
    list.ensure_link(&state.config.public_base_url);
    state.store.create_list(&list).await?;

    owner.custom_lists.push(list.id.clone());
    save_user(&state, &mut owner).await?;

    tracing::info!(list_id = %list.id, creator = %auth.user_id, "Custom list created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Custom list created successfully", "data": list })),
    ))
}

async fn list_lists(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<CustomList>>> {
    let lists = state.store.lists(&window).await?;
    Ok(Json(PageResponse::new(&window, lists)))
}

async fn get_list(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<CustomList>> {
    Ok(Json(find_list(&state, &id).await?))
}

async fn update_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ListRequest>,
) -> AppResult<Json<Value>> {
    let mut list = owned_list(&state, &auth, &id).await?;
    if let Some(name) = non_blank(body.name) {
        list.name = name;
    }
    if let Some(description) = body.description {
        list.description = non_blank(Some(description));
    }
    if let Some(is_public) = body.is_public {
        list.is_public = is_public;
    }
    store_list(&state, &mut list).await?;

    Ok(Json(json!({ "message": "Custom list updated", "data": list })))
}

async fn delete_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let list = owned_list(&state, &auth, &id).await?;
    state.store.delete_list(&list.id).await?;

    if let Some(mut owner) = state.store.get_user(&auth.user_id).await? {
        owner.custom_lists.retain(|l| *l != list.id);
        save_user(&state, &mut owner).await?;
    }

    tracing::info!(list_id = %list.id, "Custom list deleted");
    Ok(Json(json!({ "message": "Custom list deleted" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTarget {
    pub list_id: Option<String>,
    pub movie_id: Option<String>,
}

impl ListTarget {
    fn list_id(&self) -> AppResult<String> {
        non_blank(self.list_id.clone()).ok_or_else(|| AppError::invalid("List ID is required"))
    }

    fn movie_id(&self) -> AppResult<String> {
        non_blank(self.movie_id.clone()).ok_or_else(|| AppError::invalid("Movie ID is required"))
    }
}

async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ListTarget>,
) -> AppResult<Json<Value>> {
    let mut list = find_list(&state, &body.list_id()?).await?;
    if list.followers.contains(&auth.user_id) {
        return Err(AppError::invalid("You are already following this list"));
    }
    list.followers.push(auth.user_id.clone());
    store_list(&state, &mut list).await?;

    let mut user = load_user(&state, &auth).await?;
    if !user.followed_lists.contains(&list.id) {
        user.followed_lists.push(list.id.clone());
        save_user(&state, &mut user).await?;
    }

    Ok(Json(json!({ "message": "Followed custom list", "data": list })))
}

async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ListTarget>,
) -> AppResult<Json<Value>> {
    let mut list = find_list(&state, &body.list_id()?).await?;
    if !list.followers.contains(&auth.user_id) {
        return Err(AppError::invalid("You are not following this list"));
    }
    list.followers.retain(|f| *f != auth.user_id);
    store_list(&state, &mut list).await?;

    if let Some(mut user) = state.store.get_user(&auth.user_id).await? {
        user.followed_lists.retain(|l| *l != list.id);
        save_user(&state, &mut user).await?;
    }

    Ok(Json(json!({ "message": "Unfollowed custom list", "data": list })))
}

async fn add_movie(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ListTarget>,
) -> AppResult<Json<Value>> {
    let movie_id = body.movie_id()?;
    let mut list = owned_list(&state, &auth, &body.list_id()?).await?;
    if state.store.get_movie(&movie_id).await?.is_none() {
        return Err(AppError::not_found("Movie"));
    }
    if list.movies.contains(&movie_id) {
        return Err(AppError::invalid("Movie already in the list"));
    }
    list.movies.push(movie_id);
    store_list(&state, &mut list).await?;

    Ok(Json(json!({ "message": "Movie added to list", "data": list })))
}

async fn remove_movie(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ListTarget>,
) -> AppResult<Json<Value>> {
    let movie_id = body.movie_id()?;
    let mut list = owned_list(&state, &auth, &body.list_id()?).await?;
    if !list.movies.contains(&movie_id) {
        return Err(AppError::invalid("Movie not found in the list"));
    }
    list.movies.retain(|m| *m != movie_id);
    store_list(&state, &mut list).await?;

    Ok(Json(json!({ "message": "Movie removed from list", "data": list })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ShareRequest {
    pub email: Option<String>,
    pub sms: Option<String>,
    pub whatsapp: Option<String>,
    pub message: Option<String>,
}

impl ShareRequest {
    pub fn recipients(&self) -> Recipients {
        Recipients {
            email: self.email.clone(),
            sms: self.sms.clone(),
            whatsapp: self.whatsapp.clone(),
        }
    }
}

/// Plain-text share body for a list and its resolved movies
pub fn render_list_share(list: &CustomList, movies: &[Movie], message: Option<&str>) -> String {
    let mut body = format!(
        "{}\n\nList: {}\n",
        message.unwrap_or(DEFAULT_SHARE_MESSAGE),
        list.name
    );
    if let Some(description) = &list.description {
        body.push_str(&format!("Description: {}\n", description));
    }
    body.push_str("Movies:\n");
    for (i, movie) in movies.iter().enumerate() {
        body.push_str(&format!("{}. {} ({})\n", i + 1, movie.title, movie.genre.join(", ")));
    }
    if let Some(link) = &list.shareable_link {
        body.push_str(&format!("\nLink: {}\n", link));
    }
    body
}

async fn share_list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ShareRequest>,
) -> AppResult<Json<Value>> {
    let list = find_list(&state, &id).await?;
    if !list.is_public {
        return Err(AppError::invalid("Cannot share a private custom list"));
    }

    let recipients = body.recipients();
    let movies = state.store.movies_by_ids(&list.movies).await?;
    let text = render_list_share(&list, &movies, non_blank(body.message).as_deref());
    let messages = recipients.messages(&format!("Check out {}", list.name), &text);
    if messages.is_empty() {
        return Err(AppError::invalid("At least one recipient is required"));
    }

    let sent = dispatch(state.notifier.as_ref(), messages).await?;
    tracing::info!(list_id = %list.id, sent, "Custom list shared");
    Ok(Json(json!({ "message": "Custom list shared", "sent": sent })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_body_lists_movies_and_link() {
        let mut list = CustomList::new("Noir", "u1");
        list.description = Some("Shadows".into());
        list.ensure_link("http://localhost:5000");
        let movies = vec![Movie {
            title: "The Third Man".into(),
            genre: vec!["Film-Noir".into(), "Thriller".into()],
            ..Default::default()
        }];

        let body = render_list_share(&list, &movies, None);

        assert!(body.starts_with(DEFAULT_SHARE_MESSAGE));
        assert!(body.contains("Description: Shadows"));
        assert!(body.contains("1. The Third Man (Film-Noir, Thriller)"));
        assert!(body.contains(&format!("/custom-lists/{}", list.id)));
    }
}
