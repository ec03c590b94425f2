//! Discussion boards and their posts.

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
    models::{Board, Post},
    pagination::{Page, PageResponse},
};

use super::{admin_only, extract::{Json, Path}, non_blank, protected, AppState};

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_board))
        .route("/:id", put(update_board).delete(delete_board));

    let authenticated = Router::new()
        .route("/", get(list_boards))
        .route("/:id", get(get_board))
        .route("/:id/join", post(join_board))
        .route("/:id/unfollow", post(leave_board));

    admin_only(admin, state).merge(protected(authenticated, state))
}

pub fn post_routes(state: &AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", post(create_post))
        .route(
            "/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/discussion-board/:board_id", get(board_posts));
    protected(authenticated, state)
}

#[derive(Debug, Deserialize)]
pub struct BoardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BoardRequest {
    fn validated(self) -> AppResult<(String, String, Vec<String>)> {
        match (non_blank(self.title), non_blank(self.description)) {
            (Some(title), Some(description)) => Ok((title, description, self.tags)),
            (None, _) => Err(AppError::invalid("Title is required")),
            (_, None) => Err(AppError::invalid("Description is required")),
        }
    }
}

async fn find_board(state: &AppState, id: &str) -> AppResult<Board> {
    state
        .store
        .get_board(id)
        .await?
        .ok_or_else(|| AppError::not_found("Discussion board"))
}

async fn create_board(
    State(state): State<AppState>,
    Json(body): Json<BoardRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (title, description, tags) = body.validated()?;
    let board = Board::new(title, description, tags);
    state.store.create_board(&board).await?;

    tracing::info!(board_id = %board.id, "Discussion board created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Discussion board created successfully", "data": board })),
    ))
}

async fn list_boards(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<Board>>> {
    let boards = state.store.boards(&window).await?;
    Ok(Json(PageResponse::new(&window, boards)))
}

async fn get_board(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Board>> {
    Ok(Json(find_board(&state, &id).await?))
}

async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BoardRequest>,
) -> AppResult<Json<Value>> {
    let (title, description, tags) = body.validated()?;
    let mut board = find_board(&state, &id).await?;
    board.title = title;
    board.description = description;
    board.tags = tags;
    board.updated_at = Utc::now();
    state.store.update_board(&board).await?;

    Ok(Json(json!({ "message": "Discussion board updated successfully", "data": board })))
}

async fn delete_board(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    if !state.store.delete_board(&id).await? {
        return Err(AppError::not_found("Discussion board"));
    }
    tracing::info!(board_id = %id, "Discussion board deleted");
    Ok(Json(json!({ "message": "Discussion board deleted successfully" })))
}

async fn join_board(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let mut board = find_board(&state, &id).await?;
    if board.has_participant(&auth.user_id) {
        return Err(AppError::invalid("User already joined this board"));
    }
    board.participants.push(auth.user_id);
    board.updated_at = Utc::now();
    state.store.update_board(&board).await?;

    Ok(Json(json!({ "message": "Successfully joined the discussion board" })))
}

async fn leave_board(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let mut board = find_board(&state, &id).await?;
    if !board.has_participant(&auth.user_id) {
        return Err(AppError::invalid("User is not a participant of this board"));
    }
    board.participants.retain(|p| *p != auth.user_id);
    board.updated_at = Utc::now();
    state.store.update_board(&board).await?;

    Ok(Json(json!({ "message": "Successfully unfollowed the discussion board" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub content: Option<String>,
    pub discussion_board_id: Option<String>,
}

async fn find_post(state: &AppState, id: &str) -> AppResult<Post> {
    state
        .store
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post"))
}

async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PostRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (Some(content), Some(board_id)) =
        (non_blank(body.content), non_blank(body.discussion_board_id))
    else {
        return Err(AppError::invalid("Content and DiscussionBoardId are required."));
    };

    let board = find_board(&state, &board_id).await?;
    if !board.has_participant(&auth.user_id) {
        return Err(AppError::Forbidden(
            "You must be following the discussion board to create a post.".to_string(),
        ));
    }

    let post = Post::new(content, &auth.user_id, &board.id);
    state.store.create_post(&post).await?;

    tracing::info!(post_id = %post.id, board_id = %board.id, "Post created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "data": post })),
    ))
}

/// Loads a post the caller authored
async fn authored_post(state: &AppState, auth: &AuthUser, id: &str, verb: &str) -> AppResult<Post> {
    let post = find_post(state, id).await?;
    if post.author_id != auth.user_id {
        return Err(AppError::Forbidden(format!("You can only {} your own posts.", verb)));
    }
    Ok(post)
}

async fn get_post(State(state): State<AppState>, Path(post_id): Path<String>) -> AppResult<Json<Post>> {
    Ok(Json(find_post(&state, &post_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
}

async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
    Json(body): Json<PostUpdate>,
) -> AppResult<Json<Value>> {
    let content =
        non_blank(body.content).ok_or_else(|| AppError::invalid("Content is required for update."))?;
    let mut post = authored_post(&state, &auth, &post_id, "update").await?;
    post.content = content;
    post.updated_at = Utc::now();
    state.store.update_post(&post).await?;

    Ok(Json(json!({ "message": "Post updated successfully", "data": post })))
}

async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<Value>> {
    let post = authored_post(&state, &auth, &post_id, "delete").await?;
    state.store.delete_post(&post.id).await?;
    Ok(Json(json!({ "message": "Post deleted successfully." })))
}

async fn board_posts(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<Post>>> {
    let board = find_board(&state, &board_id).await?;
    let posts = state.store.posts_for_board(&board.id, &window).await?;
    Ok(Json(PageResponse::new(&window, posts)))
}
