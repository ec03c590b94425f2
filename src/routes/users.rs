//! Registration, login, profile and wishlist.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{Preferences, User},
    services::auth::{hash_password, is_valid_email, is_valid_password, verify_password},
};

use super::{extract::Json, load_user, non_blank, protected, save_user, AppState};

const PASSWORD_RULES: &str = "Password must be at least 6 characters long, include at least one \
     letter, one number, and one special character";

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let authenticated = Router::new()
        .route("/profile", get(get_profile).put(update_profile).delete(delete_profile))
        .route("/create-profile", post(create_profile))
        .route("/update-signup-details", put(update_signup_details))
        .route("/wishlist", get(get_wishlist).post(add_to_wishlist))
        .route("/wishlist/remove", post(remove_from_wishlist))
        .route("/wishlist/update", post(update_wishlist));

    public.merge(protected(authenticated, state))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (Some(name), Some(email), Some(username), Some(password)) = (
        non_blank(body.name),
        non_blank(body.email),
        non_blank(body.username),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::invalid("All fields are required"));
    };

    if !is_valid_email(&email) {
        return Err(AppError::invalid("Invalid email format"));
    }
    if !is_valid_password(&password) {
        return Err(AppError::invalid(PASSWORD_RULES));
    }

    let taken = state.store.find_user_by_email(&email).await?.is_some()
        || state.store.find_user_by_username(&username).await?.is_some();
    if taken {
        return Err(AppError::Conflict("Email or username already exists".to_string()));
    }

    let hash = hash_password(&password, state.config.bcrypt_cost)?;
    let user = User::new(name, email, username, hash);
    state.store.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user": user })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_username: Option<String>,
    pub password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let (Some(login), Some(password)) = (
        non_blank(body.email_or_username),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::invalid("Email/Username and password are required"));
    };
    if password.chars().count() < 6 {
        return Err(AppError::invalid("Password must be at least 6 characters long"));
    }

    let user = match state.store.find_user_by_email(&login).await? {
        Some(user) => Some(user),
        None => state.store.find_user_by_username(&login).await?,
    }
    .ok_or_else(|| AppError::not_found("User"))?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::invalid("Invalid credentials"));
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(json!({ "token": token, "user": user })))
}

async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(load_user(&state, &auth).await?))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub preferences: Option<Preferences>,
}

async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> AppResult<Json<Value>> {
    let name = non_blank(body.name);
    if name.is_none() && body.preferences.is_none() {
        return Err(AppError::invalid("No fields to update"));
    }

    let mut user = load_user(&state, &auth).await?;
    if let Some(name) = name {
        user.name = name;
    }
    if let Some(preferences) = body.preferences {
        user.preferences = preferences;
    }
    save_user(&state, &mut user).await?;

    Ok(Json(json!({ "message": "Profile updated successfully", "user": user })))
}

#[derive(Debug, Deserialize)]
pub struct CreateProfile {
    pub preferences: Option<Preferences>,
}

async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateProfile>,
) -> AppResult<Json<Value>> {
    let preferences = body
        .preferences
        .ok_or_else(|| AppError::invalid("Preferences are required"))?;

    let mut user = load_user(&state, &auth).await?;
    user.preferences = preferences;
    save_user(&state, &mut user).await?;

    Ok(Json(json!({ "message": "Profile created successfully", "user": user })))
}

async fn delete_profile(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Value>> {
    if !state.store.delete_user(&auth.user_id).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = %auth.user_id, "User deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

async fn update_signup_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<Value>> {
    let name = non_blank(body.name);
    let email = non_blank(body.email);
    let username = non_blank(body.username);
    let password = body.password.filter(|p| !p.is_empty());

    if name.is_none() && email.is_none() && username.is_none() && password.is_none() {
        return Err(AppError::invalid("At least one field must be updated"));
    }
    if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
        return Err(AppError::invalid("Invalid email format"));
    }
    if password.as_deref().is_some_and(|p| !is_valid_password(p)) {
        return Err(AppError::invalid(PASSWORD_RULES));
    }

    let mut user = load_user(&state, &auth).await?;

    if let Some(email) = email.filter(|e| *e != user.email) {
        if state.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        user.email = email;
    }
    if let Some(username) = username.filter(|u| *u != user.username) {
        if state.store.find_user_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        user.username = username;
    }
    if let Some(password) = password {
        user.password_hash = hash_password(&password, state.config.bcrypt_cost)?;
    }
    if let Some(name) = name {
        user.name = name;
    }
    save_user(&state, &mut user).await?;

    Ok(Json(json!({ "message": "Signup details updated successfully", "user": user })))
}

async fn get_wishlist(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Value>> {
    let user = load_user(&state, &auth).await?;
    Ok(Json(json!({ "wishlist": user.wishlist })))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAction {
    Add,
    Remove,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub movie_id: Option<String>,
    pub action: Option<String>,
}

/// Applies one add/remove to the wishlist, rejecting no-ops
fn apply_wishlist(wishlist: &mut Vec<String>, movie_id: &str, action: WishlistAction) -> AppResult<()> {
    let present = wishlist.iter().any(|id| id == movie_id);
    match action {
        WishlistAction::Add if present => Err(AppError::invalid("Movie already in wishlist")),
        WishlistAction::Add => {
            wishlist.push(movie_id.to_string());
            Ok(())
        }
        WishlistAction::Remove if !present => {
            Err(AppError::invalid("Movie not found in wishlist"))
        }
        WishlistAction::Remove => {
            wishlist.retain(|id| id != movie_id);
            Ok(())
        }
    }
}

async fn change_wishlist(
    state: &AppState,
    auth: &AuthUser,
    movie_id: &str,
    action: WishlistAction,
) -> AppResult<Vec<String>> {
    let mut user = load_user(state, auth).await?;
    apply_wishlist(&mut user.wishlist, movie_id, action)?;
    save_user(state, &mut user).await?;
    Ok(user.wishlist)
}

fn required_movie_id(body: &WishlistRequest) -> AppResult<String> {
    body.movie_id
        .clone()
        .and_then(|id| non_blank(Some(id)))
        .ok_or_else(|| AppError::invalid("Movie ID is required"))
}

async fn add_to_wishlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<WishlistRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = required_movie_id(&body)?;
    let wishlist = change_wishlist(&state, &auth, &movie_id, WishlistAction::Add).await?;
    Ok(Json(json!({ "message": "Movie added to wishlist", "wishlist": wishlist })))
}

async fn remove_from_wishlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<WishlistRequest>,
) -> AppResult<Json<Value>> {
    let movie_id = required_movie_id(&body)?;
    let wishlist = change_wishlist(&state, &auth, &movie_id, WishlistAction::Remove).await?;
    Ok(Json(json!({ "message": "Movie removed from wishlist", "wishlist": wishlist })))
}

async fn update_wishlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<WishlistRequest>,
) -> AppResult<Json<Value>> {
    let (Ok(movie_id), Some(action)) = (required_movie_id(&body), non_blank(body.action.clone()))
    else {
        return Err(AppError::invalid("Movie ID and action are required"));
    };
    let action = match action.as_str() {
        "add" => WishlistAction::Add,
        "remove" => WishlistAction::Remove,
        _ => return Err(AppError::invalid("Invalid action. Use 'add' or 'remove'")),
    };

    let wishlist = change_wishlist(&state, &auth, &movie_id, action).await?;
    Ok(Json(json!({ "message": "Wishlist updated successfully", "wishlist": wishlist })))
}
