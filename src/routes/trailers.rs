//! Trailers and trailer sharing.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{new_id, Trailer, TrailerType},
    pagination::{Page, PageResponse},
    services::{notifier::dispatch, Recipients},
};

use super::{admin_only, extract::{Json, Path}, non_blank, AppState};

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_trailers))
        .route("/share", post(share_trailer))
        .route("/:id", get(get_trailer));

    let admin = Router::new()
        .route("/", post(create_trailer))
        .route("/:id", put(update_trailer).delete(delete_trailer));

    public.merge(admin_only(admin, state))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerRequest {
    pub movie_id: Option<String>,
    pub trailer_name: Option<String>,
    pub trailer_url: Option<String>,
    pub trailer_type: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub region_restrictions: Vec<String>,
    pub is_public: Option<bool>,
}

impl TrailerRequest {
    /// Validates the body into a new trailer with a fresh id
    pub fn into_trailer(self) -> AppResult<Trailer> {
        let required = (
            non_blank(self.trailer_name),
            non_blank(self.trailer_url),
            non_blank(self.trailer_type),
            non_blank(self.release_date),
            self.duration,
            non_blank(self.description),
        );
        let (
            Some(trailer_name),
            Some(trailer_url),
            Some(trailer_type),
            Some(release_date),
            Some(duration),
            Some(description),
        ) = required
        else {
            return Err(AppError::invalid("Missing required fields"));
        };

        let trailer_type: TrailerType = trailer_type.parse().map_err(AppError::InvalidInput)?;
        let release_date = NaiveDate::parse_from_str(&release_date, "%Y-%m-%d")
            .map_err(|_| AppError::invalid("Invalid releaseDate"))?;
        if duration <= 0 {
            return Err(AppError::invalid("Duration must be positive"));
        }

        let now = Utc::now();
        Ok(Trailer {
            id: new_id(),
            movie_id: non_blank(self.movie_id),
            trailer_name,
            trailer_url,
            trailer_type,
            release_date,
            duration,
            description,
            language: non_blank(self.language),
            region_restrictions: self.region_restrictions,
            is_public: self.is_public.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }
}

async fn find_trailer(state: &AppState, id: &str) -> AppResult<Trailer> {
    state
        .store
        .get_trailer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Trailer"))
}

/// Rejects a (movie, url) pair already used by another trailer
async fn ensure_unique(state: &AppState, trailer: &Trailer) -> AppResult<()> {
    let existing = state
        .store
        .find_trailer_by_url(trailer.movie_id.clone(), &trailer.trailer_url)
        .await?;
    match existing {
        Some(other) if other.id != trailer.id => Err(AppError::Conflict(
            "This trailer already exists for the specified movie.".to_string(),
        )),
        _ => Ok(()),
    }
}

async fn ensure_movie(state: &AppState, trailer: &Trailer) -> AppResult<()> {
    if let Some(movie_id) = &trailer.movie_id {
        if state.store.get_movie(movie_id).await?.is_none() {
            return Err(AppError::not_found("Movie"));
        }
    }
    Ok(())
}

async fn create_trailer(
    State(state): State<AppState>,
    Json(body): Json<TrailerRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let trailer = body.into_trailer()?;
    ensure_movie(&state, &trailer).await?;
    ensure_unique(&state, &trailer).await?;
    state.store.create_trailer(&trailer).await?;

    tracing::info!(trailer_id = %trailer.id, "Trailer created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Trailer created successfully", "data": trailer })),
    ))
}

async fn list_trailers(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<Trailer>>> {
    let trailers = state.store.trailers(&window).await?;
    Ok(Json(PageResponse::new(&window, trailers)))
}

async fn get_trailer(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Trailer>> {
    Ok(Json(find_trailer(&state, &id).await?))
}

async fn update_trailer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TrailerRequest>,
) -> AppResult<Json<Value>> {
    let existing = find_trailer(&state, &id).await?;
    let mut trailer = body.into_trailer()?;
    trailer.id = existing.id;
    trailer.created_at = existing.created_at;

    ensure_movie(&state, &trailer).await?;
    ensure_unique(&state, &trailer).await?;
    state.store.update_trailer(&trailer).await?;

    Ok(Json(json!({ "message": "Trailer updated successfully", "data": trailer })))
}

async fn delete_trailer(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    if !state.store.delete_trailer(&id).await? {
        return Err(AppError::not_found("Trailer"));
    }
    tracing::info!(trailer_id = %id, "Trailer deleted");
    Ok(Json(json!({ "message": "Trailer deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerShare {
    pub trailer_id: Option<String>,
    pub email: Option<String>,
    pub sms: Option<String>,
    pub whatsapp: Option<String>,
    pub message: Option<String>,
}

fn render_trailer_share(trailer: &Trailer, message: Option<&str>) -> String {
    format!(
        "{}\n\n{} ({})\n{}\nReleased: {}\nWatch: {}\n",
        message.unwrap_or("Check out this trailer!"),
        trailer.trailer_name,
        trailer.trailer_type,
        trailer.description,
        trailer.release_date,
        trailer.trailer_url,
    )
}

async fn share_trailer(
    State(state): State<AppState>,
    Json(body): Json<TrailerShare>,
) -> AppResult<Json<Value>> {
    let trailer_id =
        non_blank(body.trailer_id).ok_or_else(|| AppError::invalid("Trailer ID is required"))?;
    let trailer = find_trailer(&state, &trailer_id).await?;
    if !trailer.is_public {
        return Err(AppError::invalid("Cannot share a private trailer"));
    }

    let recipients = Recipients {
        email: body.email,
        sms: body.sms,
        whatsapp: body.whatsapp,
    };
    let text = render_trailer_share(&trailer, non_blank(body.message).as_deref());
    let messages = recipients.messages(&format!("Watch {}", trailer.trailer_name), &text);
    if messages.is_empty() {
        return Err(AppError::invalid("At least one recipient is required"));
    }

    let sent = dispatch(state.notifier.as_ref(), messages).await?;
    tracing::info!(trailer_id = %trailer.id, sent, "Trailer shared");
    Ok(Json(json!({ "message": "Trailer shared", "sent": sent })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> TrailerRequest {
        TrailerRequest {
            trailer_name: Some("Official Trailer".into()),
            trailer_url: Some("https://video.example/t1".into()),
            trailer_type: Some("Behind the Scenes".into()),
            release_date: Some("2024-03-01".into()),
            duration: Some(150),
            description: Some("First look".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_request_builds_public_trailer() {
        let trailer = complete().into_trailer().unwrap();
        assert_eq!(trailer.trailer_type, TrailerType::BehindTheScenes);
        assert_eq!(trailer.release_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(trailer.is_public);
        assert!(trailer.movie_id.is_none());
    }

    #[test]
    fn test_missing_or_bad_fields_rejected() {
        let missing = TrailerRequest {
            description: None,
            ..complete()
        };
        assert!(matches!(missing.into_trailer(), Err(AppError::InvalidInput(_))));

        let bad_type = TrailerRequest {
            trailer_type: Some("Clip".into()),
            ..complete()
        };
        assert!(matches!(bad_type.into_trailer(), Err(AppError::InvalidInput(_))));

        let bad_date = TrailerRequest {
            release_date: Some("03/01/2024".into()),
            ..complete()
        };
        assert!(bad_date.into_trailer().is_err());
    }

    #[test]
    fn test_share_text_mentions_url() {
        let trailer = complete().into_trailer().unwrap();
        let text = render_trailer_share(&trailer, Some("Look"));
        assert!(text.starts_with("Look"));
        assert!(text.contains("https://video.example/t1"));
        assert!(text.contains("Behind the Scenes"));
    }
}
