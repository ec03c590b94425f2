//! Box-office/awards and news/updates views over the catalog.

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{MovieFilter, MovieSort},
    error::{AppError, AppResult},
    models::{Article, Award, BoxOffice, BoxOfficeAwards, Movie, NewsAndUpdates, Person, Sequel},
    pagination::{Page, PageResponse, PageWindow},
};

use super::{extract::Json, non_blank, protected, AppState};

pub fn box_office_routes(state: &AppState) -> Router<AppState> {
    protected(
        Router::new().route("/", get(list_box_office).put(update_box_office)),
        state,
    )
}

pub fn news_routes(state: &AppState) -> Router<AppState> {
    protected(Router::new().route("/", get(list_news).put(update_news)), state)
}

fn missing_fields() -> AppError {
    AppError::invalid("Missing required fields")
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeUpdate {
    pub movie_id: Option<String>,
    pub box_office: Option<BoxOffice>,
    pub awards_and_nominations: Option<Vec<Award>>,
    pub director: Option<Person>,
    pub cast: Option<Vec<Person>>,
}

impl BoxOfficeUpdate {
    /// Splits off the target id, failing when a required field is absent
    fn target(&self) -> AppResult<String> {
        if self.box_office.is_none() || self.awards_and_nominations.is_none() {
            return Err(missing_fields());
        }
        non_blank(self.movie_id.clone()).ok_or_else(missing_fields)
    }

    /// Overwrites the earnings and awards; director and cast only when given
    pub fn apply(self, movie: &mut Movie) {
        if let Some(box_office) = self.box_office {
            movie.box_office = box_office;
        }
        if let Some(awards) = self.awards_and_nominations {
            movie.awards_and_nominations = awards;
        }
        if let Some(director) = self.director {
            movie.director = Some(director);
        }
        if let Some(cast) = self.cast {
            movie.cast = cast;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdate {
    pub movie_id: Option<String>,
    pub news_and_articles: Option<Vec<Article>>,
    pub sequels: Option<Vec<Sequel>>,
    pub cast: Option<Vec<Person>>,
}

impl NewsUpdate {
    fn target(&self) -> AppResult<String> {
        if self.news_and_articles.is_none() {
            return Err(missing_fields());
        }
        non_blank(self.movie_id.clone()).ok_or_else(missing_fields)
    }

    pub fn apply(self, movie: &mut Movie) {
        if let Some(news) = self.news_and_articles {
            movie.news_and_articles = news;
        }
        if let Some(sequels) = self.sequels {
            movie.sequels = sequels;
        }
        if let Some(cast) = self.cast {
            movie.cast = cast;
        }
    }
}

/// One id-ordered page of the catalog
async fn catalog_page(state: &AppState, window: &PageWindow) -> AppResult<Vec<Movie>> {
    state
        .store
        .find_movies(&MovieFilter::default(), MovieSort::Id, window)
        .await
}

async fn load_movie(state: &AppState, id: &str) -> AppResult<Movie> {
    state
        .store
        .get_movie(id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie"))
}

async fn save_movie(state: &AppState, movie: &Movie) -> AppResult<()> {
    if !state.store.replace_movie(movie).await? {
        return Err(AppError::not_found("Movie"));
    }
    Ok(())
}

async fn list_box_office(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<BoxOfficeAwards>>> {
    let views = catalog_page(&state, &window)
        .await?
        .into_iter()
        .map(BoxOfficeAwards::from)
        .collect();
    Ok(Json(PageResponse::new(&window, views)))
}

async fn update_box_office(
    State(state): State<AppState>,
    Json(body): Json<BoxOfficeUpdate>,
) -> AppResult<Json<Value>> {
    let id = body.target()?;
    let mut movie = load_movie(&state, &id).await?;
    body.apply(&mut movie);
    save_movie(&state, &movie).await?;

    tracing::info!(movie_id = %movie.id, "Box office and awards updated");
    Ok(Json(json!({
        "message": "Box Office and Awards updated successfully",
        "data": movie
    })))
}

async fn list_news(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<NewsAndUpdates>>> {
    let views = catalog_page(&state, &window)
        .await?
        .into_iter()
        .map(NewsAndUpdates::from)
        .collect();
    Ok(Json(PageResponse::new(&window, views)))
}

async fn update_news(
    State(state): State<AppState>,
    Json(body): Json<NewsUpdate>,
) -> AppResult<Json<Value>> {
    let id = body.target()?;
    let mut movie = load_movie(&state, &id).await?;
    body.apply(&mut movie);
    save_movie(&state, &movie).await?;

    tracing::info!(movie_id = %movie.id, "News and updates saved");
    Ok(Json(json!({
        "message": "News, Updates, Sequels, and Cast updated successfully",
        "data": movie
    })))
}
