//! Catalog search and curated top lists.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{MovieFilter, MovieSort},
    error::{AppError, AppResult},
    models::Movie,
    pagination::{Page, PageResponse, PageWindow},
};

use super::{extract::{Json, Query}, protected, split_list, AppState};

/// Popularity floor for the `trending` search flag
pub const TRENDING_MIN_POPULARITY: f64 = 50.0;
/// How far back the `trending` search flag looks
pub const TRENDING_WINDOW_DAYS: u64 = 30;

const TOP_BY_GENRE_LIMIT: usize = 10;

pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", get(search_movies))
        .route("/top-by-genre", get(top_by_genre))
        .route("/top-of-month", get(top_of_month));
    protected(authenticated, state)
}

/// Search query string. Values stay raw until [`SearchQuery::to_filter`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub actor: Option<String>,
    pub director: Option<String>,
    pub rating_min: Option<String>,
    pub rating_max: Option<String>,
    pub popularity_min: Option<String>,
    pub popularity_max: Option<String>,
    pub release_year: Option<String>,
    pub release_decade: Option<String>,
    pub runtime_min: Option<String>,
    pub runtime_max: Option<String>,
    pub parental_rating: Option<String>,
    pub keywords: Option<String>,
    pub country_of_origin: Option<String>,
    pub language: Option<String>,
    pub box_office_min: Option<String>,
    pub box_office_max: Option<String>,
    pub streaming_platform: Option<String>,
    pub trending: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse<T: std::str::FromStr>(value: &Option<String>, name: &str) -> AppResult<Option<T>> {
    present(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| AppError::invalid(format!("Invalid {}", name)))
        })
        .transpose()
}

fn year_span(from: i32, to: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(from, 1, 1)?,
        NaiveDate::from_ymd_opt(to, 12, 31)?,
    ))
}

fn is_truthy(value: &Option<String>) -> bool {
    present(value).is_some_and(|v| !matches!(v, "false" | "0"))
}

impl SearchQuery {
    /// Translates the query string into a movie filter. `today` anchors the
    /// trending window.
    pub fn to_filter(&self, today: NaiveDate) -> AppResult<MovieFilter> {
        let mut filter = MovieFilter {
            text: present(&self.search).map(str::to_string),
            genres_any: split_list(present(&self.genre)),
            actor_like: present(&self.actor).map(str::to_string),
            director: present(&self.director).map(str::to_string),
            rating_min: parse(&self.rating_min, "ratingMin")?,
            rating_max: parse(&self.rating_max, "ratingMax")?,
            popularity_min: parse(&self.popularity_min, "popularityMin")?,
            popularity_max: parse(&self.popularity_max, "popularityMax")?,
            runtime_min: parse(&self.runtime_min, "runtimeMin")?,
            runtime_max: parse(&self.runtime_max, "runtimeMax")?,
            parental_rating_like: present(&self.parental_rating).map(str::to_string),
            keywords_any: split_list(present(&self.keywords)),
            country_like: present(&self.country_of_origin).map(str::to_string),
            language_like: present(&self.language).map(str::to_string),
            box_office_min: parse(&self.box_office_min, "boxOfficeMin")?,
            box_office_max: parse(&self.box_office_max, "boxOfficeMax")?,
            platforms_any: split_list(present(&self.streaming_platform)),
            ..Default::default()
        };

        let span = if let Some(year) = parse::<i32>(&self.release_year, "releaseYear")? {
            Some(year_span(year, year).ok_or_else(|| AppError::invalid("Invalid releaseYear"))?)
        } else if let Some(start) = parse::<i32>(&self.release_decade, "releaseDecade")? {
            Some(
                year_span(start, start.saturating_add(9))
                    .ok_or_else(|| AppError::invalid("Invalid releaseDecade"))?,
            )
        } else {
            None
        };
        if let Some((from, to)) = span {
            filter.released_from = Some(from);
            filter.released_to = Some(to);
        }

        if is_truthy(&self.trending) {
            filter.popularity_min = Some(TRENDING_MIN_POPULARITY);
            filter.released_from = today.checked_sub_days(Days::new(TRENDING_WINDOW_DAYS));
            filter.released_to = None;
        }

        Ok(filter)
    }
}

async fn search_movies(
    State(state): State<AppState>,
    Page(window): Page,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<PageResponse<Movie>>> {
    let filter = query.to_filter(Utc::now().date_naive())?;
    let movies = state
        .store
        .find_movies(&filter, MovieSort::Id, &window)
        .await?;

    tracing::debug!(results = movies.len(), "Movie search");
    Ok(Json(PageResponse::new(&window, movies)))
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub genre: Option<String>,
}

async fn top_by_genre(
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> AppResult<Json<Value>> {
    let genre = present(&query.genre)
        .ok_or_else(|| AppError::invalid("Genre is required for filtering."))?;

    let movies = state
        .store
        .find_movies(
            &MovieFilter::genres(&split_list(Some(genre))),
            MovieSort::AverageRatingDesc,
            &PageWindow::first(TOP_BY_GENRE_LIMIT),
        )
        .await?;
    Ok(Json(json!({ "genre": genre, "movies": movies })))
}

async fn top_of_month(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<Movie>>> {
    let movies = state
        .store
        .find_movies(&MovieFilter::default(), MovieSort::TopOfMonth, &window)
        .await?;
    Ok(Json(PageResponse::new(&window, movies)))
}
