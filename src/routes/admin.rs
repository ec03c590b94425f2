//! Catalog statistics for administrators.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{
    db::{MovieFilter, MovieSort},
    error::{AppError, AppResult},
    models::{CountBucket, DiscussionRow, EngagementRow, Movie},
    pagination::{Page, PageResponse, PageWindow},
};

use super::{admin_only, extract::{Json, Query}, non_blank, split_list, AppState};

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/popular-movies", get(popular_movies))
        .route("/trending-genres", get(trending_genres))
        .route("/most-searched-actors", get(most_searched_actors))
        .route("/user-engagement", get(user_engagement))
        .route("/top-rated-movies", get(top_rated_movies))
        .route("/movies-by-year", get(movies_by_year))
        .route("/top-box-office", get(top_box_office))
        .route("/movies-by-director", get(movies_by_director))
        .route("/most-discussed", get(most_discussed));
    admin_only(admin, state)
}

type MoviePage = AppResult<Json<PageResponse<Movie>>>;

async fn ranked(state: &AppState, filter: MovieFilter, sort: MovieSort, window: PageWindow) -> MoviePage {
    let movies = state.store.find_movies(&filter, sort, &window).await?;
    Ok(Json(PageResponse::new(&window, movies)))
}

async fn popular_movies(State(state): State<AppState>, Page(window): Page) -> MoviePage {
    ranked(&state, MovieFilter::default(), MovieSort::PopularityDesc, window).await
}

async fn trending_genres(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<CountBucket>>> {
    let buckets = state.store.genre_counts(&window).await?;
    Ok(Json(PageResponse::new(&window, buckets)))
}

async fn most_searched_actors(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<CountBucket>>> {
    let buckets = state.store.actor_counts(&window).await?;
    Ok(Json(PageResponse::new(&window, buckets)))
}

async fn user_engagement(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<EngagementRow>>> {
    let rows = state.store.engagement(&window).await?;
    Ok(Json(PageResponse::new(&window, rows)))
}

async fn most_discussed(
    State(state): State<AppState>,
    Page(window): Page,
) -> AppResult<Json<PageResponse<DiscussionRow>>> {
    let rows = state.store.most_discussed(&window).await?;
    Ok(Json(PageResponse::new(&window, rows)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub genre: Option<String>,
    pub director: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

async fn top_rated_movies(
    State(state): State<AppState>,
    Page(window): Page,
    Query(query): Query<StatsQuery>,
) -> MoviePage {
    let genre = non_blank(query.genre).ok_or_else(|| AppError::invalid("Genre is required."))?;
    let filter = MovieFilter::genres(&split_list(Some(&genre)));
    ranked(&state, filter, MovieSort::AverageRatingDesc, window).await
}

/// Parses the inclusive year range, both ends required
fn year_range(query: &StatsQuery) -> AppResult<(i32, i32)> {
    let parse = |raw: &Option<String>| {
        raw.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<i32>())
    };
    match (parse(&query.start_year), parse(&query.end_year)) {
        (Some(Ok(start)), Some(Ok(end))) => Ok((start, end)),
        (Some(Err(_)), _) | (_, Some(Err(_))) => Err(AppError::invalid("Years must be integers.")),
        _ => Err(AppError::invalid("Start year and end year are required.")),
    }
}

async fn movies_by_year(
    State(state): State<AppState>,
    Page(window): Page,
    Query(query): Query<StatsQuery>,
) -> MoviePage {
    let (start, end) = year_range(&query)?;
    let filter = MovieFilter {
        release_year_min: Some(start),
        release_year_max: Some(end),
        ..Default::default()
    };
    ranked(&state, filter, MovieSort::ReleaseYearAsc, window).await
}

async fn top_box_office(State(state): State<AppState>, Page(window): Page) -> MoviePage {
    ranked(&state, MovieFilter::default(), MovieSort::WorldwideGrossDesc, window).await
}

async fn movies_by_director(
    State(state): State<AppState>,
    Page(window): Page,
    Query(query): Query<StatsQuery>,
) -> MoviePage {
    let director =
        non_blank(query.director).ok_or_else(|| AppError::invalid("Director name is required."))?;
    let filter = MovieFilter {
        director: Some(director),
        ..Default::default()
    };
    ranked(&state, filter, MovieSort::ReleaseYearDesc, window).await
}
