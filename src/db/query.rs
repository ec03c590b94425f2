//! Store-independent movie query description.
//!
//! Handlers and services describe *what* they want with a [`MovieFilter`] and
//! a [`MovieSort`]; each store translates that into its own query language.
//! [`MovieFilter::matches`] is the reference semantics.

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::models::Movie;

/// Popularity band used by the similar-titles view
pub const SIMILAR_POPULARITY_BAND: f64 = 10.0;

/// Criteria for "similar to a reference movie": any one of them suffices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Similarity {
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub popularity: Option<f64>,
}

impl Similarity {
    pub fn of(movie: &Movie) -> Self {
        Self {
            genres: movie.genre.clone(),
            director: movie.director_name().map(str::to_string),
            popularity: movie.popularity,
        }
    }

    fn matches(&self, movie: &Movie) -> bool {
        let by_genre = movie.has_genre_in(&self.genres);
        let by_director = match (&self.director, movie.director_name()) {
            (Some(wanted), Some(name)) => wanted == name,
            _ => false,
        };
        let by_popularity = match (self.popularity, movie.popularity) {
            (Some(reference), Some(p)) => {
                p >= reference - SIMILAR_POPULARITY_BAND && p <= reference + SIMILAR_POPULARITY_BAND
            }
            _ => false,
        };
        by_genre || by_director || by_popularity
    }
}

/// Conjunction of optional movie predicates.
///
/// Empty lists and `None` fields impose no constraint. Range predicates never
/// match a movie whose field is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    /// Case-insensitive substring over title, genres, director and cast names
    pub text: Option<String>,
    pub genres_any: Vec<String>,
    pub actors_any: Vec<String>,
    /// Case-insensitive substring over cast names
    pub actor_like: Option<String>,
    pub director: Option<String>,
    pub exclude_ids: Vec<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub popularity_min: Option<f64>,
    pub popularity_max: Option<f64>,
    pub runtime_min: Option<i32>,
    pub runtime_max: Option<i32>,
    pub released_from: Option<NaiveDate>,
    pub released_to: Option<NaiveDate>,
    pub release_year_min: Option<i32>,
    pub release_year_max: Option<i32>,
    pub keywords_any: Vec<String>,
    pub platforms_any: Vec<String>,
    pub country_like: Option<String>,
    pub language_like: Option<String>,
    pub parental_rating_like: Option<String>,
    pub box_office_min: Option<f64>,
    pub box_office_max: Option<f64>,
    pub similar_to: Option<Similarity>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains_ci(haystack: Option<&str>, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => haystack.is_some_and(|h| contains_ci(h, needle)),
        None => true,
    }
}

fn in_range<T: PartialOrd + Copy>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

fn any_of(values: &[String], wanted: &[String]) -> bool {
    wanted.is_empty() || values.iter().any(|v| wanted.contains(v))
}

impl MovieFilter {
    pub fn genres(genres: &[String]) -> Self {
        Self {
            genres_any: genres.to_vec(),
            ..Default::default()
        }
    }

    pub fn actors(actors: &[String]) -> Self {
        Self {
            actors_any: actors.to_vec(),
            ..Default::default()
        }
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        if let Some(text) = &self.text {
            let hit = contains_ci(&movie.title, text)
                || movie.genre.iter().any(|g| contains_ci(g, text))
                || movie.director_name().is_some_and(|d| contains_ci(d, text))
                || movie.cast.iter().any(|p| contains_ci(&p.name, text));
            if !hit {
                return false;
            }
        }

        if !any_of(&movie.genre, &self.genres_any) {
            return false;
        }
        if !self.actors_any.is_empty() && !movie.has_actor_in(&self.actors_any) {
            return false;
        }
        if let Some(actor) = &self.actor_like {
            if !movie.cast.iter().any(|p| contains_ci(&p.name, actor)) {
                return false;
            }
        }
        if let Some(director) = &self.director {
            if movie.director_name() != Some(director.as_str()) {
                return false;
            }
        }
        if self.exclude_ids.contains(&movie.id) {
            return false;
        }

        if !in_range(movie.average_rating, self.rating_min, self.rating_max)
            || !in_range(movie.popularity, self.popularity_min, self.popularity_max)
            || !in_range(movie.runtime, self.runtime_min, self.runtime_max)
            || !in_range(movie.release_date, self.released_from, self.released_to)
            || !in_range(movie.release_year, self.release_year_min, self.release_year_max)
            || !in_range(
                movie.box_office.total_earnings,
                self.box_office_min,
                self.box_office_max,
            )
        {
            return false;
        }

        if !any_of(&movie.keywords, &self.keywords_any)
            || !any_of(&movie.streaming_platforms, &self.platforms_any)
        {
            return false;
        }

        let parental = movie
            .parental_guidance
            .as_ref()
            .and_then(|p| p.rating.as_deref());
        if !opt_contains_ci(movie.country_of_origin.as_deref(), &self.country_like)
            || !opt_contains_ci(movie.language.as_deref(), &self.language_like)
            || !opt_contains_ci(parental, &self.parental_rating_like)
        {
            return false;
        }

        self.similar_to
            .as_ref()
            .map_or(true, |similar| similar.matches(movie))
    }
}

/// Result ordering. Every variant breaks ties by ascending id and puts
/// missing values last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieSort {
    #[default]
    Id,
    PopularityDesc,
    AverageRatingDesc,
    /// Average rating, then popularity, then worldwide gross, all descending
    TopOfMonth,
    ReleaseYearAsc,
    ReleaseYearDesc,
    WorldwideGrossDesc,
}

fn desc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn asc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl MovieSort {
    pub fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        let primary = match self {
            MovieSort::Id => Ordering::Equal,
            MovieSort::PopularityDesc => desc(a.popularity, b.popularity),
            MovieSort::AverageRatingDesc => desc(a.average_rating, b.average_rating),
            MovieSort::TopOfMonth => desc(a.average_rating, b.average_rating)
                .then_with(|| desc(a.popularity, b.popularity))
                .then_with(|| desc(a.box_office.worldwide_gross, b.box_office.worldwide_gross)),
            MovieSort::ReleaseYearAsc => asc(a.release_year, b.release_year),
            MovieSort::ReleaseYearDesc => desc(a.release_year, b.release_year),
            MovieSort::WorldwideGrossDesc => {
                desc(a.box_office.worldwide_gross, b.box_office.worldwide_gross)
            }
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// SQL `ORDER BY` clause for the movies table
    pub fn order_by(&self) -> &'static str {
        match self {
            MovieSort::Id => "id ASC",
            MovieSort::PopularityDesc => "popularity DESC NULLS LAST, id ASC",
            MovieSort::AverageRatingDesc => "average_rating DESC NULLS LAST, id ASC",
            MovieSort::TopOfMonth => {
                "average_rating DESC NULLS LAST, popularity DESC NULLS LAST, worldwide_gross DESC NULLS LAST, id ASC"
            }
            MovieSort::ReleaseYearAsc => "release_year ASC NULLS LAST, id ASC",
            MovieSort::ReleaseYearDesc => "release_year DESC NULLS LAST, id ASC",
            MovieSort::WorldwideGrossDesc => "worldwide_gross DESC NULLS LAST, id ASC",
        }
    }
}
