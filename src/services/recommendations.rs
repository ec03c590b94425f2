//! Movie recommendations.
//!
//! [`Recommender::recommend`] blends three signals into an unranked candidate
//! pool: movies in the user's preferred genres, movies featuring preferred
//! actors, and movies rated by peers (other users sharing a preferred genre)
//! that the user has not rated yet. Alongside it, a separately paginated
//! "personalized" list holds unrated movies in the preferred genres.
//!
//! Trending, top-rated and similar-title views are single windowed queries.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{
    config::Config,
    db::{MovieFilter, MovieSort, MovieStore, ReviewStore, Similarity, UserStore},
    error::{AppError, AppResult},
    models::{Movie, Preferences, User},
    pagination::PageWindow,
};

/// Preferences applied to users that never chose any genres
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceDefaults {
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

impl From<&Config> for PreferenceDefaults {
    fn from(config: &Config) -> Self {
        Self {
            genres: config.default_genres.clone(),
            actors: config.default_actors.clone(),
        }
    }
}

impl PreferenceDefaults {
    /// The preferences recommendations are actually computed from
    pub fn effective(&self, preferences: &Preferences) -> Preferences {
        if preferences.genres.is_empty() {
            Preferences {
                genres: self.genres.clone(),
                actors: self.actors.clone(),
            }
        } else {
            preferences.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Deduplicated candidate pool, ascending id
    pub recommendations: Vec<Movie>,
    pub personalized_recommendations: Vec<Movie>,
    /// Cursor for the next page of `personalized_recommendations`
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Recommender {
    defaults: PreferenceDefaults,
}

impl Recommender {
    pub fn new(defaults: PreferenceDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &PreferenceDefaults {
        &self.defaults
    }

    /// Builds the recommendation pool and personalized page for `user`.
    ///
    /// Read-only. Missing preferences, peers or ratings are empty states.
    pub async fn recommend<M, R, U>(
        &self,
        movies: &M,
        reviews: &R,
        users: &U,
        user: &User,
        window: &PageWindow,
    ) -> AppResult<Recommendations>
    where
        M: MovieStore + ?Sized,
        R: ReviewStore + ?Sized,
        U: UserStore + ?Sized,
    {
        let prefs = self.defaults.effective(&user.preferences);

        let (genre_match, actor_match) = tokio::try_join!(
            matching(movies, &prefs.genres, MovieFilter::genres(&prefs.genres), window),
            matching(movies, &prefs.actors, MovieFilter::actors(&prefs.actors), window),
        )?;

        let rated: HashSet<String> = reviews
            .reviews_by_user(&user.id)
            .await?
            .into_iter()
            .map(|r| r.movie_id)
            .collect();

        let peer_movies = self
            .peer_candidates(movies, reviews, users, user, &prefs, &rated)
            .await?;

        let mut pool: BTreeMap<String, Movie> = BTreeMap::new();
        for movie in genre_match
            .into_iter()
            .chain(actor_match)
            .chain(peer_movies)
        {
            pool.entry(movie.id.clone()).or_insert(movie);
        }

        let personalized_filter = MovieFilter {
            exclude_ids: rated.iter().cloned().collect(),
            ..MovieFilter::genres(&prefs.genres)
        };
        let personalized =
            matching(movies, &prefs.genres, personalized_filter, window).await?;
        let next_cursor = window.next_cursor(&personalized);

        tracing::debug!(
            user_id = %user.id,
            pool = pool.len(),
            personalized = personalized.len(),
            rated = rated.len(),
            "Recommendations computed"
        );

        Ok(Recommendations {
            recommendations: pool.into_values().collect(),
            personalized_recommendations: personalized,
            next_cursor,
        })
    }

    /// Movies rated by peers, minus the ones `user` already rated
    async fn peer_candidates<M, R, U>(
        &self,
        movies: &M,
        reviews: &R,
        users: &U,
        user: &User,
        prefs: &Preferences,
        rated: &HashSet<String>,
    ) -> AppResult<Vec<Movie>>
    where
        M: MovieStore + ?Sized,
        R: ReviewStore + ?Sized,
        U: UserStore + ?Sized,
    {
        if prefs.genres.is_empty() {
            return Ok(Vec::new());
        }

        let peer_ids: Vec<String> = users
            .users_sharing_genres(&prefs.genres, &user.id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        if peer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let candidate_ids: Vec<String> = reviews
            .reviews_by_users(&peer_ids)
            .await?
            .into_iter()
            .map(|r| r.movie_id)
            .filter(|id| !rated.contains(id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        movies.movies_by_ids(&candidate_ids).await
    }
}

/// Windowed id-ordered query, empty when the preference list is empty
async fn matching<M>(
    movies: &M,
    wanted: &[String],
    filter: MovieFilter,
    window: &PageWindow,
) -> AppResult<Vec<Movie>>
where
    M: MovieStore + ?Sized,
{
    if wanted.is_empty() {
        return Ok(Vec::new());
    }
    movies.find_movies(&filter, MovieSort::Id, window).await
}

/// Most popular first
pub async fn trending<M>(movies: &M, window: &PageWindow) -> AppResult<Vec<Movie>>
where
    M: MovieStore + ?Sized,
{
    movies
        .find_movies(&MovieFilter::default(), MovieSort::PopularityDesc, window)
        .await
}

/// Highest average rating first
pub async fn top_rated<M>(movies: &M, window: &PageWindow) -> AppResult<Vec<Movie>>
where
    M: MovieStore + ?Sized,
{
    movies
        .find_movies(&MovieFilter::default(), MovieSort::AverageRatingDesc, window)
        .await
}

/// Movies sharing a genre or the director with `movie_id`, or within the
/// popularity band around it; most popular first, reference excluded
pub async fn similar<M>(movies: &M, movie_id: &str, window: &PageWindow) -> AppResult<Vec<Movie>>
where
    M: MovieStore + ?Sized,
{
    let reference = movies
        .get_movie(movie_id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie"))?;

    let filter = MovieFilter {
        similar_to: Some(Similarity::of(&reference)),
        exclude_ids: vec![reference.id.clone()],
        ..Default::default()
    };
    movies
        .find_movies(&filter, MovieSort::PopularityDesc, window)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{store::MockMovieStore, MemoryStore, ReviewStore, UserStore},
        models::{Person, Review},
    };

    fn movie(id: &str, genres: &[&str]) -> Movie {
        Movie {
            id: id.to_string(),
            title: format!("Title {}", id),
            genre: genres.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    fn user_with(genres: &[&str], actors: &[&str]) -> User {
        let mut user = User::new("U", format!("{}@x.io", genres.len()), "u", "h");
        user.preferences = Preferences {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            actors: actors.iter().map(|a| a.to_string()).collect(),
        };
        user
    }

    fn recommender() -> Recommender {
        Recommender::new(PreferenceDefaults::from(&Config::default()))
    }

    fn ids(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.id.as_str()).collect()
    }

    async fn rate(store: &MemoryStore, user: &User, movie_id: &str) {
        store
            .create_review(&Review::new(movie_id, &user.id, 4, None))
            .await
            .unwrap();
    }

    #[test]
    fn test_empty_genres_fall_back_to_defaults() {
        let defaults = PreferenceDefaults::from(&Config::default());
        let effective = defaults.effective(&Preferences::default());

        assert_eq!(effective.genres, vec!["Action", "Drama", "Comedy"]);
        assert_eq!(
            effective.actors,
            vec!["Leonardo DiCaprio", "Tom Hardy", "Morgan Freeman"]
        );

        let own = Preferences {
            genres: vec!["Horror".into()],
            actors: vec![],
        };
        assert_eq!(defaults.effective(&own), own);
    }

    #[test]
    fn test_defaults_are_injectable() {
        let defaults = PreferenceDefaults {
            genres: vec!["Western".into()],
            actors: vec!["Clint Eastwood".into()],
        };
        assert_eq!(defaults.effective(&Preferences::default()).genres, vec!["Western"]);
    }

    #[tokio::test]
    async fn test_personalized_skips_rated_and_other_genres() {
        let store = MemoryStore::new();
        store.insert_movie(&movie("a", &["Horror"])).await.unwrap();
        store.insert_movie(&movie("b", &["Horror"])).await.unwrap();
        store.insert_movie(&movie("c", &["Comedy"])).await.unwrap();

        let user = user_with(&["Horror"], &[]);
        store.create_user(&user).await.unwrap();
        rate(&store, &user, "a").await;

        let result = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::default())
            .await
            .unwrap();

        assert_eq!(ids(&result.personalized_recommendations), vec!["b"]);
        assert_eq!(result.next_cursor, None);
    }

    #[tokio::test]
    async fn test_pool_is_deduplicated_across_signals() {
        let store = MemoryStore::new();
        let mut both = movie("m1", &["Drama"]);
        both.cast = vec![Person::named("Viola Davis")];
        store.insert_movie(&both).await.unwrap();
        store.insert_movie(&movie("m2", &["Drama"])).await.unwrap();
        store.insert_movie(&movie("m3", &["Western"])).await.unwrap();

        let user = user_with(&["Drama"], &["Viola Davis"]);
        let peer = {
            let mut p = user_with(&["Drama", "Western"], &[]);
            p.username = "peer".into();
            p
        };
        store.create_user(&user).await.unwrap();
        store.create_user(&peer).await.unwrap();
        rate(&store, &peer, "m1").await;
        rate(&store, &peer, "m3").await;

        let result = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::default())
            .await
            .unwrap();

        assert_eq!(ids(&result.recommendations), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_peer_movies_exclude_own_ratings() {
        let store = MemoryStore::new();
        store.insert_movie(&movie("m1", &["Western"])).await.unwrap();
        store.insert_movie(&movie("m2", &["Western"])).await.unwrap();

        let user = user_with(&["Noir"], &[]);
        let peer = user_with(&["Noir"], &[]);
        store.create_user(&user).await.unwrap();
        store.create_user(&peer).await.unwrap();
        rate(&store, &peer, "m1").await;
        rate(&store, &peer, "m2").await;
        rate(&store, &user, "m1").await;

        let result = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::default())
            .await
            .unwrap();

        assert_eq!(ids(&result.recommendations), vec!["m2"]);
        assert!(result.personalized_recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_no_peers_degrades_to_content_matches() {
        let store = MemoryStore::new();
        store.insert_movie(&movie("m1", &["Horror"])).await.unwrap();
        store.insert_movie(&movie("m2", &["Comedy"])).await.unwrap();

        let user = user_with(&["Horror"], &[]);
        store.create_user(&user).await.unwrap();
        // rates its own movie; it is not its own peer
        rate(&store, &user, "m2").await;

        let result = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::default())
            .await
            .unwrap();

        assert_eq!(ids(&result.recommendations), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_user_without_preferences_gets_default_genres() {
        let store = MemoryStore::new();
        store.insert_movie(&movie("m1", &["Action"])).await.unwrap();
        store.insert_movie(&movie("m2", &["Horror"])).await.unwrap();
        let mut starring = movie("m3", &["Horror"]);
        starring.cast = vec![Person::named("Tom Hardy")];
        store.insert_movie(&starring).await.unwrap();

        let user = user_with(&[], &[]);
        let result = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::default())
            .await
            .unwrap();

        assert_eq!(ids(&result.recommendations), vec!["m1", "m3"]);
        assert_eq!(ids(&result.personalized_recommendations), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_personalized_cursor_on_full_page() {
        let store = MemoryStore::new();
        for id in ["m1", "m2", "m3", "m4", "m5"] {
            store.insert_movie(&movie(id, &["Drama"])).await.unwrap();
        }
        let user = user_with(&["Drama"], &[]);

        let first = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::first(2))
            .await
            .unwrap();
        assert_eq!(ids(&first.personalized_recommendations), vec!["m1", "m2"]);
        assert_eq!(first.next_cursor.as_deref(), Some("m2"));

        let second = recommender()
            .recommend(&store, &store, &store, &user, &PageWindow::after(2, "m2"))
            .await
            .unwrap();
        assert_eq!(ids(&second.personalized_recommendations), vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn test_trending_page() {
        let store = MemoryStore::new();
        for i in 0..12 {
            let mut m = movie(&format!("m{:02}", i), &[]);
            m.popularity = Some((i * 7 % 12) as f64 * 10.0);
            store.insert_movie(&m).await.unwrap();
        }

        let window = PageWindow::new(Some("5"), None);
        let page = trending(&store, &window).await.unwrap();

        assert_eq!(page.len(), 5);
        let pops: Vec<f64> = page.iter().filter_map(|m| m.popularity).collect();
        assert_eq!(pops, vec![110.0, 100.0, 90.0, 80.0, 70.0]);
        assert_eq!(window.next_cursor(&page), Some(page[4].id.clone()));
    }

    #[tokio::test]
    async fn test_top_rated_order() {
        let store = MemoryStore::new();
        for (id, rating) in [("a", Some(3.0)), ("b", None), ("c", Some(4.5))] {
            let mut m = movie(id, &[]);
            m.average_rating = rating;
            store.insert_movie(&m).await.unwrap();
        }

        let page = top_rated(&store, &PageWindow::default()).await.unwrap();
        assert_eq!(ids(&page), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_similar_excludes_reference() {
        let store = MemoryStore::new();
        let mut reference = movie("ref", &["Sci-Fi"]);
        reference.popularity = Some(80.0);
        store.insert_movie(&reference).await.unwrap();
        let mut close = movie("close", &["Sci-Fi"]);
        close.popularity = Some(40.0);
        store.insert_movie(&close).await.unwrap();
        let mut band = movie("band", &["Romance"]);
        band.popularity = Some(75.0);
        store.insert_movie(&band).await.unwrap();
        let mut far = movie("far", &["Romance"]);
        far.popularity = Some(10.0);
        store.insert_movie(&far).await.unwrap();

        let page = similar(&store, "ref", &PageWindow::default()).await.unwrap();
        assert_eq!(ids(&page), vec!["band", "close"]);

        let missing = similar(&store, "nope", &PageWindow::default()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut movies = MockMovieStore::new();
        movies
            .expect_find_movies()
            .returning(|_, _, _| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let store = MemoryStore::new();
        let user = user_with(&["Drama"], &["Someone"]);

        let result = recommender()
            .recommend(&movies, &store, &store, &user, &PageWindow::default())
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
