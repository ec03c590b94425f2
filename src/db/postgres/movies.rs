use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgArguments, query::Query, types::Json, Postgres, QueryBuilder};

use crate::{
    db::{
        query::{MovieFilter, MovieSort},
        store::MovieStore,
    },
    error::AppResult,
    models::{
        Article, Award, BoxOffice, CountBucket, DiscussionRow, EngagementRow, Movie, ParentalGuidance,
        Person, Ratings, RelatedMovie, Sequel,
    },
    pagination::PageWindow,
};

use super::{limit_param, PgStore};

const MOVIE_COLUMNS: &str = "id, title, genre, director, cast_members, release_date, release_year, \
     country_of_origin, language, runtime, synopsis, average_rating, popularity, movie_cover_photo, \
     parental_guidance, ratings, keywords, streaming_platforms, box_office, news_and_articles, \
     release_decade, original_title, composer, trivia, goofs, soundtrack, tags, poster_images, \
     behind_the_scenes_photos, filming_locations, filmmaking_techniques, awards_and_nominations, \
     related_movies, sequels, prequels";

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: String,
    title: String,
    genre: Vec<String>,
    director: Option<Json<Person>>,
    cast_members: Json<Vec<Person>>,
    release_date: Option<NaiveDate>,
    release_year: Option<i32>,
    country_of_origin: Option<String>,
    language: Option<String>,
    runtime: Option<i32>,
    synopsis: Option<String>,
    average_rating: Option<f64>,
    popularity: Option<f64>,
    movie_cover_photo: Option<String>,
    parental_guidance: Option<Json<ParentalGuidance>>,
    ratings: Json<Ratings>,
    keywords: Vec<String>,
    streaming_platforms: Vec<String>,
    box_office: Json<BoxOffice>,
    news_and_articles: Json<Vec<Article>>,
    release_decade: Option<String>,
    original_title: Option<String>,
    composer: Option<String>,
    trivia: Vec<String>,
    goofs: Vec<String>,
    soundtrack: Vec<String>,
    tags: Vec<String>,
    poster_images: Vec<String>,
    behind_the_scenes_photos: Vec<String>,
    filming_locations: Vec<String>,
    filmmaking_techniques: Vec<String>,
    awards_and_nominations: Json<Vec<Award>>,
    related_movies: Json<Vec<RelatedMovie>>,
    sequels: Json<Vec<Sequel>>,
    prequels: Json<Vec<Sequel>>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            genre: row.genre,
            director: row.director.map(|Json(d)| d),
            cast: row.cast_members.0,
            release_date: row.release_date,
            release_year: row.release_year,
            country_of_origin: row.country_of_origin,
            language: row.language,
            runtime: row.runtime,
            synopsis: row.synopsis,
            average_rating: row.average_rating,
            popularity: row.popularity,
            movie_cover_photo: row.movie_cover_photo,
            parental_guidance: row.parental_guidance.map(|Json(p)| p),
            ratings: row.ratings.0,
            keywords: row.keywords,
            streaming_platforms: row.streaming_platforms,
            box_office: row.box_office.0,
            news_and_articles: row.news_and_articles.0,
            release_decade: row.release_decade,
            original_title: row.original_title,
            composer: row.composer,
            trivia: row.trivia,
            goofs: row.goofs,
            soundtrack: row.soundtrack,
            tags: row.tags,
            poster_images: row.poster_images,
            behind_the_scenes_photos: row.behind_the_scenes_photos,
            filming_locations: row.filming_locations,
            filmmaking_techniques: row.filmmaking_techniques,
            awards_and_nominations: row.awards_and_nominations.0,
            related_movies: row.related_movies.0,
            sequels: row.sequels.0,
            prequels: row.prequels.0,
        }
    }
}

/// Binds every movie column in `INSERT` order, id first
fn bind_movie<'q>(
    query: Query<'q, Postgres, PgArguments>,
    movie: &'q Movie,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(&movie.id)
        .bind(&movie.title)
        .bind(&movie.genre)
        .bind(movie.director.as_ref().map(Json))
        .bind(Json(&movie.cast))
        .bind(movie.release_date)
        .bind(movie.release_year)
        .bind(&movie.country_of_origin)
        .bind(&movie.language)
        .bind(movie.runtime)
        .bind(&movie.synopsis)
        .bind(movie.average_rating)
        .bind(movie.popularity)
        .bind(&movie.movie_cover_photo)
        .bind(movie.parental_guidance.as_ref().map(Json))
        .bind(Json(&movie.ratings))
        .bind(&movie.keywords)
        .bind(&movie.streaming_platforms)
        .bind(Json(&movie.box_office))
        .bind(movie.box_office.worldwide_gross)
        .bind(movie.box_office.total_earnings)
        .bind(Json(&movie.news_and_articles))
        .bind(&movie.release_decade)
        .bind(&movie.original_title)
        .bind(&movie.composer)
        .bind(&movie.trivia)
        .bind(&movie.goofs)
        .bind(&movie.soundtrack)
        .bind(&movie.tags)
        .bind(&movie.poster_images)
        .bind(&movie.behind_the_scenes_photos)
        .bind(&movie.filming_locations)
        .bind(&movie.filmmaking_techniques)
        .bind(Json(&movie.awards_and_nominations))
        .bind(Json(&movie.related_movies))
        .bind(Json(&movie.sequels))
        .bind(Json(&movie.prequels))
}

/// `position(lower($n) in lower(expr)) > 0`
fn push_contains(qb: &mut QueryBuilder<'_, Postgres>, expr: &str, needle: &str) {
    qb.push("position(lower(")
        .push_bind(needle.to_string())
        .push(") in lower(")
        .push(expr)
        .push(")) > 0");
}

fn push_range<T>(qb: &mut QueryBuilder<'_, Postgres>, column: &str, min: Option<T>, max: Option<T>)
where
    T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
{
    if let Some(min) = min {
        qb.push(" AND ").push(column).push(" >= ").push_bind(min);
    }
    if let Some(max) = max {
        qb.push(" AND ").push(column).push(" <= ").push_bind(max);
    }
}

/// Appends `AND ...` clauses equivalent to [`MovieFilter::matches`]
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &MovieFilter) {
    if let Some(text) = &filter.text {
        qb.push(" AND (");
        push_contains(qb, "title", text);
        qb.push(" OR EXISTS (SELECT 1 FROM unnest(genre) AS g(v) WHERE ");
        push_contains(qb, "g.v", text);
        qb.push(") OR ");
        push_contains(qb, "COALESCE(director->>'name', '')", text);
        qb.push(" OR EXISTS (SELECT 1 FROM jsonb_array_elements(cast_members) AS c(v) WHERE ");
        push_contains(qb, "c.v->>'name'", text);
        qb.push("))");
    }

    if !filter.genres_any.is_empty() {
        qb.push(" AND genre && ").push_bind(filter.genres_any.clone());
    }
    if !filter.actors_any.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM jsonb_array_elements(cast_members) AS c(v) WHERE c.v->>'name' = ANY(",
        )
        .push_bind(filter.actors_any.clone())
        .push("))");
    }
    if let Some(actor) = &filter.actor_like {
        qb.push(" AND EXISTS (SELECT 1 FROM jsonb_array_elements(cast_members) AS c(v) WHERE ");
        push_contains(qb, "c.v->>'name'", actor);
        qb.push(")");
    }
    if let Some(director) = &filter.director {
        qb.push(" AND director->>'name' = ").push_bind(director.clone());
    }
    if !filter.exclude_ids.is_empty() {
        qb.push(" AND NOT (id = ANY(")
            .push_bind(filter.exclude_ids.clone())
            .push("))");
    }

    push_range(qb, "average_rating", filter.rating_min, filter.rating_max);
    push_range(qb, "popularity", filter.popularity_min, filter.popularity_max);
    push_range(qb, "runtime", filter.runtime_min, filter.runtime_max);
    push_range(qb, "release_date", filter.released_from, filter.released_to);
    push_range(qb, "release_year", filter.release_year_min, filter.release_year_max);
    push_range(qb, "total_earnings", filter.box_office_min, filter.box_office_max);

    if !filter.keywords_any.is_empty() {
        qb.push(" AND keywords && ").push_bind(filter.keywords_any.clone());
    }
    if !filter.platforms_any.is_empty() {
        qb.push(" AND streaming_platforms && ")
            .push_bind(filter.platforms_any.clone());
    }

    for (expr, needle) in [
        ("country_of_origin", &filter.country_like),
        ("language", &filter.language_like),
        ("parental_guidance->>'rating'", &filter.parental_rating_like),
    ] {
        if let Some(needle) = needle {
            qb.push(" AND ");
            push_contains(qb, expr, needle);
        }
    }

    if let Some(similar) = &filter.similar_to {
        qb.push(" AND (genre && ").push_bind(similar.genres.clone());
        if let Some(director) = &similar.director {
            qb.push(" OR director->>'name' = ").push_bind(director.clone());
        }
        if let Some(popularity) = similar.popularity {
            qb.push(" OR popularity BETWEEN ")
                .push_bind(popularity - crate::db::query::SIMILAR_POPULARITY_BAND)
                .push(" AND ")
                .push_bind(popularity + crate::db::query::SIMILAR_POPULARITY_BAND);
        }
        qb.push(")");
    }
}

#[async_trait]
impl MovieStore for PgStore {
    async fn insert_movie(&self, movie: &Movie) -> AppResult<()> {
        let query = sqlx::query(
            "INSERT INTO movies (id, title, genre, director, cast_members, release_date, release_year, \
             country_of_origin, language, runtime, synopsis, average_rating, popularity, movie_cover_photo, \
             parental_guidance, ratings, keywords, streaming_platforms, box_office, worldwide_gross, \
             total_earnings, news_and_articles, release_decade, original_title, composer, trivia, goofs, \
             soundtrack, tags, poster_images, behind_the_scenes_photos, filming_locations, \
             filmmaking_techniques, awards_and_nominations, related_movies, sequels, prequels) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, \
             $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33, $34, $35, $36, $37)",
        );
        bind_movie(query, movie).execute(self.pool()).await?;
        Ok(())
    }

    async fn get_movie(&self, id: &str) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {} FROM movies WHERE id = $1",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Movie::from))
    }

    async fn find_movie_by_title(&self, title: &str) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {} FROM movies WHERE title = $1 ORDER BY id LIMIT 1",
            MOVIE_COLUMNS
        ))
        .bind(title)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Movie::from))
    }

    async fn replace_movie(&self, movie: &Movie) -> AppResult<bool> {
        let query = sqlx::query(
            "UPDATE movies SET title = $2, genre = $3, director = $4, cast_members = $5, \
             release_date = $6, release_year = $7, country_of_origin = $8, language = $9, runtime = $10, \
             synopsis = $11, average_rating = $12, popularity = $13, movie_cover_photo = $14, \
             parental_guidance = $15, ratings = $16, keywords = $17, streaming_platforms = $18, \
             box_office = $19, worldwide_gross = $20, total_earnings = $21, news_and_articles = $22, \
             release_decade = $23, original_title = $24, composer = $25, trivia = $26, goofs = $27, \
             soundtrack = $28, tags = $29, poster_images = $30, behind_the_scenes_photos = $31, \
             filming_locations = $32, filmmaking_techniques = $33, awards_and_nominations = $34, \
             related_movies = $35, sequels = $36, prequels = $37 \
             WHERE id = $1",
        );
        let result = bind_movie(query, movie).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_movie(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_movies(
        &self,
        filter: &MovieFilter,
        sort: MovieSort,
        window: &PageWindow,
    ) -> AppResult<Vec<Movie>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM movies WHERE TRUE", MOVIE_COLUMNS));
        push_filter(&mut qb, filter);
        if let Some(cursor) = window.cursor() {
            qb.push(" AND id > ").push_bind(cursor.to_string());
        }
        qb.push(" ORDER BY ").push(sort.order_by());
        qb.push(" LIMIT ").push_bind(limit_param(window.limit()));

        tracing::debug!(sql = qb.sql(), "Movie query");

        let rows = qb
            .build_query_as::<MovieRow>()
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn movies_by_ids(&self, ids: &[String]) -> AppResult<Vec<Movie>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {} FROM movies WHERE id = ANY($1) ORDER BY id",
            MOVIE_COLUMNS
        ))
        .bind(ids)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn genre_counts(&self, window: &PageWindow) -> AppResult<Vec<CountBucket>> {
        let buckets = sqlx::query_as::<_, CountBucket>(
            "SELECT name, count FROM ( \
                 SELECT g COLLATE \"C\" AS name, COUNT(*)::BIGINT AS count \
                 FROM movies, unnest(genre) AS g GROUP BY 1 \
             ) t \
             WHERE ($1::text IS NULL OR name > $1) \
             ORDER BY count DESC, name ASC LIMIT $2",
        )
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(buckets)
    }

    async fn actor_counts(&self, window: &PageWindow) -> AppResult<Vec<CountBucket>> {
        let buckets = sqlx::query_as::<_, CountBucket>(
            "SELECT name, count FROM ( \
                 SELECT (c->>'name') COLLATE \"C\" AS name, COUNT(*)::BIGINT AS count \
                 FROM movies, jsonb_array_elements(cast_members) AS c \
                 WHERE c->>'name' IS NOT NULL GROUP BY 1 \
             ) t \
             WHERE ($1::text IS NULL OR name > $1) \
             ORDER BY count DESC, name ASC LIMIT $2",
        )
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(buckets)
    }

    async fn engagement(&self, window: &PageWindow) -> AppResult<Vec<EngagementRow>> {
        let rows = sqlx::query_as::<_, EngagementRow>(
            "SELECT id, title, \
                 (COALESCE((ratings->>'IMDb')::float8, 0) \
                  + COALESCE((ratings->>'RottenTomatoes')::float8, 0) \
                  + COALESCE((ratings->>'Metacritic')::float8, 0))::float8 AS total_ratings \
             FROM movies \
             WHERE ($1::text IS NULL OR id > $1) \
             ORDER BY total_ratings DESC, id ASC LIMIT $2",
        )
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn most_discussed(&self, window: &PageWindow) -> AppResult<Vec<DiscussionRow>> {
        let rows = sqlx::query_as::<_, DiscussionRow>(
            "SELECT id, title, jsonb_array_length(news_and_articles)::BIGINT AS news_count \
             FROM movies \
             WHERE ($1::text IS NULL OR id > $1) \
             ORDER BY news_count DESC, id ASC LIMIT $2",
        )
        .bind(window.cursor())
        .bind(limit_param(window.limit()))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
