use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pagination::Identified;

/// A director or cast member
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub name: String,
    pub biography: Option<String>,
    pub filmography: Vec<String>,
    pub awards: Vec<String>,
    pub photos: Vec<String>,
}

impl Person {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Third-party scores
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Ratings {
    #[serde(rename = "IMDb")]
    pub imdb: Option<f64>,
    #[serde(rename = "RottenTomatoes")]
    pub rotten_tomatoes: Option<f64>,
    #[serde(rename = "Metacritic")]
    pub metacritic: Option<f64>,
    #[serde(rename = "AudienceScore")]
    pub audience_score: Option<f64>,
}

impl Ratings {
    /// Sum of the critic scores, missing scores counting as zero
    pub fn engagement_total(&self) -> f64 {
        [self.imdb, self.rotten_tomatoes, self.metacritic]
            .iter()
            .flatten()
            .sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxOffice {
    pub opening_weekend_earnings: Option<f64>,
    pub total_earnings: Option<f64>,
    pub domestic_revenue: Option<f64>,
    pub international_revenue: Option<f64>,
    pub budget: Option<f64>,
    pub worldwide_gross: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentalGuidance {
    pub rating: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<String>,
}

/// News coverage attached to a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Award {
    pub award: String,
    pub category: Option<String>,
    pub result: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RelatedMovie {
    pub title: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub rating: Option<f64>,
    pub synopsis: Option<String>,
}

/// A sequel or prequel reference
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Sequel {
    pub title: String,
    pub release_year: Option<i32>,
    pub synopsis: Option<String>,
}

/// A catalog entry.
///
/// Every field except `title` is optional on input; the id is always assigned
/// by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub genre: Vec<String>,
    pub director: Option<Person>,
    pub cast: Vec<Person>,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub country_of_origin: Option<String>,
    pub language: Option<String>,
    pub runtime: Option<i32>,
    pub synopsis: Option<String>,
    pub average_rating: Option<f64>,
    pub popularity: Option<f64>,
    pub movie_cover_photo: Option<String>,
    pub parental_guidance: Option<ParentalGuidance>,
    pub ratings: Ratings,
    pub keywords: Vec<String>,
    pub streaming_platforms: Vec<String>,
    pub box_office: BoxOffice,
    pub news_and_articles: Vec<Article>,
    pub release_decade: Option<String>,
    pub original_title: Option<String>,
    pub composer: Option<String>,
    pub trivia: Vec<String>,
    pub goofs: Vec<String>,
    pub soundtrack: Vec<String>,
    pub tags: Vec<String>,
    pub awards_and_nominations: Vec<Award>,
    pub related_movies: Vec<RelatedMovie>,
    pub sequels: Vec<Sequel>,
    pub prequels: Vec<Sequel>,
    pub poster_images: Vec<String>,
    pub behind_the_scenes_photos: Vec<String>,
    pub filming_locations: Vec<String>,
    pub filmmaking_techniques: Vec<String>,
}

impl Identified for Movie {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Movie {
    pub fn director_name(&self) -> Option<&str> {
        self.director.as_ref().map(|d| d.name.as_str())
    }

    pub fn has_genre_in(&self, genres: &[String]) -> bool {
        self.genre.iter().any(|g| genres.contains(g))
    }

    pub fn has_actor_in(&self, actors: &[String]) -> bool {
        self.cast.iter().any(|p| actors.contains(&p.name))
    }

    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            synopsis: self.synopsis.clone(),
            average_rating: self.average_rating,
            movie_cover_photo: self.movie_cover_photo.clone(),
        }
    }
}

/// Short movie description embedded in review responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub synopsis: Option<String>,
    pub average_rating: Option<f64>,
    pub movie_cover_photo: Option<String>,
}

/// Credit line for a director or cast member, without photos or filmography
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Credit {
    pub name: String,
    pub biography: Option<String>,
    pub awards: Vec<String>,
}

impl From<&Person> for Credit {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            biography: person.biography.clone(),
            awards: person.awards.clone(),
        }
    }
}

/// Earnings and awards view of a movie
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeAwards {
    pub id: String,
    pub title: String,
    pub genre: Vec<String>,
    pub director: Option<Credit>,
    pub cast: Vec<Credit>,
    pub box_office: BoxOffice,
    pub awards_and_nominations: Vec<Award>,
}

impl From<Movie> for BoxOfficeAwards {
    fn from(movie: Movie) -> Self {
        Self {
            director: movie.director.as_ref().map(Credit::from),
            cast: movie.cast.iter().map(Credit::from).collect(),
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
            box_office: movie.box_office,
            awards_and_nominations: movie.awards_and_nominations,
        }
    }
}

impl Identified for BoxOfficeAwards {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Press coverage and follow-ups view of a movie
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsAndUpdates {
    pub id: String,
    pub title: String,
    pub genre: Vec<String>,
    pub news_and_articles: Vec<Article>,
    pub cast: Vec<Credit>,
    pub sequels: Vec<Sequel>,
}

impl From<Movie> for NewsAndUpdates {
    fn from(movie: Movie) -> Self {
        Self {
            cast: movie.cast.iter().map(Credit::from).collect(),
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
            news_and_articles: movie.news_and_articles,
            sequels: movie.sequels,
        }
    }
}

impl Identified for NewsAndUpdates {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_movie_deserializes() {
        let movie: Movie = serde_json::from_value(json!({ "title": "Heat" })).unwrap();
        assert_eq!(movie.title, "Heat");
        assert!(movie.id.is_empty());
        assert!(movie.genre.is_empty());
        assert_eq!(movie.popularity, None);
    }

    #[test]
    fn test_camel_case_fields() {
        let movie: Movie = serde_json::from_value(json!({
            "title": "Inception",
            "averageRating": 4.6,
            "releaseYear": 2010,
            "cast": [{ "name": "Leonardo DiCaprio" }],
            "ratings": { "IMDb": 8.5, "Metacritic": 74 },
            "boxOffice": { "worldwideGross": 836800000.0 }
        }))
        .unwrap();

        assert_eq!(movie.average_rating, Some(4.6));
        assert_eq!(movie.release_year, Some(2010));
        assert_eq!(movie.cast[0].name, "Leonardo DiCaprio");
        assert_eq!(movie.ratings.engagement_total(), 82.5);
        assert_eq!(movie.box_office.worldwide_gross, Some(836800000.0));
    }

    #[test]
    fn test_genre_and_actor_membership() {
        let movie = Movie {
            genre: vec!["Horror".into(), "Thriller".into()],
            cast: vec![Person::named("Toni Collette")],
            ..Default::default()
        };

        assert!(movie.has_genre_in(&["Thriller".to_string()]));
        assert!(!movie.has_genre_in(&["Comedy".to_string()]));
        assert!(movie.has_actor_in(&["Toni Collette".to_string()]));
        assert!(!movie.has_actor_in(&[]));
    }

    #[test]
    fn test_extended_details_round_trip() {
        let input = json!({
            "title": "Alien",
            "originalTitle": "Alien",
            "releaseDecade": "1970s",
            "composer": "Jerry Goldsmith",
            "trivia": ["The alien was designed by H. R. Giger"],
            "goofs": ["Visible wires"],
            "soundtrack": ["Main Title"],
            "tags": ["space", "horror"],
            "awardsAndNominations": [
                { "award": "Academy Award", "category": "Best Visual Effects", "result": "Won", "year": 1980 }
            ],
            "relatedMovies": [{ "title": "Aliens", "year": 1986, "rating": 8.4 }],
            "sequels": [{ "title": "Aliens", "releaseYear": 1986 }],
            "prequels": [{ "title": "Prometheus", "releaseYear": 2012 }],
            "posterImages": ["https://img.example/alien.jpg"],
            "behindTheScenesPhotos": ["https://img.example/set.jpg"],
            "filmingLocations": ["Shepperton Studios"],
            "filmmakingTechniques": ["Practical effects"]
        });

        let movie: Movie = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(movie.composer.as_deref(), Some("Jerry Goldsmith"));
        assert_eq!(movie.awards_and_nominations[0].year, Some(1980));
        assert_eq!(movie.sequels[0].release_year, Some(1986));
        assert_eq!(movie.related_movies[0].rating, Some(8.4));

        let output = serde_json::to_value(&movie).unwrap();
        for (key, value) in input.as_object().unwrap() {
            if value.is_string() {
                assert_eq!(&output[key], value, "{key}");
            }
        }
        assert_eq!(output["tags"], json!(["space", "horror"]));
        assert_eq!(output["awardsAndNominations"][0]["category"], "Best Visual Effects");
        assert_eq!(output["prequels"][0]["releaseYear"], 2012);
        assert_eq!(serde_json::from_value::<Movie>(output).unwrap(), movie);
    }

    #[test]
    fn test_projections_drop_photos_and_filmography() {
        let mut director = Person::named("Ridley Scott");
        director.photos = vec!["https://img.example/rs.jpg".into()];
        director.awards = vec!["BAFTA".into()];
        let movie = Movie {
            id: "m1".into(),
            title: "Alien".into(),
            director: Some(director),
            cast: vec![Person::named("Sigourney Weaver")],
            sequels: vec![Sequel { title: "Aliens".into(), ..Default::default() }],
            ..Default::default()
        };

        let view = serde_json::to_value(BoxOfficeAwards::from(movie.clone())).unwrap();
        assert_eq!(view["director"], json!({ "name": "Ridley Scott", "biography": null, "awards": ["BAFTA"] }));
        assert!(view.get("sequels").is_none());

        let news = NewsAndUpdates::from(movie);
        assert_eq!(news.id(), "m1");
        assert_eq!(news.cast[0].name, "Sigourney Weaver");
        assert_eq!(news.sequels[0].title, "Aliens");
    }
}
