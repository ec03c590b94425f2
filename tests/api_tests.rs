use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use reelboard::{
    config::Config,
    db::{MemoryStore, UserStore},
    error::AppResult,
    models::User,
    routes::{create_router, AppState},
    services::{notifier::Message, Notifier},
};

/// Collects share messages instead of sending them
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Message>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: Message) -> AppResult<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

struct TestApp {
    server: TestServer,
    store: MemoryStore,
    state: AppState,
    notifier: Arc<RecordingNotifier>,
}

fn create_test_app() -> TestApp {
    let config = Config {
        bcrypt_cost: 4,
        jwt_secret: "test-secret".to_string(),
        ..Config::default()
    };
    let store = MemoryStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(config, Arc::new(store.clone())).with_notifier(notifier.clone());
    let server = TestServer::new(create_router(state.clone())).unwrap();
    TestApp {
        server,
        store,
        state,
        notifier,
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

impl TestApp {
    async fn admin_token(&self) -> String {
        let mut admin = User::new("Admin", "admin@example.com", "admin", "unused");
        admin.is_admin = true;
        self.store.create_user(&admin).await.unwrap();
        self.state.tokens.issue(&admin).unwrap()
    }

    /// Registers and logs in a user, returning (token, user id)
    async fn sign_up(&self, username: &str) -> (String, String) {
        let response = self
            .server
            .post("/api/users/register")
            .json(&json!({
                "name": username,
                "email": format!("{}@example.com", username),
                "username": username,
                "password": "secret1!",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let login: Value = self
            .server
            .post("/api/users/login")
            .json(&json!({ "emailOrUsername": username, "password": "secret1!" }))
            .await
            .json();
        (
            login["token"].as_str().unwrap().to_string(),
            login["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    async fn get(&self, path: &str, token: &str) -> TestResponse {
        self.server.get(path).add_header(AUTHORIZATION, bearer(token)).await
    }

    async fn post(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.server
            .post(path)
            .add_header(AUTHORIZATION, bearer(token))
            .json(&body)
            .await
    }

    async fn put(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.server
            .put(path)
            .add_header(AUTHORIZATION, bearer(token))
            .json(&body)
            .await
    }

    async fn add_movie(&self, admin: &str, movie: Value) -> String {
        let response = self.post("/api/movies", admin, movie).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["movie"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_banner_and_unknown_route() {
    let app = create_test_app();
    app.server.get("/").await.assert_status_ok();

    let response = app.server.get("/api/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app();
    let id = "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b";
    let response = app
        .server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = create_test_app();
    let (token, user_id) = app.sign_up("ada").await;

    let response = app.get("/api/users/profile", &token).await;
    response.assert_status_ok();
    let profile: Value = response.json();
    assert_eq!(profile["id"], user_id.as_str());
    assert_eq!(profile["username"], "ada");
    assert!(profile.get("passwordHash").is_none());

    let duplicate = app
        .server
        .post("/api/users/register")
        .json(&json!({
            "name": "Other",
            "email": "ada@example.com",
            "username": "other",
            "password": "secret1!",
        }))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_test_app();

    let weak = app
        .server
        .post("/api/users/register")
        .json(&json!({
            "name": "Bob",
            "email": "bob@example.com",
            "username": "bob",
            "password": "password",
        }))
        .await;
    weak.assert_status(StatusCode::BAD_REQUEST);

    let missing = app
        .server
        .post("/api/users/register")
        .json(&json!({ "name": "Bob" }))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing.json::<Value>()["error"], "All fields are required");
}

#[tokio::test]
async fn test_login_failures() {
    let app = create_test_app();
    app.sign_up("carol").await;

    let wrong = app
        .server
        .post("/api/users/login")
        .json(&json!({ "emailOrUsername": "carol@example.com", "password": "wrong1!x" }))
        .await;
    wrong.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(wrong.json::<Value>()["error"], "Invalid credentials");

    let unknown = app
        .server
        .post("/api/users/login")
        .json(&json!({ "emailOrUsername": "nobody", "password": "secret1!" }))
        .await;
    unknown.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authentication_and_admin_gate() {
    let app = create_test_app();

    app.server
        .get("/api/users/profile")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.get("/api/users/profile", "not-a-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (token, _) = app.sign_up("dave").await;
    let response = app.get("/api/movies", &token).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "Access denied. Admins only.");
}

#[tokio::test]
async fn test_movie_admin_crud() {
    let app = create_test_app();
    let admin = app.admin_token().await;

    let id = app
        .add_movie(&admin, json!({ "title": "Heat", "genre": ["Crime"] }))
        .await;
    app.post("/api/movies", &admin, json!({ "title": "Heat" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let (user, _) = app.sign_up("erin").await;
    let movie: Value = app.get(&format!("/api/movies/{}", id), &user).await.json();
    assert_eq!(movie["title"], "Heat");

    app.put(
        &format!("/api/movies/{}", id),
        &admin,
        json!({ "title": "Heat (1995)", "genre": ["Crime", "Thriller"] }),
    )
    .await
    .assert_status_ok();

    app.server
        .delete(&format!("/api/movies/{}", id))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await
        .assert_status_ok();
    app.get(&format!("/api/movies/{}", id), &user)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trending_pagination() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    for i in 0..12 {
        app.add_movie(
            &admin,
            json!({ "title": format!("Movie {}", i), "popularity": (i * 5) as f64 }),
        )
        .await;
    }

    let response = app.server.get("/api/recommendations/trending?limit=5").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let movies = body["trendingMovies"].as_array().unwrap();

    assert_eq!(movies.len(), 5);
    let popularity: Vec<f64> = movies
        .iter()
        .map(|m| m["popularity"].as_f64().unwrap())
        .collect();
    assert_eq!(popularity, vec![55.0, 50.0, 45.0, 40.0, 35.0]);
    assert_eq!(body["nextCursor"], movies[4]["id"]);

    let fallback: Value = app
        .server
        .get("/api/recommendations/trending?limit=abc")
        .await
        .json();
    assert_eq!(fallback["trendingMovies"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_identity_pages_visit_every_movie_once() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let mut created = Vec::new();
    for i in 0..7 {
        created.push(app.add_movie(&admin, json!({ "title": format!("M{}", i) })).await);
    }

    let mut seen = Vec::new();
    let mut path = "/api/movies?limit=3".to_string();
    loop {
        let page: Value = app.get(&path, &admin).await.json();
        for movie in page["data"].as_array().unwrap() {
            seen.push(movie["id"].as_str().unwrap().to_string());
        }
        match page["nextCursor"].as_str() {
            Some(cursor) => path = format!("/api/movies?limit=3&cursor={}", cursor),
            None => break,
        }
    }

    assert_eq!(seen, created);
}

#[tokio::test]
async fn test_personalized_recommendations_skip_rated() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let a = app.add_movie(&admin, json!({ "title": "A", "genre": ["Horror"] })).await;
    let b = app.add_movie(&admin, json!({ "title": "B", "genre": ["Horror"] })).await;
    app.add_movie(&admin, json!({ "title": "C", "genre": ["Comedy"] })).await;

    let (token, _) = app.sign_up("frank").await;
    app.post(
        "/api/users/create-profile",
        &token,
        json!({ "preferences": { "genres": ["Horror"], "actors": [] } }),
    )
    .await
    .assert_status_ok();
    app.post("/api/rating-reviews", &token, json!({ "movieId": a, "rating": 4 }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.get("/api/recommendations", &token).await;
    response.assert_status_ok();
    let body: Value = response.json();

    let personalized: Vec<&str> = body["personalizedRecommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(personalized, vec![b.as_str()]);
    assert!(body["nextCursor"].is_null());
}

#[tokio::test]
async fn test_similar_titles() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let reference = app
        .add_movie(&admin, json!({ "title": "Alien", "genre": ["Sci-Fi"], "popularity": 80.0 }))
        .await;
    app.add_movie(&admin, json!({ "title": "Aliens", "genre": ["Sci-Fi"], "popularity": 70.0 }))
        .await;
    app.add_movie(&admin, json!({ "title": "Amelie", "genre": ["Romance"], "popularity": 5.0 }))
        .await;

    let body: Value = app
        .server
        .get(&format!("/api/recommendations/similar/{}", reference))
        .await
        .json();
    let titles: Vec<&str> = body["similarMovies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Aliens"]);

    app.server
        .get("/api/recommendations/similar/missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_likes_comments_and_highlights() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let movie = app.add_movie(&admin, json!({ "title": "Up" })).await;
    let (author, _) = app.sign_up("gina").await;
    let (fan, _) = app.sign_up("hank").await;

    app.post("/api/rating-reviews", &author, json!({ "movieId": movie, "rating": 9 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.post("/api/rating-reviews", &author, json!({ "movieId": "missing", "rating": 3 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let created: Value = app
        .post(
            "/api/rating-reviews",
            &author,
            json!({ "movieId": movie, "rating": 5, "review": "Lovely" }),
        )
        .await
        .json();
    let review_id = created["ratingReview"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["movie"]["title"], "Up");

    app.post("/api/rating-reviews", &author, json!({ "movieId": movie, "rating": 4 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let liked: Value = app
        .post("/api/likes", &fan, json!({ "reviewId": review_id }))
        .await
        .json();
    assert_eq!(liked["likeCount"], 1);
    app.post("/api/likes", &fan, json!({ "reviewId": review_id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let commented: Value = app
        .post("/api/comments", &fan, json!({ "reviewId": review_id, "comment": "Agreed" }))
        .await
        .json();
    assert_eq!(commented["commentCount"], 1);

    let listed: Value = app
        .get(&format!("/api/rating-reviews?movieId={}", movie), &fan)
        .await
        .json();
    assert_eq!(listed["data"][0]["username"], "gina");
    assert_eq!(listed["data"][0]["movieTitle"], "Up");

    let highlights: Value = app.get("/api/rating-reviews/highlights", &fan).await.json();
    let first = &highlights["reviewHighlights"][0];
    assert_eq!(first["id"], review_id.as_str());
    assert_eq!(first["likeCount"], 1);
    assert_eq!(first["commentCount"], 1);
}

#[tokio::test]
async fn test_custom_list_ownership_and_share() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let movie = app.add_movie(&admin, json!({ "title": "Rififi" })).await;
    let (owner, _) = app.sign_up("ivan").await;
    let (other, _) = app.sign_up("jill").await;

    let created: Value = app
        .post("/api/custom-lists", &owner, json!({ "name": "Heists" }))
        .await
        .json();
    let list_id = created["data"]["id"].as_str().unwrap().to_string();
    assert!(created["data"]["shareableLink"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/custom-lists/{}", list_id)));

    app.put(
        "/api/custom-lists/add-movie",
        &other,
        json!({ "listId": list_id, "movieId": movie }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);
    app.put(
        "/api/custom-lists/add-movie",
        &owner,
        json!({ "listId": list_id, "movieId": movie }),
    )
    .await
    .assert_status_ok();

    app.put("/api/custom-lists/follow", &other, json!({ "listId": list_id }))
        .await
        .assert_status_ok();
    app.put("/api/custom-lists/follow", &other, json!({ "listId": list_id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let public = app.server.get(&format!("/api/custom-lists/{}", list_id)).await;
    public.assert_status_ok();
    assert_eq!(public.json::<Value>()["movies"][0], movie.as_str());

    let shared: Value = app
        .post(
            &format!("/api/custom-lists/share/{}", list_id),
            &other,
            json!({ "email": "friend@example.com", "sms": "+15550100" }),
        )
        .await
        .json();
    assert_eq!(shared["sent"], 2);
    let sent = app.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].body.contains("Rififi"));
}

#[tokio::test]
async fn test_private_list_cannot_be_shared() {
    let app = create_test_app();
    let (owner, _) = app.sign_up("kim").await;
    let created: Value = app
        .post("/api/custom-lists", &owner, json!({ "name": "Secret", "isPublic": false }))
        .await
        .json();
    let list_id = created["data"]["id"].as_str().unwrap();
    assert!(created["data"]["shareableLink"].is_null());

    app.post(
        &format!("/api/custom-lists/share/{}", list_id),
        &owner,
        json!({ "email": "friend@example.com" }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_boards_and_posts() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let (member, _) = app.sign_up("lena").await;

    app.post("/api/discussion-boards", &member, json!({ "title": "T", "description": "D" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let board: Value = app
        .post(
            "/api/discussion-boards",
            &admin,
            json!({ "title": "Westerns", "description": "Dust and horses" }),
        )
        .await
        .json();
    let board_id = board["data"]["id"].as_str().unwrap().to_string();

    app.post(
        "/api/posts",
        &member,
        json!({ "content": "Hello", "discussionBoardId": board_id }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    app.post(&format!("/api/discussion-boards/{}/join", board_id), &member, json!({}))
        .await
        .assert_status_ok();
    app.post(&format!("/api/discussion-boards/{}/join", board_id), &member, json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let post: Value = app
        .post(
            "/api/posts",
            &member,
            json!({ "content": "Hello", "discussionBoardId": board_id }),
        )
        .await
        .json();
    let post_id = post["data"]["id"].as_str().unwrap().to_string();

    app.put(&format!("/api/posts/{}", post_id), &admin, json!({ "content": "Hijack" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let posts: Value = app
        .get(&format!("/api/posts/discussion-board/{}", board_id), &member)
        .await
        .json();
    assert_eq!(posts["data"][0]["content"], "Hello");
    assert!(posts["nextCursor"].is_null());
}

#[tokio::test]
async fn test_trailers() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let trailer = json!({
        "trailerName": "Teaser #1",
        "trailerUrl": "https://video.example/t1",
        "trailerType": "Teaser",
        "releaseDate": "2024-01-10",
        "duration": 90,
        "description": "First look",
    });

    let created = app.post("/api/trailers", &admin, trailer.clone()).await;
    created.assert_status(StatusCode::CREATED);
    app.post("/api/trailers", &admin, trailer)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let listed: Value = app.server.get("/api/trailers").await.json();
    assert_eq!(listed["data"][0]["trailerType"], "Teaser");

    let trailer_id = created.json::<Value>()["data"]["id"].as_str().unwrap().to_string();
    let shared: Value = app
        .server
        .post("/api/trailers/share")
        .json(&json!({ "trailerId": trailer_id, "whatsapp": "+15550101" }))
        .await
        .json();
    assert_eq!(shared["sent"], 1);
}

#[tokio::test]
async fn test_admin_stats() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    app.add_movie(&admin, json!({ "title": "A", "genre": ["Drama", "Crime"], "releaseYear": 1994 }))
        .await;
    app.add_movie(&admin, json!({ "title": "B", "genre": ["Drama"], "releaseYear": 2001 }))
        .await;
    app.add_movie(&admin, json!({ "title": "C", "genre": ["Action"], "releaseYear": 1985 }))
        .await;

    let genres: Value = app
        .get("/api/admin-stats/trending-genres?limit=2", &admin)
        .await
        .json();
    assert_eq!(genres["data"][0], json!({ "name": "Drama", "count": 2 }));
    assert_eq!(genres["data"][1]["name"], "Action");
    assert_eq!(genres["nextCursor"], "Action");

    let by_year: Value = app
        .get("/api/admin-stats/movies-by-year?startYear=1990&endYear=2010", &admin)
        .await
        .json();
    let titles: Vec<&str> = by_year["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "B"]);

    app.get("/api/admin-stats/movies-by-year?startYear=1990", &admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.get("/api/admin-stats/top-rated-movies", &admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wishlist() {
    let app = create_test_app();
    let (token, _) = app.sign_up("mona").await;

    app.post("/api/users/wishlist", &token, json!({ "movieId": "m1" }))
        .await
        .assert_status_ok();
    app.post("/api/users/wishlist", &token, json!({ "movieId": "m1" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.post(
        "/api/users/wishlist/update",
        &token,
        json!({ "movieId": "m2", "action": "add" }),
    )
    .await
    .assert_status_ok();
    app.post("/api/users/wishlist/remove", &token, json!({ "movieId": "m1" }))
        .await
        .assert_status_ok();

    let body: Value = app.get("/api/users/wishlist", &token).await.json();
    assert_eq!(body["wishlist"], json!(["m2"]));
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let movie = app.add_movie(&admin, json!({ "title": "Ran" })).await;
    let (token, _) = app.sign_up("ivan").await;

    let wrong_type = app
        .post("/api/rating-reviews", &token, json!({ "movieId": movie, "rating": "five" }))
        .await;
    wrong_type.assert_status(StatusCode::BAD_REQUEST);
    assert!(wrong_type.json::<Value>()["error"].is_string());

    let broken = app
        .server
        .post("/api/users/register")
        .bytes(axum::body::Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    broken.assert_status(StatusCode::BAD_REQUEST);
    assert!(broken.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_extended_movie_details_are_stored() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let id = app
        .add_movie(
            &admin,
            json!({
                "title": "Alien",
                "originalTitle": "Alien",
                "composer": "Jerry Goldsmith",
                "tags": ["space"],
                "awardsAndNominations": [{ "award": "Academy Award", "result": "Won", "year": 1980 }],
                "sequels": [{ "title": "Aliens", "releaseYear": 1986 }]
            }),
        )
        .await;

    let movie: Value = app.get(&format!("/api/movies/{}", id), &admin).await.json();
    assert_eq!(movie["composer"], "Jerry Goldsmith");
    assert_eq!(movie["tags"], json!(["space"]));
    assert_eq!(movie["awardsAndNominations"][0]["year"], 1980);
    assert_eq!(movie["sequels"][0]["releaseYear"], 1986);
}

#[tokio::test]
async fn test_box_office_awards() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let id = app
        .add_movie(
            &admin,
            json!({
                "title": "Jaws",
                "director": { "name": "Steven Spielberg", "photos": ["https://img.example/s.jpg"] },
                "boxOffice": { "budget": 9000000.0 }
            }),
        )
        .await;
    let (token, _) = app.sign_up("jane").await;

    app.server
        .get("/api/box-office-awards")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let page: Value = app.get("/api/box-office-awards", &token).await.json();
    assert_eq!(page["data"][0]["title"], "Jaws");
    assert_eq!(page["data"][0]["boxOffice"]["budget"], 9000000.0);
    assert!(page["data"][0]["director"].get("photos").is_none());

    let missing = app
        .put("/api/box-office-awards", &token, json!({ "movieId": id, "boxOffice": {} }))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing.json::<Value>()["error"], "Missing required fields");

    app.put(
        "/api/box-office-awards",
        &token,
        json!({ "movieId": "missing", "boxOffice": {}, "awardsAndNominations": [] }),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    let updated = app
        .put(
            "/api/box-office-awards",
            &token,
            json!({
                "movieId": id,
                "boxOffice": { "worldwideGross": 470653000.0 },
                "awardsAndNominations": [{ "award": "Academy Award", "category": "Best Score" }]
            }),
        )
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["message"], "Box Office and Awards updated successfully");
    assert_eq!(body["data"]["director"]["name"], "Steven Spielberg");

    let movie: Value = app.get(&format!("/api/movies/{}", id), &token).await.json();
    assert_eq!(movie["boxOffice"]["worldwideGross"], 470653000.0);
    assert_eq!(movie["awardsAndNominations"][0]["category"], "Best Score");
}

#[tokio::test]
async fn test_news_and_updates() {
    let app = create_test_app();
    let admin = app.admin_token().await;
    let first = app.add_movie(&admin, json!({ "title": "Alien" })).await;
    app.add_movie(&admin, json!({ "title": "Aliens" })).await;
    let (token, _) = app.sign_up("kate").await;

    let page: Value = app.get("/api/news-and-updates?limit=1", &token).await.json();
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["id"], first.as_str());
    let cursor = page["nextCursor"].as_str().unwrap().to_string();

    let rest: Value = app
        .get(&format!("/api/news-and-updates?cursor={}", cursor), &token)
        .await
        .json();
    assert_eq!(rest["data"][0]["title"], "Aliens");
    assert!(rest["nextCursor"].is_null());

    app.put("/api/news-and-updates", &token, json!({ "movieId": first }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let updated = app
        .put(
            "/api/news-and-updates",
            &token,
            json!({
                "movieId": first,
                "newsAndArticles": [{ "title": "4K restoration", "date": "2024-04-26" }],
                "sequels": [{ "title": "Aliens", "releaseYear": 1986 }]
            }),
        )
        .await;
    updated.assert_status_ok();
    assert_eq!(
        updated.json::<Value>()["message"],
        "News, Updates, Sequels, and Cast updated successfully"
    );

    let page: Value = app.get("/api/news-and-updates", &token).await.json();
    assert_eq!(page["data"][0]["newsAndArticles"][0]["title"], "4K restoration");
    assert_eq!(page["data"][0]["sequels"][0]["title"], "Aliens");
}
