use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use reelhouse::app::{build_router, AppState};
use reelhouse::catalog::{CatalogApi, MockCatalog};
use reelhouse::models::{Genre, MovieDetails, MovieSummary};
use reelhouse::pages::PageContext;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Catalog whose every read fails, counting how often it was asked.
#[derive(Default)]
struct BrokenCatalog {
    calls: AtomicUsize,
}

impl BrokenCatalog {
    fn fail<T>(&self) -> anyhow::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("upstream returned 503"))
    }
}

#[async_trait::async_trait]
impl CatalogApi for BrokenCatalog {
    async fn fetch_popular(&self) -> anyhow::Result<Vec<MovieSummary>> {
        self.fail()
    }
    async fn fetch_top_rated(&self) -> anyhow::Result<Vec<MovieSummary>> {
        self.fail()
    }
    async fn fetch_upcoming(&self) -> anyhow::Result<Vec<MovieSummary>> {
        self.fail()
    }
    async fn fetch_genres(&self) -> anyhow::Result<Vec<Genre>> {
        self.fail()
    }
    async fn fetch_details(&self, _id: i32) -> anyhow::Result<Option<MovieDetails>> {
        self.fail()
    }
    async fn search(&self, _query: &str) -> anyhow::Result<Vec<MovieSummary>> {
        self.fail()
    }
    async fn fetch_by_genre(&self, _genre_id: i32) -> anyhow::Result<Vec<MovieSummary>> {
        self.fail()
    }
}

fn mock_router() -> Router {
    let api: Arc<dyn CatalogApi> = Arc::new(MockCatalog::new());
    build_router(AppState::new(PageContext::new(api)))
}

fn broken_router(api: Arc<BrokenCatalog>) -> Router {
    build_router(AppState::new(PageContext::new(api)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(mock_router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn home_renders_three_rows() {
    let (status, body) = get(mock_router(), "/api/home").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["data"]["view"], "home");
    let rows = body["data"]["rows"].as_array().unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Popular Movies", "Top Rated", "Coming Soon"]);
    assert_eq!(body["data"]["featured"]["id"], 1);
}

#[tokio::test]
async fn movie_details_include_trailer_and_watch_link() {
    let (status, body) = get(mock_router(), "/api/movie/4").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["view"], "movie");
    assert_eq!(data["title"], "The Dark Knight");
    assert_eq!(data["runtime"], 120);
    assert_eq!(data["watch_href"], "/watch/4");
    assert_eq!(data["trailer"]["type"], "Trailer");
    assert_eq!(data["genres"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let (status, body) = get(mock_router(), "/api/movie/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Movie not found.");

    let (status, _) = get(mock_router(), "/api/watch/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_and_unknown_paths_are_not_found() {
    let (status, _) = get(mock_router(), "/api/movie/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(mock_router(), "/api/category/westerns").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, _) = get(mock_router(), "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn watch_view_carries_stream_and_player_settings() {
    let (status, body) = get(mock_router(), "/api/watch/2").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["view"], "watch");
    assert_eq!(data["movie"]["id"], 2);
    assert_eq!(data["player"]["hide_delay_ms"], 3000);
    assert!(data["stream_url"].as_str().unwrap().ends_with(".mp4"));
}

#[tokio::test]
async fn genre_category_is_titled_and_sorted() {
    let (status, body) = get(mock_router(), "/api/category/878?sort=title").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["title"], "Movies");
    let titles: Vec<&str> = data["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Inception", "The Matrix"]);

    let (_, body) = get(mock_router(), "/api/category/28").await;
    assert_eq!(body["data"]["title"], "Action Movies");
}

#[tokio::test]
async fn search_distinguishes_no_results_from_failure() {
    let (status, body) = get(mock_router(), "/api/search?q=zzzz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "no_results");
    assert!(body["data"]["movies"].as_array().unwrap().is_empty());

    let (status, body) = get(mock_router(), "/api/search?q=the%20matrix").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "found");
    assert_eq!(body["data"]["movies"][0]["id"], 8);

    let (status, body) = get(mock_router(), "/api/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "empty_query");
}

#[tokio::test]
async fn view_dispatches_browser_paths() {
    let (status, body) = get(mock_router(), "/api/view?path=%2Fcategory%2Ftop_rated").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["view"], "category");
    assert_eq!(body["data"]["title"], "Top Rated Movies");

    let (status, _) = get(mock_router(), "/api/view?path=%2Fsettings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(mock_router(), "/api/view").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failing_catalog_yields_bad_gateway_with_static_message() {
    let api = Arc::new(BrokenCatalog::default());

    let (status, body) = get(broken_router(api.clone()), "/api/home").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        "Failed to fetch movie data. Please try again later."
    );

    let (status, body) = get(broken_router(api.clone()), "/api/movie/1").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        "Failed to load movie details. Please try again later."
    );

    let (status, body) = get(broken_router(api.clone()), "/api/search?q=matrix").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        "Failed to search movies. Please try again later."
    );
    assert!(!body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn provider_loads_once_per_state() {
    let api = Arc::new(BrokenCatalog::default());
    let app = broken_router(api.clone());

    let (status, _) = get(app.clone(), "/api/home").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let after_first = api.calls.load(Ordering::SeqCst);
    assert!(after_first >= 1);

    let (status, _) = get(app, "/api/home").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(api.calls.load(Ordering::SeqCst), after_first);
}
