//! HTTP server for the stats endpoints
//!
//! Provides /, /health, /stats/{username}, and /stats/{username}/svg.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use file_stats_cache::StatsCache;
use github_api::GithubClient;

use crate::error::AppError;
use crate::models::{HealthResponse, ProfileStats};
use crate::stats::StatsAggregator;
use crate::svg;

/// Shared state for the HTTP server
pub struct ServerState {
    pub client: GithubClient,
    pub cache: StatsCache,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(client: GithubClient, cache: StatsCache) -> Self {
        Self {
            client,
            cache,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/stats/{username}", get(get_stats))
        .route("/stats/{username}/svg", get(get_stats_svg))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Welcome page
async fn root() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let cache_stats = state.cache.stats().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: cache_stats,
    })
}

/// Aggregated stats for a user as JSON
async fn get_stats(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    if let Some(stats) = state.cache.load_json::<ProfileStats>(&username).await {
        info!(username = %username, "Serving cached stats");
        return Ok(json_response(stats, "HIT"));
    }

    let stats = fetch_and_cache(&state, &username).await?;
    Ok(json_response(stats, "MISS"))
}

/// Rendered stat card for a user
async fn get_stats_svg(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    if let Some(stats) = state.cache.load_json::<ProfileStats>(&username).await {
        if let Some(svg) = state.cache.load_svg(&username).await {
            info!(username = %username, "Serving cached SVG");
            return Ok(svg_response(&state, svg, "HIT"));
        }

        // Fresh JSON record but no rendered card yet
        info!(username = %username, "Rendering SVG from cached stats");
        let svg = svg::render(&stats);
        store_svg_best_effort(&state, &username, &svg).await;
        return Ok(svg_response(&state, svg, "HIT"));
    }

    let stats = fetch_and_cache(&state, &username).await?;
    let svg = svg::render(&stats);
    store_svg_best_effort(&state, &username, &svg).await;
    Ok(svg_response(&state, svg, "MISS"))
}

/// Fetch fresh stats and persist them; serving still succeeds if the write fails
async fn fetch_and_cache(state: &ServerState, username: &str) -> Result<ProfileStats, AppError> {
    info!(username, "Fetching fresh GitHub stats");
    let stats = StatsAggregator::new(&state.client).fetch(username).await?;
    if let Err(e) = state.cache.store_json(username, &stats).await {
        warn!(username, error = %e, "Failed to store stats record");
    }
    Ok(stats)
}

async fn store_svg_best_effort(state: &ServerState, username: &str, svg: &str) {
    if let Err(e) = state.cache.store_svg(username, svg).await {
        warn!(username, error = %e, "Failed to store rendered SVG");
    }
}

fn json_response(stats: ProfileStats, cache_header: &'static str) -> Response {
    ([("X-Cache", cache_header)], Json(stats)).into_response()
}

fn svg_response(state: &ServerState, svg: String, cache_header: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/svg+xml")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache.ttl().as_secs()),
        )
        .header("X-Cache", cache_header)
        .body(Body::from(svg))
        .unwrap()
}

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>GitHub Stats API</title>
    <style>
        body { font-family: 'Segoe UI', Tahoma, sans-serif; line-height: 1.6; margin: 0; padding: 20px; background-color: #f4f7f6; color: #333; }
        .container { max-width: 800px; margin: 30px auto; background: #fff; padding: 30px; border-radius: 8px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
        h1 { color: #2c3e50; text-align: center; }
        h2 { color: #34495e; border-bottom: 1px solid #eee; padding-bottom: 10px; }
        li { background-color: #ecf0f1; margin-bottom: 10px; padding: 12px 15px; border-left: 4px solid #3498db; border-radius: 4px; list-style: none; }
        code { background-color: #e0e0e0; padding: 2px 5px; border-radius: 3px; font-family: 'Consolas', monospace; }
        a { color: #3498db; text-decoration: none; }
    </style>
</head>
<body>
    <div class="container">
        <h1>GitHub Stats API</h1>
        <p>Fetches comprehensive statistics for any public GitHub user and renders them as JSON or as an SVG stat card.</p>

        <h2>Available Endpoints:</h2>
        <ul>
            <li>
                <strong>Get JSON Stats:</strong> <code>/stats/{username}</code>
                <p>Detailed profile statistics in JSON: total stars, commits, contributions, repository counts, PR/issue counts, and contribution streaks (e.g. <a href="/stats/octocat">/stats/octocat</a>).</p>
            </li>
            <li>
                <strong>Get SVG Stats Image:</strong> <code>/stats/{username}/svg</code>
                <p>A stat card suitable for embedding in web pages or READMEs (e.g. <a href="/stats/octocat/svg">/stats/octocat/svg</a>).</p>
            </li>
        </ul>

        <h2>How it Works:</h2>
        <p>Data is fetched from the GitHub REST and GraphQL APIs, aggregated, and cached on disk to reduce API rate limit pressure. Rendered SVGs are cached alongside the JSON.</p>

        <h2>Note:</h2>
        <p>A <code>GITHUB_TOKEN</code> environment variable is required; without it requests would fail due to GitHub API rate limits or authentication requirements.</p>
    </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::models::sample_stats;

    async fn create_test_state(dir: &std::path::Path) -> SharedState {
        let client = GithubClient::new("ghp_test").unwrap();
        let cache = StatsCache::new(dir.to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();
        Arc::new(ServerState::new(client, cache))
    }

    #[tokio::test]
    async fn test_root_serves_welcome_page() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(dir.path()).await);

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("GitHub Stats API"));
        assert!(html.contains("/stats/{username}"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempdir().unwrap();
        let router = create_router(create_test_state(dir.path()).await);

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert!(json["cache"]["entries"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_stats_served_from_cache() {
        let dir = tempdir().unwrap();
        let state = create_test_state(dir.path()).await;
        state
            .cache
            .store_json("octocat", &sample_stats())
            .await
            .unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/stats/octocat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("X-Cache").unwrap(), "HIT");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let stats: ProfileStats = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats, sample_stats());
    }

    #[tokio::test]
    async fn test_svg_rendered_from_cached_stats() {
        let dir = tempdir().unwrap();
        let state = create_test_state(dir.path()).await;
        state
            .cache
            .store_json("octocat", &sample_stats())
            .await
            .unwrap();
        let router = create_router(state.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/stats/octocat/svg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        assert_eq!(response.headers().get("X-Cache").unwrap(), "HIT");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let svg = String::from_utf8(body.to_vec()).unwrap();
        assert!(svg.contains("OCTOCAT'S GITHUB STATS"));

        // The render was persisted for the next request
        assert!(state.cache.load_svg("octocat").await.is_some());
    }

    #[tokio::test]
    async fn test_cached_svg_file_is_served_verbatim() {
        let dir = tempdir().unwrap();
        let state = create_test_state(dir.path()).await;
        state
            .cache
            .store_json("octocat", &sample_stats())
            .await
            .unwrap();
        state
            .cache
            .store_svg("octocat", "<svg>sentinel</svg>")
            .await
            .unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/stats/octocat/svg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<svg>sentinel</svg>");
    }

    #[test]
    fn test_server_state_new() {
        let client = GithubClient::new("ghp_test").unwrap();
        let cache = StatsCache::new(std::path::PathBuf::from("/tmp/x"), Duration::from_secs(1));
        let state = ServerState::new(client, cache);

        let diff = (Utc::now() - state.started_at).num_seconds();
        assert!((0..5).contains(&diff));
    }
}
