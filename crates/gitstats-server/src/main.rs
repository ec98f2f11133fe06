//! GitHub Stats API - profile statistics service
//!
//! Fetches a GitHub user's statistics (stars, commits, contributions,
//! streaks, language breakdown) via the GitHub REST and GraphQL APIs,
//! caches the aggregated result on disk, and serves it as JSON or as an
//! SVG stat card.

mod config;
mod error;
mod languages;
mod models;
mod server;
mod stats;
mod streak;
mod svg;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use file_stats_cache::StatsCache;
use github_api::GithubClient;

use crate::config::Config;
use crate::error::AppError;
use crate::server::{start_server, ServerState, SharedState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(
        "gitstats_server=info"
            .parse()
            .map_err(|e| AppError::Config(format!("Bad log directive: {e}")))?,
    );

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting GitHub Stats API...");

    let config = Config::from_env()?;
    info!("Port: {}", config.port);
    info!("Cache dir: {:?}", config.cache_dir);
    info!("Cache TTL: {} seconds", config.cache_ttl.as_secs());

    let client = GithubClient::new(&config.github_token)?;
    let cache = StatsCache::new(config.cache_dir, config.cache_ttl);
    cache.init().await?;

    let state: SharedState = Arc::new(ServerState::new(client, cache));

    // Start HTTP server (blocking)
    start_server(state, config.port)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}
