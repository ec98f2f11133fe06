use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub github_token: String,
}

impl Config {
    /// Parse configuration from environment variables
    ///
    /// GITHUB_TOKEN is required; everything else has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let cache_dir = env::var("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./cache"));

        let cache_ttl_hours = env::var("CACHE_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(12);

        let github_token = env::var("GITHUB_TOKEN").map_err(|_| {
            AppError::Config(
                "GitHub token not configured. Please set GITHUB_TOKEN environment variable."
                    .to_string(),
            )
        })?;

        Ok(Self {
            port,
            cache_dir,
            cache_ttl: Duration::from_secs(cache_ttl_hours * 60 * 60),
            github_token,
        })
    }
}
