use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use file_stats_cache::CacheError;
use github_api::GithubError;

/// Application error type that converts to HTTP responses
///
/// Upstream GitHub failures propagate with a corresponding status code;
/// internal details stay out of response bodies.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Github(GithubError),
    Cache(CacheError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Github(e) => write!(f, "GitHub error: {e}"),
            Self::Cache(e) => write!(f, "Cache error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Github(e) => Some(e),
            Self::Cache(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<GithubError> for AppError {
    fn from(e: GithubError) -> Self {
        Self::Github(e)
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Github(GithubError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, format!("Not found: {what}"))
            }
            AppError::Github(GithubError::RateLimited { reset_at }) => (
                StatusCode::TOO_MANY_REQUESTS,
                format!("GitHub rate limit exceeded, resets at {reset_at}"),
            ),
            AppError::Github(GithubError::Unauthorized)
            | AppError::Github(GithubError::MissingToken)
            | AppError::Github(GithubError::InvalidToken) => {
                tracing::error!("GitHub rejected the configured token");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GitHub token not configured correctly".into(),
                )
            }
            AppError::Github(e) => {
                tracing::error!(error = %e, "Upstream GitHub API failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to fetch stats from GitHub".into(),
                )
            }
            AppError::Cache(e) => {
                tracing::error!(error = %e, "Cache failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_not_found_maps_to_404() {
        let err = AppError::Github(GithubError::NotFound("user ghost".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let err = AppError::Github(GithubError::RateLimited {
            reset_at: "01:02:03 UTC".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_bad_token_maps_to_500() {
        let err = AppError::Github(GithubError::Unauthorized);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_graphql_failure_maps_to_502() {
        let err = AppError::Github(GithubError::GraphQl("boom".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_config_error_display() {
        let err = AppError::Config("missing GITHUB_TOKEN".into());
        assert_eq!(
            format!("{}", err),
            "Configuration error: missing GITHUB_TOKEN"
        );
    }
}
