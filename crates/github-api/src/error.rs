//! Error types for the GitHub API client

use std::fmt;

/// Errors that can occur when interacting with the GitHub API
#[derive(Debug)]
pub enum GithubError {
    /// GITHUB_TOKEN environment variable is not set
    MissingToken,
    /// Token contains characters that cannot form a header value
    InvalidToken,
    /// HTTP request failed
    Http(reqwest::Error),
    /// Failed to parse a JSON response
    Json(serde_json::Error),
    /// Token was rejected (HTTP 401)
    Unauthorized,
    /// Resource does not exist (HTTP 404, or a null GraphQL user)
    NotFound(String),
    /// Rate limit exhausted (HTTP 403 with x-ratelimit-remaining: 0)
    RateLimited { reset_at: String },
    /// GraphQL response carried errors
    GraphQl(String),
    /// Any other non-success HTTP status
    Api { status: u16, message: String },
}

impl fmt::Display for GithubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "GITHUB_TOKEN environment variable is not set"),
            Self::InvalidToken => write!(f, "GitHub token is not a valid header value"),
            Self::Http(e) => write!(f, "GitHub HTTP error: {e}"),
            Self::Json(e) => write!(f, "GitHub JSON parse error: {e}"),
            Self::Unauthorized => write!(f, "GitHub authentication failed: invalid or expired token"),
            Self::NotFound(what) => write!(f, "GitHub resource not found: {what}"),
            Self::RateLimited { reset_at } => {
                write!(f, "GitHub rate limit exceeded, resets at {reset_at}")
            }
            Self::GraphQl(msg) => write!(f, "GitHub GraphQL error: {msg}"),
            Self::Api { status, message } => {
                write!(f, "GitHub API error: HTTP {status}: {message}")
            }
        }
    }
}

impl std::error::Error for GithubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GithubError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for GithubError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Result type for GitHub API operations
pub type Result<T> = std::result::Result<T, GithubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = GithubError::NotFound("user nosuchuser".to_string());
        assert_eq!(
            format!("{}", err),
            "GitHub resource not found: user nosuchuser"
        );
    }

    #[test]
    fn test_rate_limited_display() {
        let err = GithubError::RateLimited {
            reset_at: "12:34:56".to_string(),
        };
        assert!(format!("{}", err).contains("resets at 12:34:56"));
    }

    #[test]
    fn test_api_error_display() {
        let err = GithubError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(format!("{}", err), "GitHub API error: HTTP 502: bad gateway");
    }

    #[test]
    fn test_missing_token_display() {
        let err = GithubError::MissingToken;
        assert!(format!("{}", err).contains("GITHUB_TOKEN"));
    }
}
