//! GitHub API HTTP client
//!
//! Handles authentication, status-to-error mapping (including rate limit
//! detection), and both REST and GraphQL request execution.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{GithubError, Result};
use crate::types::*;

/// Client for the GitHub REST and GraphQL APIs
///
/// The underlying reqwest client is cheap to clone and safe to share behind
/// an `Arc`; all methods take `&self`.
pub struct GithubClient {
    http: reqwest::Client,
}

/// GraphQL response wrapper
#[derive(Debug, serde::Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, serde::Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

impl GithubClient {
    /// Base URL for the REST API
    pub const REST_BASE_URL: &'static str = "https://api.github.com";
    /// URL for the GraphQL endpoint
    pub const GRAPHQL_URL: &'static str = "https://api.github.com/graphql";

    const API_VERSION: &'static str = "2022-11-28";

    /// Create a new client authenticated with the given token
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GithubError::InvalidToken)?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(Self::API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("gitstats"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http })
    }

    /// Create a client from the GITHUB_TOKEN environment variable
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| GithubError::MissingToken)?;
        Self::new(&token)
    }

    /// List one page of a user's public repositories
    pub async fn list_user_repos(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let url = format!(
            "{}/users/{}/repos",
            Self::REST_BASE_URL,
            urlencoding::encode(username)
        );
        let response = self
            .http
            .get(&url)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await?;
        let response = check_response(response).await?;
        decode_json(response).await
    }

    /// Walk the pagination of a user's public repositories until exhausted
    pub async fn all_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list_user_repos(username, page, 100).await?;
            if batch.is_empty() {
                break;
            }
            repos.extend(batch);
            page += 1;
        }
        debug!(username, count = repos.len(), "Listed user repositories");
        Ok(repos)
    }

    /// Language byte counts for a repository
    pub async fn repo_languages(&self, owner: &str, repo: &str) -> Result<HashMap<String, u64>> {
        let url = format!(
            "{}/repos/{}/{}/languages",
            Self::REST_BASE_URL,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        let response = check_response(self.http.get(&url).send().await?).await?;
        decode_json(response).await
    }

    /// Total hits for a `search/issues` query (e.g. `type:pr author:octocat`)
    pub async fn search_count(&self, query: &str) -> Result<u64> {
        let url = format!("{}/search/issues", Self::REST_BASE_URL);
        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("per_page", "1")])
            .send()
            .await?;
        let response = check_response(response).await?;
        let body: SearchCountResponse = decode_json(response).await?;
        Ok(body.total_count)
    }

    /// Execute a GraphQL query
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self.http.post(Self::GRAPHQL_URL).json(&body).send().await?;
        let response = check_response(response).await?;

        let result: GraphQlResponse<T> = decode_json(response).await?;
        if let Some(errors) = result.errors {
            let message = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GithubError::GraphQl(message));
        }
        result
            .data
            .ok_or_else(|| GithubError::GraphQl("no data in response".to_string()))
    }

    /// Account creation date from the user profile
    pub async fn user_created_at(&self, username: &str) -> Result<chrono::DateTime<chrono::Utc>> {
        let query = r#"
            query($username: String!) {
                user(login: $username) {
                    createdAt
                }
            }
        "#;
        let data: UserData<ProfileNode> = self
            .graphql(query, serde_json::json!({ "username": username }))
            .await?;
        let user = require_user(data, username)?;
        Ok(user.created_at)
    }

    /// Owned and contributed-to repository counts
    pub async fn repo_counts(&self, username: &str) -> Result<RepoCounts> {
        let query = r#"
            query($username: String!) {
                user(login: $username) {
                    repositories(first: 1, ownerAffiliations: OWNER) {
                        totalCount
                    }
                    repositoriesContributedTo(contributionTypes: [COMMIT, PULL_REQUEST, ISSUE], first: 1) {
                        totalCount
                    }
                }
            }
        "#;
        let data: UserData<RepoCountsNode> = self
            .graphql(query, serde_json::json!({ "username": username }))
            .await?;
        let user = require_user(data, username)?;
        Ok(RepoCounts {
            owned: user.repositories.total_count,
            contributed: user.repositories_contributed_to.total_count,
        })
    }

    /// Total commit contributions over the default (trailing-year) window
    pub async fn total_commit_contributions(&self, username: &str) -> Result<u64> {
        let query = r#"
            query($username: String!) {
                user(login: $username) {
                    contributionsCollection {
                        totalCommitContributions
                    }
                }
            }
        "#;
        let data: UserData<ContributionsNode> = self
            .graphql(query, serde_json::json!({ "username": username }))
            .await?;
        let user = require_user(data, username)?;
        Ok(user.contributions_collection.total_commit_contributions)
    }

    /// Total contributions between two instants (ISO-8601 `DateTime` strings)
    ///
    /// The GraphQL API caps the range at one year, so callers batch by year.
    pub async fn contributions_between(
        &self,
        username: &str,
        from: &str,
        to: &str,
    ) -> Result<u64> {
        let query = r#"
            query($username: String!, $from: DateTime!, $to: DateTime!) {
                user(login: $username) {
                    contributionsCollection(from: $from, to: $to) {
                        contributionCalendar {
                            totalContributions
                        }
                    }
                }
            }
        "#;
        let data: UserData<ContributionsNode> = self
            .graphql(
                query,
                serde_json::json!({ "username": username, "from": from, "to": to }),
            )
            .await?;
        let user = require_user(data, username)?;
        Ok(user
            .contributions_collection
            .contribution_calendar
            .map(|c| c.total_contributions)
            .unwrap_or(0))
    }

    /// Per-day contribution counts for the trailing year, flattened
    pub async fn contribution_calendar(&self, username: &str) -> Result<Vec<ContributionDay>> {
        let query = r#"
            query($username: String!) {
                user(login: $username) {
                    contributionsCollection {
                        contributionCalendar {
                            weeks {
                                contributionDays {
                                    date
                                    contributionCount
                                }
                            }
                        }
                    }
                }
            }
        "#;
        let data: UserData<ContributionsNode> = self
            .graphql(query, serde_json::json!({ "username": username }))
            .await?;
        let user = require_user(data, username)?;

        let days = user
            .contributions_collection
            .contribution_calendar
            .map(calendar_days)
            .unwrap_or_default();
        Ok(days)
    }
}

/// Flatten the calendar's weeks into days, dropping days whose date does
/// not parse rather than failing the whole calendar
fn calendar_days(calendar: ContributionCalendar) -> Vec<ContributionDay> {
    let mut days = Vec::new();
    for raw in calendar
        .weeks
        .into_iter()
        .flat_map(|week| week.contribution_days)
    {
        match raw.date.parse() {
            Ok(date) => days.push(ContributionDay {
                date,
                count: raw.count,
            }),
            Err(_) => warn!(date = %raw.date, "Skipping calendar day with unparseable date"),
        }
    }
    days
}

/// Read the body and decode it, keeping decode failures distinct from
/// transport errors
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Unwrap the `user` field of a GraphQL response, treating null as not-found
fn require_user<T>(data: UserData<T>, username: &str) -> Result<T> {
    data.user
        .ok_or_else(|| GithubError::NotFound(format!("user {username}")))
}

/// Check response status and convert failures into typed errors
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(GithubError::Unauthorized),
        StatusCode::NOT_FOUND => Err(GithubError::NotFound(response.url().to_string())),
        StatusCode::FORBIDDEN if rate_limit_exhausted(&response) => {
            Err(GithubError::RateLimited {
                reset_at: rate_limit_reset(&response),
            })
        }
        status => Err(GithubError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        }),
    }
}

fn rate_limit_exhausted(response: &Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "0")
        .unwrap_or(false)
}

fn rate_limit_reset(response: &Response) -> String {
    response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
