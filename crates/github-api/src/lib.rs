//! Rust client for the GitHub REST and GraphQL APIs
//!
//! This crate provides type-safe bindings to the parts of the GitHub API a
//! profile statistics service needs: repository listings, per-repository
//! language breakdowns, issue/PR search counts, and the GraphQL
//! contributions collection (commit totals, contribution calendar).
//!
//! # Example
//!
//! ```no_run
//! use github_api::GithubClient;
//!
//! # async fn example() -> Result<(), github_api::GithubError> {
//! let client = GithubClient::from_env()?;
//!
//! let repos = client.all_user_repos("octocat").await?;
//! let stars: u64 = repos.iter().map(|r| r.stargazers_count).sum();
//! println!("{} stars across {} repos", stars, repos.len());
//!
//! let commits = client.total_commit_contributions("octocat").await?;
//! println!("{} commit contributions", commits);
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! ## REST v3
//! - `GET /users/{username}/repos` - Public repositories (paginated)
//! - `GET /repos/{owner}/{repo}/languages` - Language bytes per repository
//! - `GET /search/issues` - Issue/PR counts by search qualifier
//!
//! ## GraphQL v4
//! - `user.createdAt` - Account creation date
//! - `user.repositories` / `user.repositoriesContributedTo` - Repo counts
//! - `user.contributionsCollection` - Commit totals, per-range contribution
//!   totals, and the contribution calendar (per-day counts)

mod client;
mod error;
mod types;

pub use client::GithubClient;
pub use error::{GithubError, Result};
pub use types::{ContributionDay, RepoCounts, RepoOwner, Repository};
