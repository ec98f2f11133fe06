//! Profile statistics aggregation
//!
//! Pulls the individual stat groups from the GitHub client concurrently and
//! assembles the `ProfileStats` document. Hard failures (unknown user, rate
//! limit) abort the whole aggregation; per-repo and per-year fetch failures
//! degrade to zero the way the rest of the stats still make sense.

use chrono::{Datelike, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use github_api::{GithubClient, GithubError, Repository};

use crate::languages;
use crate::models::{ProfileStats, Streak};
use crate::streak::{self, StreakSpan};

/// GitHub launched in 2008; no contributions can predate it
const FIRST_CONTRIBUTION_YEAR: i32 = 2008;
/// Upstream fetch fan-out for per-year and per-repo queries
const FETCH_CONCURRENCY: usize = 5;

/// Aggregates the stat groups for a single user
pub struct StatsAggregator<'a> {
    client: &'a GithubClient,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Fetch and assemble all profile statistics for `username`
    pub async fn fetch(&self, username: &str) -> Result<ProfileStats, GithubError> {
        let pr_query = format!("type:pr author:{username}");
        let issue_query = format!("type:issue author:{username}");
        let (repos, total_commits, total_contributions, calendar, total_prs, total_issues, counts, created_at) =
            tokio::try_join!(
                self.client.all_user_repos(username),
                self.client.total_commit_contributions(username),
                self.total_contributions_all_time(username),
                self.client.contribution_calendar(username),
                self.client.search_count(&pr_query),
                self.client.search_count(&issue_query),
                self.client.repo_counts(username),
                self.client.user_created_at(username),
            )?;

        let total_stars = repos.iter().map(|r| r.stargazers_count).sum();
        let languages = self.language_report(username, &repos).await;

        let streaks = streak::calculate(&calendar, Utc::now().date_naive());
        debug!(username, ?streaks, "Calculated contribution streaks");

        Ok(ProfileStats {
            username: username.to_string(),
            total_stars,
            total_commits,
            total_contributions,
            repos_owned: counts.owned,
            repos_contributed: counts.contributed,
            repos_total: counts.total(),
            created_at: format_created_at(created_at.date_naive()),
            current_streak: streaks.current.map(format_streak),
            longest_streak: streaks.longest.map(format_streak),
            total_prs,
            total_issues,
            languages,
        })
    }

    /// Sum per-year contribution totals since 2008
    ///
    /// The contributions collection caps its range at one year, so each year
    /// is queried separately with bounded fan-out. A failed year logs and
    /// contributes zero.
    async fn total_contributions_all_time(&self, username: &str) -> Result<u64, GithubError> {
        let current_year = Utc::now().year();
        let totals: Vec<u64> = stream::iter(FIRST_CONTRIBUTION_YEAR..=current_year)
            .map(|year| async move {
                let (from, to) = year_bounds(year);
                match self.client.contributions_between(username, &from, &to).await {
                    Ok(total) => total,
                    Err(e) => {
                        warn!(username, year, error = %e, "Failed to fetch contributions for year");
                        0
                    }
                }
            })
            .buffer_unordered(FETCH_CONCURRENCY)
            .collect()
            .await;

        Ok(totals.into_iter().sum())
    }

    /// Estimate the backend-language LOC report over owned, non-fork repos
    ///
    /// A repo whose language fetch fails logs and drops out of the report.
    async fn language_report(
        &self,
        username: &str,
        repos: &[Repository],
    ) -> Vec<crate::models::LanguageStats> {
        let owned: Vec<(String, String)> = repos
            .iter()
            .filter(|r| r.owner.login == username && !r.fork)
            .map(|r| (r.owner.login.clone(), r.name.clone()))
            .collect();

        let maps: Vec<_> = stream::iter(owned)
            .map(|(owner, name)| async move {
                match self.client.repo_languages(&owner, &name).await {
                    Ok(languages) => Some(languages),
                    Err(e) => {
                        warn!(repo = %name, error = %e, "Failed to fetch repo languages");
                        None
                    }
                }
            })
            .buffer_unordered(FETCH_CONCURRENCY)
            .filter_map(|languages| async move { languages })
            .collect()
            .await;

        languages::estimate(&maps)
    }
}

/// ISO-8601 bounds for one calendar year
fn year_bounds(year: i32) -> (String, String) {
    (
        format!("{year}-01-01T00:00:00Z"),
        format!("{year}-12-31T23:59:59Z"),
    )
}

fn format_created_at(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

fn format_streak(span: StreakSpan) -> Streak {
    Streak {
        start_date: span.start.format("%b %d").to_string(),
        end_date: span.end.format("%b %d").to_string(),
        length: span.length,
    }
}
