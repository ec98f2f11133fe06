//! GitHub API response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Owner of a repository (REST `/users/{username}/repos`)
#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// A public repository (REST `/users/{username}/repos`)
///
/// Only the fields the stats service consumes are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
}

/// Repository counts from the GraphQL user object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoCounts {
    /// Repositories with `ownerAffiliations: OWNER`
    pub owned: u64,
    /// `repositoriesContributedTo` (commits, PRs, issues), excluding owned
    pub contributed: u64,
}

impl RepoCounts {
    pub fn total(&self) -> u64 {
        self.owned + self.contributed
    }
}

/// One day of the GraphQL contribution calendar
///
/// Produced from the wire form after the date has parsed; days whose date
/// does not parse are dropped instead of failing the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

/// Wire form of a calendar day, with the date still a string
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawContributionDay {
    pub date: String,
    #[serde(rename = "contributionCount")]
    pub count: u32,
}

/// REST `/search/issues` response (only the count is consumed)
#[derive(Debug, Deserialize)]
pub(crate) struct SearchCountResponse {
    pub total_count: u64,
}

// GraphQL response shapes. Each query gets its own small data struct so the
// generic executor can deserialize straight into it.

#[derive(Debug, Deserialize)]
pub(crate) struct UserData<T> {
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileNode {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepoCountsNode {
    pub repositories: TotalCount,
    pub repositories_contributed_to: TotalCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalCount {
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionsNode {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionsCollection {
    #[serde(default)]
    pub total_commit_contributions: u64,
    pub contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionCalendar {
    #[serde(default)]
    pub total_contributions: u64,
    #[serde(default)]
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarWeek {
    pub contribution_days: Vec<RawContributionDay>,
}
