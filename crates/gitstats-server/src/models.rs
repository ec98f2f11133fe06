//! Wire types served by the stats endpoints

use file_stats_cache::CacheStats;
use serde::{Deserialize, Serialize};

/// A contribution streak, dates pre-formatted as `Mon DD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start_date: String,
    pub end_date: String,
    pub length: u32,
}

/// Estimated lines of code for one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub name: String,
    pub approx_lines_of_code: u64,
    /// Share of the total estimated LOC, rounded to 2 decimal places
    pub percentage: f64,
}

/// Aggregated profile statistics for one GitHub user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub username: String,
    /// Stars received across all public repositories
    pub total_stars: u64,
    /// Commit contributions over the trailing year
    pub total_commits: u64,
    /// Contributions (commits, PRs, issues, reviews) across all time
    pub total_contributions: u64,
    pub repos_owned: u64,
    /// Repositories contributed to, excluding owned
    pub repos_contributed: u64,
    pub repos_total: u64,
    /// Account creation date, formatted `Mon DD, YYYY`
    pub created_at: String,
    pub current_streak: Option<Streak>,
    pub longest_streak: Option<Streak>,
    pub total_prs: u64,
    pub total_issues: u64,
    /// Backend-language LOC estimates, sorted by percentage descending
    pub languages: Vec<LanguageStats>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}

/// Fully-populated fixture shared by svg and server tests
#[cfg(test)]
pub(crate) fn sample_stats() -> ProfileStats {
    ProfileStats {
        username: "octocat".into(),
        total_stars: 1540,
        total_commits: 321,
        total_contributions: 4217,
        repos_owned: 8,
        repos_contributed: 3,
        repos_total: 11,
        created_at: "Jan 25, 2011".into(),
        current_streak: Some(Streak {
            start_date: "Mar 01".into(),
            end_date: "Mar 15".into(),
            length: 15,
        }),
        longest_streak: Some(Streak {
            start_date: "Jun 02".into(),
            end_date: "Jul 20".into(),
            length: 49,
        }),
        total_prs: 57,
        total_issues: 19,
        languages: vec![
            LanguageStats {
                name: "Python".into(),
                approx_lines_of_code: 21000,
                percentage: 70.0,
            },
            LanguageStats {
                name: "Go".into(),
                approx_lines_of_code: 9000,
                percentage: 30.0,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_stats_round_trips_through_json() {
        let stats = sample_stats();
        let json = serde_json::to_string(&stats).unwrap();
        let back: ProfileStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_streaks_serialize_as_null_when_absent() {
        let mut stats = sample_stats();
        stats.current_streak = None;

        let value = serde_json::to_value(&stats).unwrap();
        assert!(value["current_streak"].is_null());
        assert_eq!(value["longest_streak"]["length"], 49);
    }
}
