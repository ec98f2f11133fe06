//! Backend-language lines-of-code estimation
//!
//! GitHub's language endpoint reports bytes per language; lines are
//! estimated with per-language average bytes-per-line divisors. Only a
//! fixed set of backend languages counts toward the report, and Jupyter
//! Notebook LOC folds into Python.

use std::collections::HashMap;

use crate::models::LanguageStats;

/// Average bytes per line of source, per counted language
const AVG_BYTES_PER_LINE: &[(&str, u64)] = &[
    ("Python", 60),
    ("Go", 20),
    ("Java", 30),
    ("JavaScript", 20),
    ("Solidity", 25),
    ("C++", 10),
    ("Jupyter Notebook", 550),
];

fn divisor_for(language: &str) -> Option<u64> {
    AVG_BYTES_PER_LINE
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, divisor)| *divisor)
}

/// Estimate LOC percentages from per-repository language byte maps
///
/// Languages outside the backend set are ignored; languages that round to
/// zero LOC are dropped. The result is sorted by percentage descending,
/// then by name for a stable order.
pub fn estimate(per_repo: &[HashMap<String, u64>]) -> Vec<LanguageStats> {
    let mut loc_by_language: HashMap<&str, u64> = HashMap::new();

    for languages in per_repo {
        for (language, bytes) in languages {
            let Some(divisor) = divisor_for(language) else {
                continue;
            };
            let loc = *bytes / divisor;
            let bucket = if language.as_str() == "Jupyter Notebook" {
                "Python"
            } else {
                language.as_str()
            };
            *loc_by_language.entry(bucket).or_default() += loc;
        }
    }

    loc_by_language.retain(|_, loc| *loc > 0);
    let total: u64 = loc_by_language.values().sum();

    let mut report: Vec<LanguageStats> = loc_by_language
        .into_iter()
        .map(|(name, loc)| {
            let percentage = if total > 0 {
                (loc as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
            } else {
                0.0
            };
            LanguageStats {
                name: name.to_string(),
                approx_lines_of_code: loc,
                percentage,
            }
        })
        .collect();

    report.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    report
}
