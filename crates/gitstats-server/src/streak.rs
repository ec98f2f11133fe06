//! Contribution streak calculation
//!
//! Pure functions over the contribution calendar. A streak is a run of
//! consecutive dates whose contribution count is positive. The current
//! streak must end today, or yesterday when today has no contributions yet.

use chrono::{Days, NaiveDate};
use github_api::ContributionDay;

/// A resolved streak of consecutive contribution days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

/// Current and longest streaks for one calendar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub current: Option<StreakSpan>,
    pub longest: Option<StreakSpan>,
}

/// Calculate current and longest streaks from contribution days
///
/// `today` is passed in rather than read from the clock so the current
/// streak cutoff is testable. Duplicate dates collapse; order is irrelevant.
pub fn calculate(days: &[ContributionDay], today: NaiveDate) -> Streaks {
    let mut active: Vec<NaiveDate> = days
        .iter()
        .filter(|day| day.count > 0 && day.date <= today)
        .map(|day| day.date)
        .collect();
    active.sort();
    active.dedup();

    Streaks {
        current: current_streak(&active, today),
        longest: longest_streak(&active),
    }
}

fn longest_streak(active: &[NaiveDate]) -> Option<StreakSpan> {
    let mut best: Option<StreakSpan> = None;
    let mut run_start = *active.first()?;
    let mut prev = run_start;

    for &date in &active[1..] {
        if prev.succ_opt() != Some(date) {
            best = pick_longer(best, span(run_start, prev));
            run_start = date;
        }
        prev = date;
    }
    best = pick_longer(best, span(run_start, prev));
    best
}

fn current_streak(active: &[NaiveDate], today: NaiveDate) -> Option<StreakSpan> {
    let &end = active.last()?;
    let yesterday = today.checked_sub_days(Days::new(1))?;
    if end != today && end != yesterday {
        return None;
    }

    let mut start = end;
    for &date in active.iter().rev().skip(1) {
        if date.succ_opt() == Some(start) {
            start = date;
        } else {
            break;
        }
    }
    Some(span(start, end))
}

fn span(start: NaiveDate, end: NaiveDate) -> StreakSpan {
    StreakSpan {
        start,
        end,
        length: (end - start).num_days() as u32 + 1,
    }
}

fn pick_longer(best: Option<StreakSpan>, candidate: StreakSpan) -> Option<StreakSpan> {
    match best {
        Some(b) if b.length >= candidate.length => Some(b),
        _ => Some(candidate),
    }
}
