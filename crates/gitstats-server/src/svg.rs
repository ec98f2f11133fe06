//! SVG stat card rendering
//!
//! Pure `ProfileStats -> String` rendering. The card is assembled with
//! `format!` rather than a template engine: the layout is small and fixed.

use std::fmt::Write;

use crate::models::{ProfileStats, Streak};

/// Card width in pixels; the language bar spans the full width
const SVG_WIDTH: u32 = 570;
const SVG_HEIGHT: u32 = 320;
/// At most this many languages appear in the bar
const MAX_LANGUAGES: usize = 6;
/// Segment fill colors, applied in percentage order
const LANG_BAR_COLORS: &[&str] = &[
    "#FF5F1F", "#FFA500", "#F4BB44", "#FFD580", "#FFDEAD", "#FBCEB1", "#FBD5BC",
];
/// Fixed x-offsets for the segment labels beneath the bar
const LANG_TEXT_X: &[u32] = &[5, 135, 245, 330, 400, 480];

/// One segment of the stacked language bar
#[derive(Debug, Clone, PartialEq)]
struct LangSegment {
    name: String,
    percent: f64,
    width: f64,
    rect_x: f64,
    text_x: u32,
    fill: &'static str,
}

/// Render the stat card for a profile
pub fn render(stats: &ProfileStats) -> String {
    let user_name = display_name(&stats.username);
    let (current_len, current_dates) = streak_parts(stats.current_streak.as_ref());
    let (longest_len, longest_dates) = streak_parts(stats.longest_streak.as_ref());
    let segments = language_segments(stats);

    let mut svg = String::with_capacity(8 * 1024);
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{SVG_HEIGHT}" viewBox="0 0 {SVG_WIDTH} {SVG_HEIGHT}" fill="none" role="img" aria-label="GitHub stats for {user_name}">
  <style>
    .card {{ fill: #0d1117; stroke: #30363d; }}
    .title {{ font: 600 16px 'Segoe UI', Ubuntu, sans-serif; fill: #f0f6fc; }}
    .label {{ font: 400 13px 'Segoe UI', Ubuntu, sans-serif; fill: #8b949e; }}
    .value {{ font: 600 13px 'Segoe UI', Ubuntu, sans-serif; fill: #f0f6fc; }}
    .big {{ font: 700 28px 'Segoe UI', Ubuntu, sans-serif; fill: #ff5f1f; }}
    .rating {{ font: 700 24px 'Segoe UI', Ubuntu, sans-serif; fill: #f4bb44; }}
    .dates {{ font: 400 11px 'Segoe UI', Ubuntu, sans-serif; fill: #8b949e; }}
    .lang {{ font: 400 11px 'Segoe UI', Ubuntu, sans-serif; fill: #c9d1d9; }}
  </style>
  <rect class="card" x="0.5" y="0.5" width="{card_w}" height="{card_h}" rx="6"/>
  <text class="title" x="20" y="32">{user_name}'S GITHUB STATS</text>
"##,
        card_w = SVG_WIDTH - 1,
        card_h = SVG_HEIGHT - 1,
    );

    // Left column: headline counters
    let rows = [
        ("Total Stars", format_count(stats.total_stars)),
        ("Total Commits", format_count(stats.total_commits)),
        ("Total PRs", format_count(stats.total_prs)),
        ("Total Issues", format_count(stats.total_issues)),
        ("Contributed to", format_count(stats.repos_total)),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let y = 66 + i as u32 * 26;
        let _ = write!(
            svg,
            r#"  <text class="label" x="20" y="{y}">{label}:</text>
  <text class="value" x="150" y="{y}">{value}</text>
"#
        );
    }

    // Middle column: all-time contributions and rating
    let _ = write!(
        svg,
        r#"  <text class="big" x="285" y="85" text-anchor="middle">{contributions}</text>
  <text class="label" x="285" y="106" text-anchor="middle">Total Contributions</text>
  <text class="dates" x="285" y="124" text-anchor="middle">{period}</text>
  <text class="rating" x="285" y="170" text-anchor="middle">{rating}</text>
  <text class="label" x="285" y="190" text-anchor="middle">Rating</text>
"#,
        contributions = format_count(stats.total_contributions),
        period = format!("{} - Present", stats.created_at),
        rating = rating(stats.total_contributions),
    );

    // Right column: streaks
    let _ = write!(
        svg,
        r#"  <text class="big" x="475" y="85" text-anchor="middle">{current_len}</text>
  <text class="label" x="475" y="106" text-anchor="middle">Current Streak</text>
  <text class="dates" x="475" y="124" text-anchor="middle">{current_dates}</text>
  <text class="value" x="475" y="165" text-anchor="middle">{longest_len} days</text>
  <text class="label" x="475" y="183" text-anchor="middle">Longest Streak</text>
  <text class="dates" x="475" y="199" text-anchor="middle">{longest_dates}</text>
"#
    );

    // Language bar
    for segment in &segments {
        let _ = write!(
            svg,
            r#"  <rect x="{x:.2}" y="260" width="{w:.2}" height="10" fill="{fill}"/>
"#,
            x = segment.rect_x,
            w = segment.width,
            fill = segment.fill,
        );
    }
    for segment in &segments {
        let _ = write!(
            svg,
            r#"  <circle cx="{cx}" cy="286" r="4" fill="{fill}"/>
  <text class="lang" x="{text_x}" y="290">{name} {percent:.1}%</text>
"#,
            cx = segment.text_x + 4,
            fill = segment.fill,
            text_x = segment.text_x + 14,
            name = segment.name,
            percent = segment.percent,
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Compute the stacked bar segments for the top languages
fn language_segments(stats: &ProfileStats) -> Vec<LangSegment> {
    let mut x_cursor = 0.0;
    stats
        .languages
        .iter()
        .take(MAX_LANGUAGES)
        .enumerate()
        .map(|(i, lang)| {
            let percent = (lang.percentage * 10.0).round() / 10.0;
            let width = (percent / 100.0 * SVG_WIDTH as f64 * 100.0).round() / 100.0;
            let segment = LangSegment {
                name: lang.name.clone(),
                percent,
                width,
                rect_x: x_cursor,
                text_x: LANG_TEXT_X[i % LANG_TEXT_X.len()],
                fill: LANG_BAR_COLORS[i % LANG_BAR_COLORS.len()],
            };
            x_cursor += width;
            segment
        })
        .collect()
}

/// Uppercased display name: dashes become spaces
fn display_name(username: &str) -> String {
    username.replace('-', " ").to_uppercase()
}

/// Thousands-separated decimal rendering
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Letter grade over all-time contributions
fn rating(total_contributions: u64) -> &'static str {
    match total_contributions {
        8_000.. => "S",
        4_000.. => "A+",
        2_000.. => "A",
        1_000.. => "B+",
        500.. => "B",
        200.. => "B-",
        _ => "C",
    }
}

fn streak_parts(streak: Option<&Streak>) -> (u32, String) {
    match streak {
        Some(streak) => (
            streak.length,
            format!("{} - {}", streak.start_date, streak.end_date),
        ),
        None => (0, "N/A - N/A".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_stats;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("octo-cat"), "OCTO CAT");
        assert_eq!(display_name("plain"), "PLAIN");
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(rating(0), "C");
        assert_eq!(rating(200), "B-");
        assert_eq!(rating(999), "B");
        assert_eq!(rating(4_217), "A+");
        assert_eq!(rating(20_000), "S");
    }

    #[test]
    fn test_render_includes_headline_numbers() {
        let svg = render(&sample_stats());

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains("OCTOCAT'S GITHUB STATS"));
        assert!(svg.contains("1,540"));
        assert!(svg.contains("4,217"));
        assert!(svg.contains("Jan 25, 2011 - Present"));
        assert!(svg.contains("Mar 01 - Mar 15"));
    }

    #[test]
    fn test_render_without_streaks_shows_placeholders() {
        let mut stats = sample_stats();
        stats.current_streak = None;
        stats.longest_streak = None;

        let svg = render(&stats);
        assert!(svg.contains("N/A - N/A"));
    }

    #[test]
    fn test_language_segments_stack_left_to_right() {
        let stats = sample_stats();
        let segments = language_segments(&stats);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].rect_x, 0.0);
        // 70% of 570
        assert_eq!(segments[0].width, 399.0);
        assert_eq!(segments[1].rect_x, 399.0);
        assert_eq!(segments[0].fill, "#FF5F1F");
        assert_eq!(segments[1].text_x, 135);
    }

    #[test]
    fn test_language_bar_caps_at_six_segments() {
        let mut stats = sample_stats();
        stats.languages = (0..8)
            .map(|i| crate::models::LanguageStats {
                name: format!("Lang{i}"),
                approx_lines_of_code: 100,
                percentage: 12.5,
            })
            .collect();

        let segments = language_segments(&stats);
        assert_eq!(segments.len(), MAX_LANGUAGES);
    }
}
