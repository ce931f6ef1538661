//! Pure scoring for the staff recommendation engine.
//!
//! Staffing a show means covering *all* needed dates, preferably with the
//! same people. A candidate's base score is their **coverage** — how many
//! of the requested calendar dates their availability record intersects.
//! On top of that:
//!
//! - +0.5 when the availability was logged against the requested show
//!   (the same date can be shared across shows)
//! - +2.0 when the candidate's role matches the requested role
//!   (case-insensitive)
//! - +1.0 per requested skill present in the candidate's skill set
//!
//! Ordering is score descending, ties broken by case-insensitive name
//! ascending.

use chrono::NaiveDate;
use std::collections::HashSet;

/// Guard against degenerate legacy show spans (e.g. a garbage end date).
const MAX_RANGE_DAYS: usize = 366;

const SHOW_MATCH_BONUS: f64 = 0.5;
const ROLE_MATCH_BONUS: f64 = 2.0;

/// A scored staff candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub staff_id: String,
    pub name: String,
    pub role: Option<String>,
    pub score: f64,
    pub coverage: usize,
    pub matched_dates: Vec<String>,
}

/// Expand an inclusive ISO date range into individual dates.
///
/// Unparseable bounds yield just the parseable endpoints (string dates in
/// legacy data are not guaranteed to be valid ISO).
pub fn expand_date_range(start: &str, end: &str) -> Vec<String> {
    let (Ok(start), Ok(end)) = (
        NaiveDate::parse_from_str(start, "%Y-%m-%d"),
        NaiveDate::parse_from_str(end, "%Y-%m-%d"),
    ) else {
        let mut out: Vec<String> = vec![start.to_string()];
        if end != start {
            out.push(end.to_string());
        }
        return out;
    };

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .take(MAX_RANGE_DAYS)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

/// Pick the target date set: explicit date > explicit dates > explicit
/// range > the show's own span.
pub fn target_dates(
    date: Option<&str>,
    dates: &[String],
    start: Option<&str>,
    end: Option<&str>,
    show_span: Option<(String, String)>,
) -> Vec<String> {
    if let Some(d) = date {
        return vec![d.to_string()];
    }
    if !dates.is_empty() {
        return dates.to_vec();
    }
    if let Some(s) = start {
        return expand_date_range(s, end.unwrap_or(s));
    }
    match show_span {
        Some((s, e)) => expand_date_range(&s, &e),
        None => Vec::new(),
    }
}

/// Dates in `available` that fall in the target set, preserving order.
pub fn coverage_dates(available: &[String], targets: &HashSet<String>) -> Vec<String> {
    available
        .iter()
        .filter(|d| targets.contains(*d))
        .cloned()
        .collect()
}

/// Combined candidate score.
pub fn score(
    coverage: usize,
    show_match: bool,
    role_match: bool,
    skill_matches: usize,
) -> f64 {
    coverage as f64
        + if show_match { SHOW_MATCH_BONUS } else { 0.0 }
        + if role_match { ROLE_MATCH_BONUS } else { 0.0 }
        + skill_matches as f64
}

/// Sort by score descending, ties by case-insensitive name ascending, then
/// truncate to `limit` if given.
pub fn rank_candidates(mut candidates: Vec<Candidate>, limit: Option<usize>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    if let Some(limit) = limit {
        candidates.truncate(limit);
    }
    candidates
}
