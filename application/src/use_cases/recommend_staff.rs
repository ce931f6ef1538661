//! Staff recommendation use case.
//!
//! Resolves the requested show and target dates, then scores every staff
//! member by how much of the target date set their availability covers.
//! When the show-id constraint would leave nobody (availability logged
//! against a duplicate show record for the same dates), a second pass
//! ignores the show id rather than returning an empty list.

use std::collections::HashSet;
use std::sync::Arc;

use crewcall_domain::document::fields::{doc_id, field_array, field_str, non_empty_str};
use crewcall_domain::staffing::recommend::{
    Candidate, coverage_dates, rank_candidates, score, target_dates,
};
use crewcall_domain::{
    DispatchError, availability_dates, display_name, matches_exact_name, sanitize_for_display,
    show_date_span,
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::ports::document_store::DocumentStorePort;
use crate::use_cases::dispatch::DispatchConfig;
use crate::use_cases::resolve::resolve_named;

/// Input of a recommendation request.
#[derive(Debug, Clone, Default)]
pub struct RecommendStaffInput {
    /// Show id or name; optional when explicit dates are supplied.
    pub show: Option<String>,
    pub date: Option<String>,
    pub dates: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub role: Option<String>,
    pub skills: Vec<String>,
    /// Result cap; falls back to the configured default when absent.
    pub limit: Option<usize>,
}

pub struct RecommendStaffUseCase {
    store: Arc<dyn DocumentStorePort>,
    config: DispatchConfig,
}

impl RecommendStaffUseCase {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self::with_config(store, DispatchConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStorePort>, config: DispatchConfig) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RecommendStaffInput) -> Result<Value, DispatchError> {
        let show = match &input.show {
            Some(reference) => Some(self.resolve_show(reference).await?),
            None => None,
        };
        let show_id = show.as_ref().and_then(|s| doc_id(s).map(str::to_string));
        let show_span = show.as_ref().and_then(show_date_span);

        let targets = target_dates(
            input.date.as_deref(),
            &input.dates,
            input.start_date.as_deref(),
            input.end_date.as_deref(),
            show_span,
        );
        if targets.is_empty() {
            return Err(DispatchError::Validation(
                "recommend_staff needs a date, a date range, explicit dates, or a show with a date span"
                    .to_string(),
            ));
        }
        let target_set: HashSet<String> = targets.iter().cloned().collect();
        debug!(targets = targets.len(), show_id = ?show_id, "recommending staff");

        let (availability, staff) = tokio::try_join!(
            self.store.get_all("availability", true),
            self.store.get_all("staff", true),
        )?;
        let availability: Vec<Value> =
            availability.iter().map(sanitize_for_display).collect();

        let mut candidates =
            collect_candidates(&availability, &staff, &target_set, show_id.as_deref());

        // Availability for the same dates may be logged against a duplicate
        // show record; retry without the show-id constraint before giving up.
        if candidates.is_empty() && show_id.is_some() {
            warn!("no coverage under the requested show id, retrying without it");
            candidates = collect_candidates(&availability, &staff, &target_set, None);
        }

        let ranked = rank_candidates(
            score_candidates(candidates, &staff, input.role.as_deref(), &input.skills),
            Some(input.limit.unwrap_or(self.config.recommend_limit)),
        );

        Ok(Value::Array(
            ranked
                .into_iter()
                .map(|c| {
                    json!({
                        "staffId": c.staff_id,
                        "name": c.name,
                        "role": c.role,
                        "score": c.score,
                        "coverage": c.coverage,
                        "matchedDates": c.matched_dates,
                    })
                })
                .collect(),
        ))
    }

    /// A show reference may be an id or a name; ids win.
    async fn resolve_show(&self, reference: &str) -> Result<Value, DispatchError> {
        if let Some(doc) = self.store.get_by_id("shows", reference).await? {
            return Ok(doc);
        }
        resolve_named(
            self.store.as_ref(),
            "shows",
            "show",
            reference,
            self.config.suggestion_limit,
        )
        .await
    }
}

/// Per-staff coverage aggregated across availability records.
struct Coverage {
    staff_id: String,
    matched_dates: Vec<String>,
    show_match: bool,
}

fn collect_candidates(
    availability: &[Value],
    staff: &[Value],
    targets: &HashSet<String>,
    show_id: Option<&str>,
) -> Vec<Coverage> {
    let mut by_staff: Vec<Coverage> = Vec::new();

    for record in availability {
        if let Some(required) = show_id {
            if field_str(record, "showId") != Some(required) {
                continue;
            }
        }
        let dates = availability_dates(record);
        let matched = coverage_dates(&dates, targets);
        if matched.is_empty() {
            continue;
        }
        let Some(staff_id) = resolve_record_staff(record, staff) else {
            continue;
        };
        let show_match = show_id.is_some() && field_str(record, "showId") == show_id;

        match by_staff.iter_mut().find(|c| c.staff_id == staff_id) {
            Some(existing) => {
                for date in matched {
                    if !existing.matched_dates.contains(&date) {
                        existing.matched_dates.push(date);
                    }
                }
                existing.show_match |= show_match;
            }
            None => by_staff.push(Coverage {
                staff_id,
                matched_dates: matched,
                show_match,
            }),
        }
    }

    by_staff
}

/// Availability records reference staff by id first, name as a fallback.
fn resolve_record_staff(record: &Value, staff: &[Value]) -> Option<String> {
    if let Some(id) = non_empty_str(record, "staffId") {
        return Some(id.to_string());
    }
    let name = non_empty_str(record, "staffName")?;
    staff
        .iter()
        .find(|s| matches_exact_name(s, name))
        .and_then(doc_id)
        .map(str::to_string)
}

fn score_candidates(
    coverage: Vec<Coverage>,
    staff: &[Value],
    role: Option<&str>,
    skills: &[String],
) -> Vec<Candidate> {
    coverage
        .into_iter()
        .map(|c| {
            let doc = staff.iter().find(|s| doc_id(s) == Some(c.staff_id.as_str()));
            let name = doc
                .and_then(|d| display_name(d))
                .unwrap_or_else(|| c.staff_id.clone());
            let staff_role = doc.and_then(|d| field_str(d, "role").map(str::to_string));
            let role_match = match (role, staff_role.as_deref()) {
                (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
                _ => false,
            };
            let staff_skills: Vec<String> = doc
                .and_then(|d| field_array(d, "skills"))
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_lowercase)
                        .collect()
                })
                .unwrap_or_default();
            let skill_matches = skills
                .iter()
                .filter(|s| staff_skills.contains(&s.to_lowercase()))
                .count();

            Candidate {
                score: score(c.matched_dates.len(), c.show_match, role_match, skill_matches),
                coverage: c.matched_dates.len(),
                staff_id: c.staff_id,
                name,
                role: staff_role,
                matched_dates: c.matched_dates,
            }
        })
        .collect()
}
