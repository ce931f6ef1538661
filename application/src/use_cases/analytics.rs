//! Aggregate reporting over the full in-memory collections.
//!
//! Counts and rankings only — nothing here writes. "Days worked" means
//! distinct `datesNeeded` dates a staff member is assigned to, optionally
//! restricted to a closed date window.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use crewcall_domain::document::fields::{doc_id, field_str};
use crewcall_domain::staffing::booking::is_fully_staffed;
use crewcall_domain::{
    DispatchError, client_display, display_name, sanitize_for_display, show_date_span,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::ports::document_store::DocumentStorePort;

const DEFAULT_TOP_N: usize = 5;

/// Optional bounds of the analytics report.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsWindow {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}

pub struct AnalyticsUseCase {
    store: Arc<dyn DocumentStorePort>,
}

impl AnalyticsUseCase {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, window: AnalyticsWindow) -> Result<Value, DispatchError> {
        let (bookings, staff, clients, shows) = tokio::try_join!(
            self.store.get_all("bookings", true),
            self.store.get_all("staff", true),
            self.store.get_all("clients", true),
            self.store.get_all("shows", true),
        )?;
        let bookings: Vec<Value> = bookings.iter().map(sanitize_for_display).collect();
        let shows: Vec<Value> = shows.iter().map(sanitize_for_display).collect();
        let today = Utc::now().format("%Y-%m-%d").to_string();
        debug!(
            bookings = bookings.len(),
            staff = staff.len(),
            "building analytics report"
        );
        Ok(build_report(
            &bookings, &staff, &clients, &shows, &window, &today,
        ))
    }
}

/// Pure report assembly, separated from I/O so it tests without a store.
fn build_report(
    bookings: &[Value],
    staff: &[Value],
    clients: &[Value],
    shows: &[Value],
    window: &AnalyticsWindow,
    today: &str,
) -> Value {
    let limit = window.limit.unwrap_or(DEFAULT_TOP_N);

    let mut status_counts: HashMap<String, u64> = HashMap::new();
    let mut fully_staffed = 0u64;
    for b in bookings {
        let status = field_str(b, "status").unwrap_or("unknown").to_string();
        *status_counts.entry(status).or_default() += 1;
        if is_fully_staffed(b) {
            fully_staffed += 1;
        }
    }

    let mut role_counts: HashMap<String, u64> = HashMap::new();
    for s in staff {
        let role = field_str(s, "role").unwrap_or("unassigned").to_string();
        *role_counts.entry(role).or_default() += 1;
    }

    let upcoming_shows = shows
        .iter()
        .filter_map(show_date_span)
        .filter(|(start, _)| start.as_str() >= today)
        .count();

    json!({
        "totals": {
            "bookings": bookings.len(),
            "staff": staff.len(),
            "clients": clients.len(),
            "shows": shows.len(),
        },
        "bookingStatus": histogram(status_counts),
        "fullyStaffedBookings": fully_staffed,
        "topClients": top_clients(bookings, limit),
        "topStaff": top_staff(bookings, staff, window, limit),
        "staffRoles": histogram(role_counts),
        "upcomingShows": upcoming_shows,
    })
}

fn histogram(counts: HashMap<String, u64>) -> Value {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Value::Object(entries.into_iter().map(|(k, v)| (k, json!(v))).collect())
}

/// Clients ranked by booking count. Unnamed clients fall back to their id.
fn top_clients(bookings: &[Value], limit: usize) -> Value {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for b in bookings {
        let label = client_display(b)
            .or_else(|| field_str(b, "clientId").map(str::to_string));
        if let Some(label) = label {
            *counts.entry(label).or_default() += 1;
        }
    }
    ranked(counts, limit, "bookings")
}

/// Staff ranked by distinct days worked inside the window.
fn top_staff(
    bookings: &[Value],
    staff: &[Value],
    window: &AnalyticsWindow,
    limit: usize,
) -> Value {
    let names: HashMap<String, String> = staff
        .iter()
        .filter_map(|s| Some((doc_id(s)?.to_string(), display_name(s)?)))
        .collect();

    let mut days: HashMap<String, std::collections::HashSet<String>> = HashMap::new();
    for b in bookings {
        let rows = b.get("datesNeeded").and_then(Value::as_array);
        for row in rows.into_iter().flatten() {
            let Some(date) = field_str(row, "date") else {
                continue;
            };
            if window.start_date.as_deref().is_some_and(|s| date < s)
                || window.end_date.as_deref().is_some_and(|e| date > e)
            {
                continue;
            }
            for id in row
                .get("staffIds")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .filter(|id| !id.is_empty())
            {
                days.entry(id.to_string()).or_default().insert(date.to_string());
            }
        }
    }
    let counts: HashMap<String, u64> = days
        .into_iter()
        .map(|(id, dates)| {
            let label = names.get(&id).cloned().unwrap_or(id);
            (label, dates.len() as u64)
        })
        .collect();
    ranked(counts, limit, "daysWorked")
}

fn ranked(counts: HashMap<String, u64>, limit: usize, value_key: &str) -> Value {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase())));
    entries.truncate(limit);
    Value::Array(
        entries
            .into_iter()
            .map(|(name, count)| json!({"name": name, value_key: count}))
            .collect(),
    )
}
