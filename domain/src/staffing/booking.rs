//! Booking derivations and `datesNeeded` row patching.
//!
//! A booking's `datesNeeded` is an ordered sequence of
//! `{date, staffCount, staffIds, role?, shift?}` rows. `staffIds` may be
//! shorter than `staffCount`, and empty-string entries mark unfilled
//! slots — index identity matters, so removing a staff member blanks the
//! slot rather than shrinking the sequence.

use serde_json::{Map, Value, json};

use crate::core::error::DispatchError;
use crate::document::fields::field_array;

/// Sub-fields a date-row patch may overwrite.
const DATE_ROW_FIELDS: &[&str] = &["staffIds", "staffCount", "role", "shift"];

/// Build the `datesNeeded` array for a new booking.
///
/// Either an explicit `datesNeeded` array or a single `assignedDate` must
/// be supplied; raises a validation error before any store access
/// otherwise.
pub fn build_dates_needed(
    assigned_date: Option<&str>,
    staff_count: Option<u64>,
    dates_needed: Option<&Value>,
) -> Result<Value, DispatchError> {
    if let Some(rows) = dates_needed.and_then(Value::as_array) {
        if !rows.is_empty() {
            return Ok(Value::Array(rows.clone()));
        }
    }
    match assigned_date {
        Some(date) if !date.trim().is_empty() => Ok(json!([{
            "date": date,
            "staffCount": staff_count.unwrap_or(1),
            "staffIds": [],
        }])),
        _ => Err(DispatchError::Validation(
            "a booking needs either assignedDate or datesNeeded".to_string(),
        )),
    }
}

/// Patch the row matching `date` (exact string equality), overwriting only
/// the supplied sub-fields. Appends a new row when no row matches.
pub fn patch_date_row(dates_needed: &Value, date: &str, updates: &Map<String, Value>) -> Value {
    let mut rows = dates_needed.as_array().cloned().unwrap_or_default();

    let patch: Map<String, Value> = updates
        .iter()
        .filter(|(k, _)| DATE_ROW_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let existing = rows
        .iter_mut()
        .find(|row| row.get("date").and_then(Value::as_str) == Some(date));

    match existing {
        Some(Value::Object(row)) => {
            for (k, v) in patch {
                row.insert(k, v);
            }
        }
        _ => {
            let mut row = Map::new();
            row.insert("date".to_string(), json!(date));
            row.insert("staffCount".to_string(), json!(1));
            row.insert("staffIds".to_string(), json!([]));
            for (k, v) in patch {
                row.insert(k, v);
            }
            rows.push(Value::Object(row));
        }
    }

    Value::Array(rows)
}

/// Non-empty staff ids assigned across all date rows.
pub fn booking_staff_ids(booking: &Value) -> Vec<String> {
    let mut ids = Vec::new();
    for row in field_array(booking, "datesNeeded").into_iter().flatten() {
        for id in field_array(row, "staffIds").into_iter().flatten() {
            if let Some(s) = id.as_str() {
                if !s.is_empty() {
                    ids.push(s.to_string());
                }
            }
        }
    }
    ids
}

/// A booking is fully staffed when the total requested head count is
/// covered by non-empty staff slots.
pub fn is_fully_staffed(booking: &Value) -> bool {
    let needed: u64 = field_array(booking, "datesNeeded")
        .into_iter()
        .flatten()
        .filter_map(|row| row.get("staffCount").and_then(Value::as_u64))
        .sum();
    needed <= booking_staff_ids(booking).len() as u64
}
