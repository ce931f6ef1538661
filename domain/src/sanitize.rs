//! Timestamp normalization and display sanitization.
//!
//! The store persists provider-specific rich timestamp objects
//! (`{seconds, nanoseconds}`, or `{_seconds, _nanoseconds}` on older
//! records). Those are neither directly displayable nor comparable with
//! the ISO-8601 date strings the filtering logic uses, so every read path
//! that can reach the model, the UI or a string-date comparison runs
//! through this module first.
//!
//! Both functions are pure and total: unknown shapes pass through
//! unchanged and malformed input never fails. Applying either function
//! twice yields the same result as applying it once.

use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Value};

/// Recursively convert provider timestamp objects to RFC-3339 strings,
/// leaving every other value untouched.
pub fn normalize_timestamps_deep(value: &Value) -> Value {
    match value {
        Value::Object(map) => match timestamp_to_iso(map) {
            Some(iso) => Value::String(iso),
            None => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize_timestamps_deep(v)))
                    .collect(),
            ),
        },
        Value::Array(items) => {
            Value::Array(items.iter().map(normalize_timestamps_deep).collect())
        }
        other => other.clone(),
    }
}

/// Convert a document to a plain, display-safe value.
///
/// Currently the only non-plain values the store produces are the rich
/// timestamp objects, so this is the timestamp conversion applied deeply;
/// it is kept as a separate entry point because it is the contract every
/// outbound read must satisfy, whatever wrapper types the store grows.
pub fn sanitize_for_display(value: &Value) -> Value {
    normalize_timestamps_deep(value)
}

/// Detect a provider timestamp object and render it as RFC-3339.
///
/// Accepts `seconds`/`nanoseconds` and the underscore-prefixed legacy
/// spelling; tolerates an extra `type` tag and nothing else, so ordinary
/// documents that happen to have a `seconds` field are not mangled.
fn timestamp_to_iso(map: &Map<String, Value>) -> Option<String> {
    let seconds = map
        .get("seconds")
        .or_else(|| map.get("_seconds"))?
        .as_i64()?;
    let nanos = map
        .get("nanoseconds")
        .or_else(|| map.get("_nanoseconds"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let recognized = map.keys().all(|k| {
        matches!(
            k.as_str(),
            "seconds" | "nanoseconds" | "_seconds" | "_nanoseconds" | "type"
        )
    });
    if !recognized {
        return None;
    }

    let nanos = u32::try_from(nanos).ok()?;
    DateTime::from_timestamp(seconds, nanos)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_timestamp_object() {
        let value = json!({"createdAt": {"seconds": 1_700_000_000, "nanoseconds": 0}});
        let normalized = normalize_timestamps_deep(&value);
        let iso = normalized["createdAt"].as_str().unwrap();
        assert!(iso.starts_with("2023-11-14T"));
    }

    #[test]
    fn test_converts_legacy_underscore_spelling() {
        let value = json!({"updatedAt": {"_seconds": 1_700_000_000, "_nanoseconds": 500_000_000}});
        let normalized = normalize_timestamps_deep(&value);
        assert!(normalized["updatedAt"].is_string());
    }

    #[test]
    fn test_recurses_through_arrays_and_nesting() {
        let value = json!({
            "datesNeeded": [
                {"date": "2025-03-01", "loggedAt": {"seconds": 1_700_000_000, "nanoseconds": 0}}
            ]
        });
        let normalized = normalize_timestamps_deep(&value);
        assert!(normalized["datesNeeded"][0]["loggedAt"].is_string());
        assert_eq!(normalized["datesNeeded"][0]["date"], "2025-03-01");
    }

    #[test]
    fn test_leaves_lookalike_objects_alone() {
        // Extra keys mean this is an ordinary document, not a timestamp
        let value = json!({"seconds": 30, "label": "half a minute"});
        assert_eq!(normalize_timestamps_deep(&value), value);
    }

    #[test]
    fn test_total_on_malformed_input() {
        for value in [
            json!({"seconds": "not a number", "nanoseconds": 0}),
            json!({"seconds": i64::MAX, "nanoseconds": 0}),
            json!({"nanoseconds": 5}),
            json!(null),
            json!([1, "two", {"three": 3.0}]),
        ] {
            // Must not panic, and unknown shapes pass through
            let _ = sanitize_for_display(&value);
        }
    }

    #[test]
    fn test_idempotent() {
        let value = json!({
            "id": "b1",
            "createdAt": {"seconds": 1_700_000_000, "nanoseconds": 0},
            "rows": [{"at": {"_seconds": 1_600_000_000, "_nanoseconds": 1}}],
            "notes": "plain"
        });
        let once = sanitize_for_display(&value);
        let twice = sanitize_for_display(&once);
        assert_eq!(once, twice);
    }
}
