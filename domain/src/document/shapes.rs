//! Shape-detection strategies for legacy document variants.
//!
//! Each function tries a fixed, ordered list of encodings and returns the
//! first successful extraction. The order is the compatibility contract:
//!
//! | Fact | Tried in order |
//! |------|----------------|
//! | display name | `name` → `firstName`+`lastName` → `company` → `email` |
//! | booking client | `clientName` → `client.name` → `client` (string) |
//! | booking show | `showName` → `show.name` → `show` (string) |
//! | availability dates | `availableDates` → legacy `dates` |
//! | show span | `startDate`/`endDate` → `startDate` only → legacy `date` |

use serde_json::Value;

use super::fields::{field_array, non_empty_str};

/// Display name of any document.
///
/// Legacy staff records carry `firstName`/`lastName` instead of `name`;
/// clients may only have a `company`. Falls back to the email as a last
/// resort so a record is never rendered blank.
pub fn display_name(doc: &Value) -> Option<String> {
    if let Some(name) = non_empty_str(doc, "name") {
        return Some(name.to_string());
    }
    let first = non_empty_str(doc, "firstName");
    let last = non_empty_str(doc, "lastName");
    match (first, last) {
        (Some(f), Some(l)) => return Some(format!("{f} {l}")),
        (Some(f), None) => return Some(f.to_string()),
        (None, Some(l)) => return Some(l.to_string()),
        (None, None) => {}
    }
    if let Some(company) = non_empty_str(doc, "company") {
        return Some(company.to_string());
    }
    non_empty_str(doc, "email").map(str::to_string)
}

/// Client display name recorded on a booking, without resolving the id.
pub fn client_display(booking: &Value) -> Option<String> {
    if let Some(name) = non_empty_str(booking, "clientName") {
        return Some(name.to_string());
    }
    match booking.get("client") {
        Some(Value::Object(_)) => booking
            .get("client")
            .and_then(|c| non_empty_str(c, "name"))
            .map(str::to_string),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Show display name recorded on a booking, without resolving the id.
pub fn show_display(booking: &Value) -> Option<String> {
    if let Some(name) = non_empty_str(booking, "showName") {
        return Some(name.to_string());
    }
    match booking.get("show") {
        Some(Value::Object(_)) => booking
            .get("show")
            .and_then(|s| non_empty_str(s, "name"))
            .map(str::to_string),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Dates an availability record covers. Legacy records use `dates`.
pub fn availability_dates(doc: &Value) -> Vec<String> {
    let rows = field_array(doc, "availableDates")
        .or_else(|| field_array(doc, "dates"))
        .cloned()
        .unwrap_or_default();
    rows.iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The calendar span of a show as `(start, end)` ISO date strings.
///
/// Legacy shows carry a singular `date`, which yields a one-day span.
pub fn show_date_span(show: &Value) -> Option<(String, String)> {
    if let Some(start) = non_empty_str(show, "startDate") {
        let end = non_empty_str(show, "endDate").unwrap_or(start);
        return Some((start.to_string(), end.to_string()));
    }
    non_empty_str(show, "date").map(|d| (d.to_string(), d.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_prefers_name() {
        let doc = json!({"name": "Jane Smith", "firstName": "J", "lastName": "S"});
        assert_eq!(display_name(&doc), Some("Jane Smith".to_string()));
    }

    #[test]
    fn test_display_name_legacy_first_last() {
        let doc = json!({"firstName": "Jane", "lastName": "Smith"});
        assert_eq!(display_name(&doc), Some("Jane Smith".to_string()));
        let doc = json!({"firstName": "Jane"});
        assert_eq!(display_name(&doc), Some("Jane".to_string()));
    }

    #[test]
    fn test_display_name_company_and_email_fallback() {
        assert_eq!(
            display_name(&json!({"company": "Acme"})),
            Some("Acme".to_string())
        );
        assert_eq!(
            display_name(&json!({"email": "x@y.z"})),
            Some("x@y.z".to_string())
        );
        assert_eq!(display_name(&json!({"phone": "555"})), None);
    }

    #[test]
    fn test_client_display_variants() {
        assert_eq!(
            client_display(&json!({"clientName": "Acme"})),
            Some("Acme".to_string())
        );
        assert_eq!(
            client_display(&json!({"client": {"name": "Acme"}})),
            Some("Acme".to_string())
        );
        assert_eq!(
            client_display(&json!({"client": "Acme"})),
            Some("Acme".to_string())
        );
        assert_eq!(client_display(&json!({"clientId": "c1"})), None);
    }

    #[test]
    fn test_availability_dates_legacy_key() {
        let modern = json!({"availableDates": ["2025-03-01", "2025-03-02"]});
        let legacy = json!({"dates": ["2025-03-01"]});
        assert_eq!(availability_dates(&modern).len(), 2);
        assert_eq!(availability_dates(&legacy), vec!["2025-03-01"]);
        assert!(availability_dates(&json!({})).is_empty());
    }

    #[test]
    fn test_availability_dates_skips_non_strings() {
        let doc = json!({"availableDates": ["2025-03-01", 42, null, ""]});
        assert_eq!(availability_dates(&doc), vec!["2025-03-01"]);
    }

    #[test]
    fn test_show_date_span() {
        let show = json!({"startDate": "2025-03-01", "endDate": "2025-03-03"});
        assert_eq!(
            show_date_span(&show),
            Some(("2025-03-01".to_string(), "2025-03-03".to_string()))
        );
        let open_ended = json!({"startDate": "2025-03-01"});
        assert_eq!(
            show_date_span(&open_ended),
            Some(("2025-03-01".to_string(), "2025-03-01".to_string()))
        );
        let legacy = json!({"date": "2025-03-05"});
        assert_eq!(
            show_date_span(&legacy),
            Some(("2025-03-05".to_string(), "2025-03-05".to_string()))
        );
        assert_eq!(show_date_span(&json!({"venue": "Hall A"})), None);
    }
}
