//! Allow-listed staff field normalization.
//!
//! Staff updates arrive from a language model that paraphrases field names
//! ("wage", "shoe size") and embeds values in free text ("pay rate: 25").
//! Every by-name staff update path runs through [`normalize_staff_updates`],
//! which guarantees:
//!
//! - only fields on the fixed allow-list are ever written — an update can
//!   never introduce a new field on the document
//! - colloquial keys are mapped to canonical names via the alias table
//! - a `payRate` value is extracted from free text or a currency-prefixed
//!   string, and discarded unless it parses to a finite number
//! - `shoeSize`/`dressSize` are redirected into the nested
//!   `applicationFormData` object when the top level lacks the field,
//!   matching how legacy records stored them
//! - values structurally equal to the current document are dropped, so a
//!   no-op update never reaches the confirmation step

use serde_json::{Map, Value};

use crate::document::fields::is_blank;

/// Fields a staff update may write. Everything else is silently dropped.
pub const STAFF_UPDATE_ALLOWLIST: &[&str] = &[
    "name",
    "email",
    "phone",
    "role",
    "skills",
    "payRate",
    "badges",
    "image",
    "notes",
    "height",
    "shoeSize",
    "dressSize",
    "applicationFormData",
    "applicationFormApproved",
    "applicationFormCompleted",
    "interviewFormApproved",
    "interviewFormCompleted",
];

/// Colloquial key → canonical field name.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("payrate", "payRate"),
    ("pay rate", "payRate"),
    ("pay_rate", "payRate"),
    ("wage", "payRate"),
    ("rate", "payRate"),
    ("hourly rate", "payRate"),
    ("shoe size", "shoeSize"),
    ("shoe_size", "shoeSize"),
    ("dress size", "dressSize"),
    ("dress_size", "dressSize"),
    ("phone number", "phone"),
    ("e-mail", "email"),
    ("email address", "email"),
    ("skill", "skills"),
    ("badge", "badges"),
    ("photo", "image"),
];

/// Resolve a proposed key to its canonical allow-listed field name.
pub fn canonical_staff_field(key: &str) -> Option<&'static str> {
    let needle = key.trim().to_lowercase();
    if let Some((_, canonical)) = FIELD_ALIASES.iter().find(|(alias, _)| *alias == needle) {
        return Some(canonical);
    }
    STAFF_UPDATE_ALLOWLIST
        .iter()
        .find(|field| field.eq_ignore_ascii_case(&needle))
        .copied()
}

/// Extract an hourly pay rate from a proposed value.
///
/// Accepts plain numbers, currency-prefixed strings (`"$25/hr"`) and the
/// `"pay rate: N"` pattern inside free text. Returns `None` unless the
/// result is a finite number.
pub fn parse_pay_rate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let lower = s.to_lowercase();
            let tail = match lower.find("pay rate") {
                Some(pos) => &lower[pos + "pay rate".len()..],
                None => lower.as_str(),
            };
            let cleaned: String = tail
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Compute the minimal, allow-listed update payload for a staff document.
///
/// Returns an empty map when nothing would change.
pub fn normalize_staff_updates(
    updates: &Map<String, Value>,
    current: &Map<String, Value>,
) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, proposed) in updates {
        let Some(field) = canonical_staff_field(key) else {
            continue;
        };
        if is_blank(proposed) {
            continue;
        }

        let value = if field == "payRate" {
            match parse_pay_rate(proposed) {
                Some(rate) => Value::from(rate),
                None => continue,
            }
        } else {
            proposed.clone()
        };

        // Legacy records keep sizes inside applicationFormData; only write
        // the top-level field when the document already has one.
        if matches!(field, "shoeSize" | "dressSize") && !current.contains_key(field) {
            let existing_form = current
                .get("applicationFormData")
                .and_then(Value::as_object);
            if existing_form.and_then(|form| form.get(field)) == Some(&value) {
                continue;
            }
            let mut form = out
                .get("applicationFormData")
                .and_then(Value::as_object)
                .cloned()
                .or_else(|| existing_form.cloned())
                .unwrap_or_default();
            form.insert(field.to_string(), value);
            out.insert("applicationFormData".to_string(), Value::Object(form));
            continue;
        }

        if current.get(field) == Some(&value) {
            continue;
        }
        out.insert(field.to_string(), value);
    }

    out
}
