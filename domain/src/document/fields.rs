//! Typed field accessors for JSON documents.

use serde_json::Value;

/// Get a string field, treating non-strings as absent.
pub fn field_str<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

/// Get a string field that is present and non-empty.
pub fn non_empty_str<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    field_str(doc, key).filter(|s| !s.trim().is_empty())
}

/// Get an array field, treating non-arrays as absent.
pub fn field_array<'a>(doc: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    doc.get(key).and_then(Value::as_array)
}

/// The document id tag. Every stored document is tagged with its id on read.
pub fn doc_id(doc: &Value) -> Option<&str> {
    field_str(doc, "id")
}

/// A value counts as blank when it is null or an empty/whitespace string.
/// Blank proposed values are dropped from update payloads.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
