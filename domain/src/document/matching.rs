//! Case-insensitive name matching for natural-language references.
//!
//! Users refer to records by partial, mis-cased or colloquial names
//! ("jane", "@JonS", "the acme booking"). Exact resolution tries the
//! strictest strategy first; fuzzy matching backs the "did you mean"
//! suggestion list raised on lookup failure.

use serde_json::Value;

use super::fields::{doc_id, non_empty_str};
use super::shapes::display_name;

fn ci_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn ci_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Case-insensitive exact match on the document's display name.
pub fn matches_exact_name(doc: &Value, query: &str) -> bool {
    display_name(doc).is_some_and(|name| ci_eq(&name, query))
}

/// Exact match on the document id.
pub fn matches_id(doc: &Value, query: &str) -> bool {
    doc_id(doc) == Some(query.trim())
}

/// Substring match on name, company or email.
pub fn matches_substring(doc: &Value, query: &str) -> bool {
    let q = query.trim();
    if q.is_empty() {
        return false;
    }
    display_name(doc).is_some_and(|name| ci_contains(&name, q))
        || non_empty_str(doc, "company").is_some_and(|c| ci_contains(c, q))
        || non_empty_str(doc, "email").is_some_and(|e| ci_contains(e, q))
}

/// Fuzzy match: the query substring appears (case-insensitively) in the
/// document's id, name, company or email.
pub fn fuzzy_matches(doc: &Value, query: &str) -> bool {
    let q = query.trim();
    if q.is_empty() {
        return false;
    }
    doc_id(doc).is_some_and(|id| ci_contains(id, q)) || matches_substring(doc, q)
}

/// Display names of up to `limit` fuzzy matches, deduplicated in order.
pub fn suggestion_names(docs: &[Value], query: &str, limit: usize) -> Vec<String> {
    let mut names = Vec::new();
    for doc in docs {
        if !fuzzy_matches(doc, query) {
            continue;
        }
        if let Some(name) = display_name(doc) {
            if !names.iter().any(|n: &String| ci_eq(n, &name)) {
                names.push(name);
            }
        }
        if names.len() >= limit {
            break;
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_name_ignores_case() {
        let doc = json!({"id": "s1", "name": "Jane Smith"});
        assert!(matches_exact_name(&doc, "jane smith"));
        assert!(matches_exact_name(&doc, "  JANE SMITH "));
        assert!(!matches_exact_name(&doc, "jane"));
    }

    #[test]
    fn test_exact_name_legacy_fields() {
        let doc = json!({"id": "s2", "firstName": "Jon", "lastName": "Smith"});
        assert!(matches_exact_name(&doc, "jon smith"));
    }

    #[test]
    fn test_substring_match_over_company_and_email() {
        let doc = json!({"id": "c1", "name": "Acme", "company": "Acme Corp", "email": "ops@acme.com"});
        assert!(matches_substring(&doc, "corp"));
        assert!(matches_substring(&doc, "OPS@"));
        assert!(!matches_substring(&doc, "globex"));
        assert!(!matches_substring(&doc, ""));
    }

    #[test]
    fn test_fuzzy_includes_id() {
        let doc = json!({"id": "booking_42", "name": "March fill-in"});
        assert!(fuzzy_matches(&doc, "booking_4"));
        assert!(fuzzy_matches(&doc, "march"));
        assert!(!fuzzy_matches(&doc, "april"));
    }

    #[test]
    fn test_fuzzy_excludes_non_matching_docs() {
        let docs = vec![
            json!({"id": "1", "name": "Jon Smith"}),
            json!({"id": "2", "name": "Jane Roe"}),
        ];
        for doc in &docs {
            if fuzzy_matches(doc, "smith") {
                assert_eq!(doc["name"], "Jon Smith");
            }
        }
    }

    #[test]
    fn test_suggestions_capped_and_deduped() {
        let docs = vec![
            json!({"id": "1", "name": "Jon Smith"}),
            json!({"id": "2", "name": "jon smith"}),
            json!({"id": "3", "name": "Jon Smythe"}),
            json!({"id": "4", "name": "Jonas Smit"}),
            json!({"id": "5", "name": "Jane Roe"}),
        ];
        let names = suggestion_names(&docs, "jon", 3);
        assert_eq!(names.len(), 3);
        assert_eq!(names[0], "Jon Smith");
        assert!(!names.contains(&"Jane Roe".to_string()));
    }
}
