//! Name → document resolution shared by the use cases.
//!
//! Exact resolution goes through the store's ordered ladder; on failure a
//! fuzzy pass supplies "did you mean" candidates embedded in the
//! not-found message, capped at the configured suggestion limit. Bookings
//! have no display name of their own, so they resolve on the client/show
//! display-name pair instead.

use crewcall_domain::{DispatchError, client_display, show_display, suggestion_names};
use serde_json::Value;
use tracing::debug;

use crate::ports::document_store::DocumentStorePort;

/// Resolve a name (or id) to a single document, or fail with up to
/// `suggestion_limit` candidates.
///
/// `kind` is the human label used in the error message ("staff member",
/// "client", ...).
pub(crate) async fn resolve_named(
    store: &dyn DocumentStorePort,
    collection: &str,
    kind: &str,
    name: &str,
    suggestion_limit: usize,
) -> Result<Value, DispatchError> {
    if let Some(doc) = store.find_by_name(collection, name).await? {
        return Ok(doc);
    }
    debug!(collection, name, "exact resolution failed, trying fuzzy");
    let candidates = store.find_by_name_fuzzy(collection, name).await?;
    let mut suggestions = suggestion_names(&candidates, name, suggestion_limit);

    // Misspellings ("Jon Smth") defeat whole-query substring matching, so
    // fall back to matching on the individual words of the query.
    if suggestions.is_empty() {
        let all = store.get_all(collection, true).await?;
        for token in name.split_whitespace().filter(|t| t.len() > 1) {
            for candidate in suggestion_names(&all, token, suggestion_limit) {
                if !suggestions.iter().any(|s| s.eq_ignore_ascii_case(&candidate)) {
                    suggestions.push(candidate);
                }
            }
            if suggestions.len() >= suggestion_limit {
                break;
            }
        }
        suggestions.truncate(suggestion_limit);
    }

    Err(DispatchError::not_found_with_suggestions(
        kind,
        name,
        &suggestions,
    ))
}

fn ci_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

fn ci_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Resolve a booking by its client/show display-name pair.
///
/// Tries case-insensitive exact equality on both names, then bidirectional
/// substring containment on both. Suggestions are "Client — Show" labels
/// of bookings overlapping either name.
pub(crate) async fn resolve_booking(
    store: &dyn DocumentStorePort,
    client_name: &str,
    show_name: &str,
    suggestion_limit: usize,
) -> Result<Value, DispatchError> {
    let bookings = store.get_all("bookings", true).await?;

    let exact = bookings.iter().find(|b| {
        client_display(b).is_some_and(|c| ci_eq(&c, client_name))
            && show_display(b).is_some_and(|s| ci_eq(&s, show_name))
    });
    if let Some(b) = exact {
        return Ok(b.clone());
    }

    let loose = bookings.iter().find(|b| {
        client_display(b).is_some_and(|c| ci_overlap(&c, client_name))
            && show_display(b).is_some_and(|s| ci_overlap(&s, show_name))
    });
    if let Some(b) = loose {
        debug!(client_name, show_name, "booking resolved via substring overlap");
        return Ok(b.clone());
    }

    let mut suggestions = Vec::new();
    for b in &bookings {
        let client = client_display(b);
        let show = show_display(b);
        let overlaps = client.as_deref().is_some_and(|c| ci_overlap(c, client_name))
            || show.as_deref().is_some_and(|s| ci_overlap(s, show_name));
        if !overlaps {
            continue;
        }
        let label = format!(
            "{} — {}",
            client.unwrap_or_else(|| "?".to_string()),
            show.unwrap_or_else(|| "?".to_string())
        );
        if !suggestions.contains(&label) {
            suggestions.push(label);
        }
        if suggestions.len() >= suggestion_limit {
            break;
        }
    }

    Err(DispatchError::not_found_with_suggestions(
        "booking",
        &format!("{client_name} / {show_name}"),
        &suggestions,
    ))
}
