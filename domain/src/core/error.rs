//! Domain error types

use thiserror::Error;

/// Errors raised while dispatching a tool call.
///
/// Every variant carries a message that is safe to surface verbatim in a
/// chat response. `NotFound` embeds the "did you mean" suggestion clause
/// when candidates exist; `UnknownOperation` indicates a catalog/dispatcher
/// mismatch and should be treated as a programming error rather than a
/// user-facing retry case.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl DispatchError {
    /// Build a not-found error for a named lookup, appending up to three
    /// candidate names as a "did you mean" clause when any exist.
    pub fn not_found_with_suggestions(
        kind: &str,
        name: &str,
        suggestions: &[String],
    ) -> Self {
        if suggestions.is_empty() {
            Self::NotFound(format!("No {kind} found matching \"{name}\""))
        } else {
            Self::NotFound(format!(
                "No {kind} found matching \"{name}\" (did you mean: {}?)",
                suggestions.join(", ")
            ))
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
