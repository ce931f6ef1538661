//! Tool domain value objects — dispatch outcomes and pending actions.
//!
//! A mutating tool call never writes directly. It produces a
//! [`PendingAction`] envelope that the UI renders as a confirm button; the
//! write happens only when the envelope's `data` is explicitly submitted
//! back through the store. The envelope is ephemeral — nothing is
//! persisted while it is in flight, and discarding it discards the write.
//!
//! [`DispatchOutcome`] is the tagged union every handler returns. The
//! historical integration contract used sentinel keys (`__ui`, `__action`)
//! on loose objects; [`DispatchOutcome::into_value`] still emits exactly
//! those wire shapes, but in-process callers pattern-match the enum
//! exhaustively instead of probing for keys.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Whether a pending action creates a new document or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteKind {
    Create,
    Update,
}

impl WriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Create => "create",
            WriteKind::Update => "update",
        }
    }
}

/// The kind of write a pending action performs, and the collection it
/// targets. Confirmation uses this to route `data` back into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionType {
    pub kind: WriteKind,
    pub collection: String,
}

impl ActionType {
    pub fn create(collection: impl Into<String>) -> Self {
        Self {
            kind: WriteKind::Create,
            collection: collection.into(),
        }
    }

    pub fn update(collection: impl Into<String>) -> Self {
        Self {
            kind: WriteKind::Update,
            collection: collection.into(),
        }
    }

    /// Wire identifier, e.g. `update_booking` for updates to `bookings`.
    pub fn type_str(&self) -> String {
        format!("{}_{}", self.kind.as_str(), singular(&self.collection))
    }
}

fn singular(collection: &str) -> &str {
    match collection {
        "bookings" => "booking",
        "staff" => "staff",
        "clients" => "client",
        "shows" => "show",
        "availability" => "availability",
        other => other.strip_suffix('s').unwrap_or(other),
    }
}

/// A proposed write awaiting explicit confirmation.
///
/// For `Update` actions, `data` is `{id, updates}` and confirmation
/// applies `updates` as a partial update to `id`. For `Create` actions,
/// `data` is the full record to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Unique envelope id: `<type>_<timestamp-millis>`
    pub id: String,
    pub action_type: ActionType,
    /// Button label, e.g. "Update Jane Smith"
    pub label: String,
    /// Message shown after the write is applied
    pub success_message: String,
    /// The write payload
    pub data: Value,
}

impl PendingAction {
    pub fn new(
        action_type: ActionType,
        label: impl Into<String>,
        success_message: impl Into<String>,
        data: Value,
        timestamp_millis: i64,
    ) -> Self {
        let id = format!("{}_{}", action_type.type_str(), timestamp_millis);
        Self {
            id,
            action_type,
            label: label.into(),
            success_message: success_message.into(),
            data,
        }
    }
}

/// Before/after preview rendered next to the confirm button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub current: Value,
    pub updates: Value,
}

/// A pending action plus its confirmation prompt and preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub action: PendingAction,
    /// Confirmation prompt, e.g. "Update Jane Smith's role to Lead?"
    pub message: String,
    pub preview: Option<Preview>,
}

/// Hint for rendering a read result as rich cards instead of plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct UiHint {
    /// Renderer kind, e.g. "booking_list"
    pub kind: String,
    pub items: Value,
}

/// Result of dispatching a tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Plain sanitized data from a read (or an immediately-applied write)
    Data(Value),
    /// Read result with a rich-rendering hint alongside the plain data
    Rendered { ui: UiHint, data: Value },
    /// A proposed write diffed down to nothing
    NoOp { message: String },
    /// A proposed write awaiting confirmation
    Pending(PendingWrite),
}

impl DispatchOutcome {
    pub fn rendered(kind: impl Into<String>, items: Value, data: Value) -> Self {
        Self::Rendered {
            ui: UiHint {
                kind: kind.into(),
                items,
            },
            data,
        }
    }

    pub fn no_op(message: impl Into<String>) -> Self {
        Self::NoOp {
            message: message.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The pending action, if this outcome proposes a write.
    pub fn pending_action(&self) -> Option<&PendingAction> {
        match self {
            Self::Pending(pw) => Some(&pw.action),
            _ => None,
        }
    }

    /// Convert to the wire shape consumed by the chat UI:
    /// plain data, `{__ui, data}`, `{message, updates: {}}`, or
    /// `{__action, message, preview}`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Data(v) => v,
            Self::Rendered { ui, data } => json!({
                "__ui": {"type": ui.kind, "items": ui.items},
                "data": data,
            }),
            Self::NoOp { message } => json!({
                "message": message,
                "updates": {},
            }),
            Self::Pending(pw) => {
                let mut out = json!({
                    "__action": {
                        "id": pw.action.id,
                        "type": pw.action.action_type.type_str(),
                        "label": pw.action.label,
                        "successMessage": pw.action.success_message,
                        "data": pw.action.data,
                    },
                    "message": pw.message,
                });
                if let Some(preview) = pw.preview {
                    out["preview"] = json!({
                        "current": preview.current,
                        "updates": preview.updates,
                    });
                }
                out
            }
        }
    }
}
