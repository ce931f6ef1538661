//! Write handlers.
//!
//! Direct-id updates and batch creation apply immediately. Everything else
//! resolves names, diffs the proposal against the current document, and
//! returns either a "no changes detected" message or a pending envelope —
//! the store is never touched until the envelope is confirmed.

use chrono::Utc;
use crewcall_domain::document::fields::{doc_id, is_blank};
use crewcall_domain::staffing::booking::{build_dates_needed, patch_date_row};
use crewcall_domain::staffing::field_rules::normalize_staff_updates;
use crewcall_domain::{
    ActionType, DispatchError, DispatchOutcome, PendingAction, PendingWrite, Preview, ToolCall,
    client_display, display_name, sanitize_for_display, show_display,
};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::ports::document_store::{BatchWrite, DocumentStorePort};
use crate::use_cases::resolve::{resolve_booking, resolve_named};

use super::ToolDispatcher;

const COLLECTIONS: &[&str] = &["bookings", "staff", "clients", "shows", "availability"];

/// Fields an update may never touch.
const PROTECTED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt"];

const NO_CHANGES: &str = "No changes detected";

fn kind_label(collection: &str) -> &'static str {
    match collection {
        "bookings" => "booking",
        "staff" => "staff member",
        "clients" => "client",
        "shows" => "show",
        "availability" => "availability record",
        _ => "record",
    }
}

fn require_collection(call: &ToolCall) -> Result<&str, DispatchError> {
    let collection = call
        .require_string("collection")
        .map_err(DispatchError::Validation)?;
    if !COLLECTIONS.contains(&collection) {
        return Err(DispatchError::Validation(format!(
            "unknown collection \"{collection}\""
        )));
    }
    Ok(collection)
}

fn require_updates(call: &ToolCall) -> Result<&Map<String, Value>, DispatchError> {
    call.get_object("updates")
        .ok_or_else(|| DispatchError::Validation("updates must be an object".to_string()))
}

/// Minimal generic update payload: blank proposals, protected fields and
/// values structurally equal to the current document are dropped.
fn minimal_updates(
    proposed: &Map<String, Value>,
    current: &Map<String, Value>,
) -> Map<String, Value> {
    proposed
        .iter()
        .filter(|(k, _)| !PROTECTED_FIELDS.contains(&k.as_str()))
        .filter(|(_, v)| !is_blank(v))
        .filter(|(k, v)| current.get(k.as_str()) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn pending_create(collection: &str, label_name: &str, record: Value) -> DispatchOutcome {
    let action = PendingAction::new(
        ActionType::create(collection),
        format!("Create {label_name}"),
        format!("Created {label_name}"),
        record,
        Utc::now().timestamp_millis(),
    );
    DispatchOutcome::Pending(PendingWrite {
        message: format!("Create {label_name}?"),
        preview: None,
        action,
    })
}

fn pending_update(
    collection: &str,
    current: &Value,
    updates: Map<String, Value>,
    label_name: &str,
) -> Result<DispatchOutcome, DispatchError> {
    let id = doc_id(current).ok_or_else(|| {
        DispatchError::Store(format!("{} document missing id", kind_label(collection)))
    })?;
    let field_count = updates.len();
    let updates = Value::Object(updates);
    let action = PendingAction::new(
        ActionType::update(collection),
        format!("Update {label_name}"),
        format!("Updated {label_name}"),
        json!({"id": id, "updates": updates.clone()}),
        Utc::now().timestamp_millis(),
    );
    Ok(DispatchOutcome::Pending(PendingWrite {
        message: format!("Update {label_name}? {field_count} field(s) will change."),
        preview: Some(Preview {
            current: sanitize_for_display(current),
            updates,
        }),
        action,
    }))
}

fn booking_label(booking: &Value) -> String {
    match (client_display(booking), show_display(booking)) {
        (Some(client), Some(show)) => format!("booking {client} — {show}"),
        _ => format!("booking {}", doc_id(booking).unwrap_or("?")),
    }
}

impl ToolDispatcher {
    /// `update_staff` / `update_client` / `update_show`: the caller named
    /// an exact id, so the write applies immediately.
    pub(super) async fn op_direct_update(
        &self,
        collection: &str,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let id = call.require_string("id").map_err(DispatchError::Validation)?;
        let updates = require_updates(call)?;
        if self.store.get_by_id(collection, id).await?.is_none() {
            return Err(DispatchError::NotFound(format!(
                "No {} found with id \"{id}\"",
                kind_label(collection)
            )));
        }
        let stored = self
            .store
            .update(collection, id, Value::Object(updates.clone()))
            .await?;
        debug!(collection, id, "direct update applied");
        Ok(DispatchOutcome::Data(sanitize_for_display(&stored)))
    }

    pub(super) async fn op_batch_create(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let records = call
            .get_array("records")
            .ok_or_else(|| DispatchError::Validation("records must be an array".to_string()))?;
        let mut writes = Vec::with_capacity(records.len());
        for record in records {
            let collection = record
                .get("collection")
                .and_then(Value::as_str)
                .filter(|c| COLLECTIONS.contains(c))
                .ok_or_else(|| {
                    DispatchError::Validation(
                        "each record needs a known collection".to_string(),
                    )
                })?;
            let data = record
                .get("data")
                .filter(|d| d.is_object())
                .ok_or_else(|| {
                    DispatchError::Validation("each record needs a data object".to_string())
                })?;
            writes.push(BatchWrite::Create {
                collection: collection.to_string(),
                data: data.clone(),
            });
        }
        let stored = self.store.batch(writes).await?;
        Ok(DispatchOutcome::Data(Value::Array(
            stored.iter().map(sanitize_for_display).collect(),
        )))
    }

    pub(super) async fn op_create_booking(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        // Validation comes before any store access.
        let rows = build_dates_needed(
            call.get_non_empty("assignedDate"),
            call.get_u64("staffCount"),
            call.arguments.get("datesNeeded"),
        )?;
        let client_name = call
            .require_string("clientName")
            .map_err(DispatchError::Validation)?;
        let show_name = call
            .require_string("showName")
            .map_err(DispatchError::Validation)?;

        let limit = self.config.suggestion_limit;
        let client =
            resolve_named(self.store.as_ref(), "clients", "client", client_name, limit).await?;
        let show = resolve_named(self.store.as_ref(), "shows", "show", show_name, limit).await?;
        let client_label = display_name(&client).unwrap_or_else(|| client_name.to_string());
        let show_label = display_name(&show).unwrap_or_else(|| show_name.to_string());

        let mut record = json!({
            "clientId": doc_id(&client),
            "clientName": client_label,
            "showId": doc_id(&show),
            "showName": show_label,
            "datesNeeded": rows,
            "status": call.get_non_empty("status").unwrap_or("pending"),
        });
        if let Some(notes) = call.get_non_empty("notes") {
            record["notes"] = json!(notes);
        }

        Ok(pending_create(
            "bookings",
            &format!("booking for {client_label} — {show_label}"),
            record,
        ))
    }

    pub(super) async fn op_create_staff(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        let mut record = json!({"name": name});
        for field in ["email", "phone", "role", "notes"] {
            if let Some(value) = call.get_non_empty(field) {
                record[field] = json!(value);
            }
        }
        let skills = call.get_string_array("skills");
        if !skills.is_empty() {
            record["skills"] = json!(skills);
        }
        if let Some(rate) = call.arguments.get("payRate").filter(|v| v.is_number()) {
            record["payRate"] = rate.clone();
        }
        Ok(pending_create("staff", &format!("staff member \"{name}\""), record))
    }

    pub(super) async fn op_create_client(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.get_non_empty("name");
        let company = call.get_non_empty("company");
        let label = name.or(company).ok_or_else(|| {
            DispatchError::Validation("a client needs a name or a company".to_string())
        })?;

        let mut record = Map::new();
        for field in ["name", "company", "email", "phone", "notes"] {
            if let Some(value) = call.get_non_empty(field) {
                record.insert(field.to_string(), json!(value));
            }
        }
        Ok(pending_create(
            "clients",
            &format!("client \"{label}\""),
            Value::Object(record),
        ))
    }

    pub(super) async fn op_create_show(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        let mut record = json!({"name": name});
        for field in ["startDate", "endDate", "venue", "status"] {
            if let Some(value) = call.get_non_empty(field) {
                record[field] = json!(value);
            }
        }
        Ok(pending_create("shows", &format!("show \"{name}\""), record))
    }

    pub(super) async fn op_update_staff_by_name(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        self.staff_update_envelope(name, require_updates(call)?).await
    }

    pub(super) async fn op_update_mentioned_staff(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mention = call.require_string("mention").map_err(DispatchError::Validation)?;
        let name = mention.trim().trim_start_matches('@');
        self.staff_update_envelope(name, require_updates(call)?).await
    }

    /// Shared by every by-name staff path: resolve, normalize through the
    /// allow-list, drop no-ops, envelope the rest.
    async fn staff_update_envelope(
        &self,
        name: &str,
        updates: &Map<String, Value>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let limit = self.config.suggestion_limit;
        let current =
            resolve_named(self.store.as_ref(), "staff", "staff member", name, limit).await?;
        let current_obj = current.as_object().ok_or_else(|| {
            DispatchError::Store("staff document is not an object".to_string())
        })?;
        let normalized = normalize_staff_updates(updates, current_obj);
        if normalized.is_empty() {
            return Ok(DispatchOutcome::no_op(NO_CHANGES));
        }
        let label = display_name(&current).unwrap_or_else(|| name.to_string());
        pending_update("staff", &current, normalized, &label)
    }

    pub(super) async fn op_update_client_by_name(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        let limit = self.config.suggestion_limit;
        let current =
            resolve_named(self.store.as_ref(), "clients", "client", name, limit).await?;
        self.generic_update_envelope("clients", current, require_updates(call)?)
    }

    pub(super) async fn op_update_mentioned_show(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mention = call.require_string("mention").map_err(DispatchError::Validation)?;
        let name = mention.trim().trim_start_matches('@');
        let limit = self.config.suggestion_limit;
        let current =
            resolve_named(self.store.as_ref(), "shows", "show", name, limit).await?;
        self.generic_update_envelope("shows", current, require_updates(call)?)
    }

    pub(super) async fn op_update_booking(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let id = call.require_string("id").map_err(DispatchError::Validation)?;
        let current = self
            .store
            .get_by_id("bookings", id)
            .await?
            .ok_or_else(|| {
                DispatchError::NotFound(format!("No booking found with id \"{id}\""))
            })?;
        self.booking_envelope(current, call)
    }

    pub(super) async fn op_update_booking_by_names(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let client_name = call
            .require_string("clientName")
            .map_err(DispatchError::Validation)?;
        let show_name = call
            .require_string("showName")
            .map_err(DispatchError::Validation)?;
        let limit = self.config.suggestion_limit;
        let current =
            resolve_booking(self.store.as_ref(), client_name, show_name, limit).await?;
        self.booking_envelope(current, call)
    }

    /// With a `date` argument the updates patch one `datesNeeded` row;
    /// otherwise they diff against the booking's top-level fields.
    fn booking_envelope(
        &self,
        current: Value,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let updates = require_updates(call)?;
        let label = booking_label(&current);

        if let Some(date) = call.get_non_empty("date") {
            let empty = json!([]);
            let rows = current.get("datesNeeded").unwrap_or(&empty);
            let patched = patch_date_row(rows, date, updates);
            if Some(&patched) == current.get("datesNeeded") {
                return Ok(DispatchOutcome::no_op(NO_CHANGES));
            }
            let mut payload = Map::new();
            payload.insert("datesNeeded".to_string(), patched);
            return pending_update("bookings", &current, payload, &label);
        }

        let current_obj = current.as_object().ok_or_else(|| {
            DispatchError::Store("booking document is not an object".to_string())
        })?;
        let normalized = minimal_updates(updates, current_obj);
        if normalized.is_empty() {
            return Ok(DispatchOutcome::no_op(NO_CHANGES));
        }
        pending_update("bookings", &current, normalized, &label)
    }

    pub(super) async fn op_update_record(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let collection = require_collection(call)?;
        let id = call.require_string("id").map_err(DispatchError::Validation)?;
        let current = self.store.get_by_id(collection, id).await?.ok_or_else(|| {
            DispatchError::NotFound(format!(
                "No {} found with id \"{id}\"",
                kind_label(collection)
            ))
        })?;
        self.record_envelope(collection, current, require_updates(call)?)
    }

    pub(super) async fn op_update_record_by_name(
        &self,
        call: &ToolCall,
    ) -> Result<DispatchOutcome, DispatchError> {
        let collection = require_collection(call)?;
        let name = call.require_string("name").map_err(DispatchError::Validation)?;
        let current = resolve_named(
            self.store.as_ref(),
            collection,
            kind_label(collection),
            name,
            self.config.suggestion_limit,
        )
        .await?;
        self.record_envelope(collection, current, require_updates(call)?)
    }

    /// Staff records keep their allow-list semantics even through the
    /// generic record paths.
    fn record_envelope(
        &self,
        collection: &str,
        current: Value,
        updates: &Map<String, Value>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let current_obj = current.as_object().ok_or_else(|| {
            DispatchError::Store(format!(
                "{} document is not an object",
                kind_label(collection)
            ))
        })?;
        let normalized = if collection == "staff" {
            normalize_staff_updates(updates, current_obj)
        } else {
            minimal_updates(updates, current_obj)
        };
        if normalized.is_empty() {
            return Ok(DispatchOutcome::no_op(NO_CHANGES));
        }
        let label = match collection {
            "bookings" => booking_label(&current),
            _ => display_name(&current)
                .unwrap_or_else(|| doc_id(&current).unwrap_or("?").to_string()),
        };
        pending_update(collection, &current, normalized, &label)
    }

    fn generic_update_envelope(
        &self,
        collection: &str,
        current: Value,
        updates: &Map<String, Value>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let current_obj = current.as_object().ok_or_else(|| {
            DispatchError::Store(format!(
                "{} document is not an object",
                kind_label(collection)
            ))
        })?;
        let normalized = minimal_updates(updates, current_obj);
        if normalized.is_empty() {
            return Ok(DispatchOutcome::no_op(NO_CHANGES));
        }
        let label = display_name(&current)
            .unwrap_or_else(|| doc_id(&current).unwrap_or("?").to_string());
        pending_update(collection, &current, normalized, &label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::confirm_action::ConfirmActionUseCase;
    use crate::use_cases::test_support::InMemoryStore;
    use crewcall_domain::staffing::field_rules::STAFF_UPDATE_ALLOWLIST;
    use std::sync::Arc;

    fn seeded_store() -> Arc<InMemoryStore> {
        Arc::new(
            InMemoryStore::new()
                .seed(
                    "staff",
                    vec![json!({"id": "s1", "name": "Jon Smith", "role": "Model", "phone": "555"})],
                )
                .seed(
                    "clients",
                    vec![json!({"id": "c1", "name": "Acme", "phone": "111"})],
                )
                .seed(
                    "shows",
                    vec![json!({"id": "sh1", "name": "Spring Gala", "venue": "Hall A"})],
                )
                .seed(
                    "bookings",
                    vec![json!({
                        "id": "b1",
                        "clientName": "Acme",
                        "showName": "Spring Gala",
                        "datesNeeded": [
                            {"date": "2025-03-01", "staffCount": 2, "staffIds": ["s1"]},
                            {"date": "2025-03-02", "staffCount": 1, "staffIds": []},
                        ],
                    })],
                ),
        )
    }

    fn dispatcher(store: Arc<InMemoryStore>) -> ToolDispatcher {
        ToolDispatcher::new(store)
    }

    #[tokio::test]
    async fn test_staff_update_diff_stays_inside_allowlist() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "jon smith")
            .with_arg(
                "updates",
                json!({"role": "Lead", "wage": "$30/hr", "favoriteColor": "blue", "id": "hax"}),
            );
        let outcome = d.execute(&call).await.unwrap();
        let action = outcome.pending_action().expect("expected an envelope");
        let updates = action.data["updates"].as_object().unwrap();
        assert_eq!(updates["role"], "Lead");
        assert_eq!(updates["payRate"], json!(30.0));
        for key in updates.keys() {
            assert!(STAFF_UPDATE_ALLOWLIST.contains(&key.as_str()), "{key}");
        }
        assert!(action.id.starts_with("update_staff_"));
    }

    #[tokio::test]
    async fn test_identical_update_is_noop_without_action() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "Jon Smith")
            .with_arg("updates", json!({"role": "Model", "phone": ""}));
        let wire = d.execute(&call).await.unwrap().into_value();
        assert!(wire.get("__action").is_none());
        assert_eq!(wire["message"], NO_CHANGES);
        assert_eq!(wire["updates"], json!({}));
    }

    #[tokio::test]
    async fn test_misspelled_name_raises_suggestions() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "Jon Smth")
            .with_arg("updates", json!({"role": "Lead"}));
        let err = d.execute(&call).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Jon Smith"), "{err}");
    }

    #[tokio::test]
    async fn test_booking_date_row_patch_scenario() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_booking_by_names")
            .with_arg("clientName", "Acme")
            .with_arg("showName", "Spring Gala")
            .with_arg("date", "2025-03-01")
            .with_arg("updates", json!({"staffIds": ["s1", "s2"]}));
        let wire = d.execute(&call).await.unwrap().into_value();
        let rows = &wire["__action"]["data"]["updates"]["datesNeeded"];
        assert_eq!(rows[0]["staffIds"], json!(["s1", "s2"]));
        assert_eq!(rows[0]["staffCount"], 2);
        // Other date rows untouched
        assert_eq!(rows[1]["date"], "2025-03-02");
        assert_eq!(rows[1]["staffIds"], json!([]));
        assert_eq!(wire["__action"]["type"], "update_booking");
    }

    #[tokio::test]
    async fn test_create_booking_without_dates_is_validation_error() {
        let store = seeded_store();
        let d = dispatcher(store.clone());
        let call = ToolCall::new("create_booking")
            .with_arg("clientName", "Acme")
            .with_arg("showName", "Spring Gala");
        let err = d.execute(&call).await.unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
        // Nothing was written
        assert_eq!(store.get_all("bookings", true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_booking_resolves_names_into_record() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("create_booking")
            .with_arg("clientName", "acme")
            .with_arg("showName", "spring gala")
            .with_arg("assignedDate", "2025-04-01")
            .with_arg("staffCount", 3);
        let outcome = d.execute(&call).await.unwrap();
        let action = outcome.pending_action().unwrap();
        assert_eq!(action.data["clientId"], "c1");
        assert_eq!(action.data["showId"], "sh1");
        assert_eq!(action.data["status"], "pending");
        assert_eq!(
            action.data["datesNeeded"],
            json!([{"date": "2025-04-01", "staffCount": 3, "staffIds": []}])
        );
        assert!(action.id.starts_with("create_booking_"));
    }

    #[tokio::test]
    async fn test_sequential_identical_updates_second_is_noop() {
        let store = seeded_store();
        let d = dispatcher(store.clone());
        let call = ToolCall::new("update_client_by_name")
            .with_arg("name", "Acme")
            .with_arg("updates", json!({"phone": "999"}));

        let first = d.execute(&call).await.unwrap();
        let action = first.pending_action().unwrap().clone();
        ConfirmActionUseCase::new(store)
            .execute(action)
            .await
            .unwrap();

        let second = d.execute(&call).await.unwrap();
        let wire = second.into_value();
        assert!(wire.get("__action").is_none());
        assert_eq!(wire["message"], NO_CHANGES);
    }

    #[tokio::test]
    async fn test_direct_update_applies_immediately() {
        let store = seeded_store();
        let d = dispatcher(store.clone());
        let call = ToolCall::new("update_staff")
            .with_arg("id", "s1")
            .with_arg("updates", json!({"role": "Lead"}));
        let DispatchOutcome::Data(doc) = d.execute(&call).await.unwrap() else {
            panic!("expected immediate data");
        };
        assert_eq!(doc["role"], "Lead");
        let stored = store.get_by_id("staff", "s1").await.unwrap().unwrap();
        assert_eq!(stored["role"], "Lead");
    }

    #[tokio::test]
    async fn test_direct_update_unknown_id_not_found() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_client")
            .with_arg("id", "nope")
            .with_arg("updates", json!({"phone": "1"}));
        let err = d.execute(&call).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_batch_create_applies_immediately() {
        let store = seeded_store();
        let d = dispatcher(store.clone());
        let call = ToolCall::new("batch_create").with_arg(
            "records",
            json!([
                {"collection": "clients", "data": {"name": "Globex"}},
                {"collection": "shows", "data": {"name": "Winter Expo"}},
            ]),
        );
        let DispatchOutcome::Data(rows) = d.execute(&call).await.unwrap() else {
            panic!("expected immediate data");
        };
        assert_eq!(rows.as_array().unwrap().len(), 2);
        assert_eq!(store.get_all("clients", true).await.unwrap().len(), 2);
        assert_eq!(store.get_all("shows", true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_client_needs_name_or_company() {
        let d = dispatcher(seeded_store());
        let err = d
            .execute(&ToolCall::new("create_client"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));

        let call = ToolCall::new("create_client").with_arg("company", "Globex Corp");
        let outcome = d.execute(&call).await.unwrap();
        assert!(outcome.is_pending());
    }

    #[tokio::test]
    async fn test_mentioned_staff_strips_mention_marker() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_mentioned_staff")
            .with_arg("mention", "@Jon Smith")
            .with_arg("updates", json!({"role": "Lead"}));
        let outcome = d.execute(&call).await.unwrap();
        assert!(outcome.is_pending());
    }

    #[tokio::test]
    async fn test_update_record_routes_staff_through_allowlist() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_record")
            .with_arg("collection", "staff")
            .with_arg("id", "s1")
            .with_arg("updates", json!({"favoriteColor": "blue", "role": "Lead"}));
        let outcome = d.execute(&call).await.unwrap();
        let action = outcome.pending_action().unwrap();
        let updates = action.data["updates"].as_object().unwrap();
        assert!(updates.contains_key("role"));
        assert!(!updates.contains_key("favoriteColor"));
    }

    #[tokio::test]
    async fn test_update_record_rejects_unknown_collection() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_record")
            .with_arg("collection", "invoices")
            .with_arg("id", "x")
            .with_arg("updates", json!({"a": 1}));
        let err = d.execute(&call).await.unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_booking_preview_carries_current_and_updates() {
        let d = dispatcher(seeded_store());
        let call = ToolCall::new("update_booking")
            .with_arg("id", "b1")
            .with_arg("updates", json!({"status": "booked"}));
        let wire = d.execute(&call).await.unwrap().into_value();
        assert_eq!(wire["preview"]["updates"]["status"], "booked");
        assert_eq!(wire["preview"]["current"]["id"], "b1");
        assert_eq!(wire["__action"]["data"], json!({"id": "b1", "updates": {"status": "booked"}}));
    }
}
