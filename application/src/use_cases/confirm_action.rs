//! Apply a confirmed pending action.
//!
//! This is the only path by which an envelope mutates state: `Create`
//! inserts the envelope's full record, `Update` applies the envelope's
//! `data.updates` as a partial update to `data.id`.

use std::sync::Arc;

use crewcall_domain::{DispatchError, PendingAction, WriteKind, sanitize_for_display};
use serde_json::Value;
use tracing::info;

use crate::ports::document_store::DocumentStorePort;

pub struct ConfirmActionUseCase {
    store: Arc<dyn DocumentStorePort>,
}

impl ConfirmActionUseCase {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    /// Perform the deferred write and return the sanitized stored document.
    pub async fn execute(&self, action: PendingAction) -> Result<Value, DispatchError> {
        let collection = action.action_type.collection.clone();
        info!(action_id = %action.id, collection = %collection, "confirming pending action");

        let stored = match action.action_type.kind {
            WriteKind::Create => self.store.create(&collection, action.data).await?,
            WriteKind::Update => {
                let id = action
                    .data
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        DispatchError::Validation("update envelope is missing data.id".to_string())
                    })?
                    .to_string();
                let updates = action.data.get("updates").cloned().ok_or_else(|| {
                    DispatchError::Validation("update envelope is missing data.updates".to_string())
                })?;
                if !updates.is_object() {
                    return Err(DispatchError::Validation(
                        "update envelope's data.updates must be an object".to_string(),
                    ));
                }
                self.store.update(&collection, &id, updates).await?
            }
        };

        Ok(sanitize_for_display(&stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::InMemoryStore;
    use crewcall_domain::ActionType;
    use serde_json::json;

    #[tokio::test]
    async fn test_confirm_create_inserts_record() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = ConfirmActionUseCase::new(store.clone());
        let action = PendingAction::new(
            ActionType::create("clients"),
            "Create Acme",
            "Created Acme",
            json!({"name": "Acme", "phone": "555"}),
            1,
        );
        let stored = use_case.execute(action).await.unwrap();
        assert_eq!(stored["name"], "Acme");
        assert!(stored["id"].is_string());
        assert_eq!(store.get_all("clients", true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_update_applies_partial_update() {
        let store = Arc::new(
            InMemoryStore::new()
                .seed("staff", vec![json!({"id": "s1", "name": "Jon", "role": "Model"})]),
        );
        let use_case = ConfirmActionUseCase::new(store);
        let action = PendingAction::new(
            ActionType::update("staff"),
            "Update Jon",
            "Updated Jon",
            json!({"id": "s1", "updates": {"role": "Lead"}}),
            1,
        );
        let stored = use_case.execute(action).await.unwrap();
        assert_eq!(stored["role"], "Lead");
        assert_eq!(stored["name"], "Jon");
    }

    #[tokio::test]
    async fn test_malformed_update_envelope_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = ConfirmActionUseCase::new(store);
        let action = PendingAction::new(
            ActionType::update("staff"),
            "Update",
            "Updated",
            json!({"updates": {"role": "Lead"}}),
            1,
        );
        let err = use_case.execute(action).await.unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
    }
}
