//! In-memory [`StoreBackend`].
//!
//! Collections are `BTreeMap`s keyed by id, so iteration order is
//! deterministic. Backs the CLI's seed file and every store test.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use crewcall_application::{BatchWrite, StoreError};
use serde_json::{Value, json};

use super::backend::StoreBackend;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: Mutex<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend from a seed object mapping collection names to
    /// arrays of documents. Documents without an id get a sequential one.
    pub fn from_seed(seed: &Value) -> Result<Self, StoreError> {
        let object = seed.as_object().ok_or_else(|| {
            StoreError::Backend("seed data must be an object of collections".to_string())
        })?;
        let backend = Self::new();
        {
            let mut collections = backend.collections.lock().unwrap();
            for (collection, docs) in object {
                let docs = docs.as_array().ok_or_else(|| {
                    StoreError::Backend(format!("seed collection {collection} must be an array"))
                })?;
                let entry = collections.entry(collection.clone()).or_default();
                for (index, doc) in docs.iter().enumerate() {
                    let mut doc = doc.clone();
                    if !doc.is_object() {
                        return Err(StoreError::Backend(format!(
                            "seed document {collection}[{index}] must be an object"
                        )));
                    }
                    let id = match doc.get("id").and_then(Value::as_str) {
                        Some(id) => id.to_string(),
                        None => {
                            let id = format!("{collection}_{}", index + 1);
                            doc["id"] = json!(id);
                            id
                        }
                    };
                    entry.insert(id, doc);
                }
            }
        }
        Ok(backend)
    }

    fn missing(collection: &str, id: &str) -> StoreError {
        StoreError::MissingDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    fn merge_into(
        collections: &mut Collections,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Value, StoreError> {
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| Self::missing(collection, id))?;
        if let (Some(target), Some(partial)) = (doc.as_object_mut(), partial.as_object()) {
            for (k, v) in partial {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(doc.clone())
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn read_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn insert(&self, collection: &str, doc: Value) -> Result<Value, StoreError> {
        let id = doc
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Backend("insert without an id".to_string()))?
            .to_string();
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id, doc.clone());
        Ok(doc)
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        Self::merge_into(&mut collections, collection, id, partial)
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }

    async fn apply_batch(&self, writes: Vec<BatchWrite>) -> Result<Vec<Value>, StoreError> {
        let mut collections = self.collections.lock().unwrap();

        // Validate every target first so a failure leaves nothing applied.
        for write in &writes {
            match write {
                BatchWrite::Create { data, .. } => {
                    if data.get("id").and_then(Value::as_str).is_none() {
                        return Err(StoreError::Backend(
                            "batch create without an id".to_string(),
                        ));
                    }
                }
                BatchWrite::Update { collection, id, .. }
                | BatchWrite::Delete { collection, id } => {
                    let exists = collections
                        .get(collection)
                        .is_some_and(|docs| docs.contains_key(id));
                    if !exists {
                        return Err(Self::missing(collection, id));
                    }
                }
            }
        }

        let mut out = Vec::new();
        for write in writes {
            match write {
                BatchWrite::Create { collection, data } => {
                    let id = data["id"].as_str().unwrap_or_default().to_string();
                    collections
                        .entry(collection)
                        .or_default()
                        .insert(id, data.clone());
                    out.push(data);
                }
                BatchWrite::Update { collection, id, data } => {
                    out.push(Self::merge_into(&mut collections, &collection, &id, data)?);
                }
                BatchWrite::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_assigns_missing_ids() {
        let backend = MemoryBackend::from_seed(&json!({
            "staff": [{"name": "Jon"}, {"id": "s9", "name": "Jane"}],
        }))
        .unwrap();
        let docs = backend.read_all("staff").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(backend.read("staff", "staff_1").await.unwrap().is_some());
        assert!(backend.read("staff", "s9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_seed_rejects_non_object() {
        assert!(MemoryBackend::from_seed(&json!([1, 2])).is_err());
        assert!(MemoryBackend::from_seed(&json!({"staff": {"not": "an array"}})).is_err());
    }

    #[tokio::test]
    async fn test_merge_is_shallow() {
        let backend = MemoryBackend::from_seed(&json!({
            "staff": [{"id": "s1", "name": "Jon", "applicationFormData": {"shoeSize": "9"}}],
        }))
        .unwrap();
        let merged = backend
            .merge("staff", "s1", json!({"applicationFormData": {"dressSize": "8"}}))
            .await
            .unwrap();
        // Whole nested object replaced, not deep-merged
        assert_eq!(merged["applicationFormData"], json!({"dressSize": "8"}));
        assert_eq!(merged["name"], "Jon");
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let backend = MemoryBackend::from_seed(&json!({
            "staff": [{"id": "s1", "name": "Jon"}],
        }))
        .unwrap();
        let writes = vec![
            BatchWrite::Create {
                collection: "staff".to_string(),
                data: json!({"id": "s2", "name": "Jane"}),
            },
            BatchWrite::Update {
                collection: "staff".to_string(),
                id: "missing".to_string(),
                data: json!({"role": "Lead"}),
            },
        ];
        let err = backend.apply_batch(writes).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingDocument { .. }));
        // The create in the same batch was not applied
        assert!(backend.read("staff", "s2").await.unwrap().is_none());
    }
}
