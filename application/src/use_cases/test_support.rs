//! In-memory [`DocumentStorePort`] stub for use-case tests.
//!
//! Deterministic: collections iterate in insertion order, generated ids are
//! sequential, and stamps are a fixed instant so assertions stay stable.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use crewcall_domain::document::matching::{matches_id, matches_substring};
use crewcall_domain::document::query::{matches_all, sort_docs};
use crewcall_domain::{fuzzy_matches, matches_exact_name};
use serde_json::{Value, json};

use crate::ports::document_store::{BatchWrite, DocumentStorePort, StoreError};

const STAMP: &str = "2025-01-01T00:00:00.000Z";

pub(crate) struct InMemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Value>>>,
    seq: AtomicU64,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            collections: Mutex::new(BTreeMap::new()),
            seq: AtomicU64::new(1),
        }
    }

    /// Seed a collection with documents (each must carry an `id`).
    pub(crate) fn seed(self, collection: &str, docs: Vec<Value>) -> Self {
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), docs);
        self
    }

    fn next_id(&self, collection: &str) -> String {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{collection}_{n}")
    }

    fn insert(
        &self,
        collections: &mut BTreeMap<String, Vec<Value>>,
        collection: &str,
        data: Value,
    ) -> Value {
        let mut doc = data;
        if doc.get("id").and_then(Value::as_str).is_none() {
            doc["id"] = json!(self.next_id(collection));
        }
        doc["createdAt"] = json!(STAMP);
        doc["updatedAt"] = json!(STAMP);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        doc
    }

    fn merge(
        collections: &mut BTreeMap<String, Vec<Value>>,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        let docs = collections.entry(collection.to_string()).or_default();
        let doc = docs
            .iter_mut()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StoreError::MissingDocument {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        if let (Some(target), Some(partial)) = (doc.as_object_mut(), data.as_object()) {
            for (k, v) in partial {
                target.insert(k.clone(), v.clone());
            }
            target.insert("updatedAt".to_string(), json!(STAMP));
        }
        Ok(doc.clone())
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryStore {
    async fn get_all(&self, collection: &str, _use_cache: bool) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let docs = self.get_all(collection, true).await?;
        Ok(docs
            .into_iter()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id)))
    }

    async fn create(&self, collection: &str, data: Value) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        Ok(self.insert(&mut collections, collection, data))
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        Self::merge(&mut collections, collection, id, data)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let before = docs.len();
        docs.retain(|d| d.get("id").and_then(Value::as_str) != Some(id));
        Ok(docs.len() < before)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[crewcall_domain::FieldFilter],
        order: Option<&crewcall_domain::OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut docs: Vec<Value> = self
            .get_all(collection, true)
            .await?
            .into_iter()
            .filter(|d| matches_all(d, filters))
            .collect();
        if let Some(order) = order {
            sort_docs(&mut docs, order);
        }
        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn search(
        &self,
        collection: &str,
        field: &str,
        term: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .get_all(collection, true)
            .await?
            .into_iter()
            .filter(|d| {
                d.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
            .collect())
    }

    async fn find_by_name(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Option<Value>, StoreError> {
        let docs = self.get_all(collection, true).await?;
        for strategy in [matches_exact_name, matches_id, matches_substring] {
            if let Some(doc) = docs.iter().find(|d| strategy(d, name)) {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    async fn find_by_name_fuzzy(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .get_all(collection, true)
            .await?
            .into_iter()
            .filter(|d| fuzzy_matches(d, name))
            .collect())
    }

    async fn batch(&self, writes: Vec<BatchWrite>) -> Result<Vec<Value>, StoreError> {
        let mut collections = self.collections.lock().unwrap();

        // Validate targets first so the batch is all-or-nothing.
        for write in &writes {
            if let BatchWrite::Update { collection, id, .. }
            | BatchWrite::Delete { collection, id } = write
            {
                let exists = collections.get(collection).is_some_and(|docs| {
                    docs.iter()
                        .any(|d| d.get("id").and_then(Value::as_str) == Some(id))
                });
                if !exists {
                    return Err(StoreError::MissingDocument {
                        collection: collection.clone(),
                        id: id.clone(),
                    });
                }
            }
        }

        let mut out = Vec::new();
        for write in writes {
            match write {
                BatchWrite::Create { collection, data } => {
                    out.push(self.insert(&mut collections, &collection, data));
                }
                BatchWrite::Update { collection, id, data } => {
                    out.push(Self::merge(&mut collections, &collection, &id, data)?);
                }
                BatchWrite::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.retain(|d| d.get("id").and_then(Value::as_str) != Some(&id));
                    }
                }
            }
        }
        Ok(out)
    }
}
