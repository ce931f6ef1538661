//! TTL-cached [`DocumentStorePort`] adapter.
//!
//! Collection reads are served from a per-collection cache until the TTL
//! lapses; any write invalidates the touched collections. Ids and
//! `createdAt`/`updatedAt` stamps come from the injected [`Clock`], so
//! tests drive both cache expiry and stamping deterministically.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use crewcall_application::{BatchWrite, DocumentStorePort, StoreError};
use crewcall_domain::document::matching::{
    fuzzy_matches, matches_exact_name, matches_id, matches_substring,
};
use crewcall_domain::document::query::{FieldFilter, OrderBy, matches_all, sort_docs};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::backend::StoreBackend;
use super::clock::Clock;

pub const DEFAULT_TTL_SECONDS: u64 = 300;

struct CacheEntry {
    fetched_at: i64,
    docs: Vec<Value>,
}

pub struct CachedDocumentStore {
    backend: Arc<dyn StoreBackend>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
    cache: Mutex<HashMap<String, CacheEntry>>,
    seq: AtomicU64,
}

impl CachedDocumentStore {
    pub fn new(backend: Arc<dyn StoreBackend>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(backend, clock, DEFAULT_TTL_SECONDS)
    }

    pub fn with_ttl(
        backend: Arc<dyn StoreBackend>,
        clock: Arc<dyn Clock>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            backend,
            clock,
            ttl_millis: ttl_seconds as i64 * 1000,
            cache: Mutex::new(HashMap::new()),
            seq: AtomicU64::new(0),
        }
    }

    fn cached_docs(&self, collection: &str) -> Option<Vec<Value>> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(collection)?;
        let age = self.clock.now_millis() - entry.fetched_at;
        if age < self.ttl_millis {
            Some(entry.docs.clone())
        } else {
            None
        }
    }

    fn store_in_cache(&self, collection: &str, docs: Vec<Value>) {
        self.cache.lock().unwrap().insert(
            collection.to_string(),
            CacheEntry {
                fetched_at: self.clock.now_millis(),
                docs,
            },
        );
    }

    fn invalidate(&self, collection: &str) {
        self.cache.lock().unwrap().remove(collection);
    }

    fn timestamp(&self) -> String {
        let millis = self.clock.now_millis();
        match DateTime::from_timestamp_millis(millis) {
            Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => {
                warn!(millis, "clock produced an out-of-range timestamp");
                String::new()
            }
        }
    }

    fn next_id(&self, collection: &str) -> String {
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        format!("{collection}_{}_{n}", self.clock.now_millis())
    }

    /// Assign an id (unless the document brings one) and creation stamps.
    fn prepare_create(&self, collection: &str, data: Value) -> Value {
        let mut doc = match data {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        if doc.get("id").and_then(Value::as_str).is_none() {
            doc.insert("id".to_string(), json!(self.next_id(collection)));
        }
        let now = self.timestamp();
        doc.entry("createdAt".to_string()).or_insert(json!(now));
        doc.insert("updatedAt".to_string(), json!(now));
        Value::Object(doc)
    }

    fn prepare_update(&self, data: Value) -> Value {
        let mut patch = match data {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        patch.insert("updatedAt".to_string(), json!(self.timestamp()));
        Value::Object(patch)
    }
}

#[async_trait]
impl DocumentStorePort for CachedDocumentStore {
    async fn get_all(&self, collection: &str, use_cache: bool) -> Result<Vec<Value>, StoreError> {
        if use_cache {
            if let Some(docs) = self.cached_docs(collection) {
                debug!(collection, count = docs.len(), "cache hit");
                return Ok(docs);
            }
        }
        let docs = self.backend.read_all(collection).await?;
        debug!(collection, count = docs.len(), "cache refresh");
        self.store_in_cache(collection, docs.clone());
        Ok(docs)
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.backend.read(collection, id).await
    }

    async fn create(&self, collection: &str, data: Value) -> Result<Value, StoreError> {
        let doc = self.prepare_create(collection, data);
        let stored = self.backend.insert(collection, doc).await?;
        self.invalidate(collection);
        Ok(stored)
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> Result<Value, StoreError> {
        let patch = self.prepare_update(data);
        let stored = self.backend.merge(collection, id, patch).await?;
        self.invalidate(collection);
        Ok(stored)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let removed = self.backend.remove(collection, id).await?;
        if removed {
            self.invalidate(collection);
        }
        Ok(removed)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut docs: Vec<Value> = self
            .get_all(collection, true)
            .await?
            .into_iter()
            .filter(|doc| matches_all(doc, filters))
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
        let needle = term.trim().to_lowercase();
        Ok(self
            .get_all(collection, true)
            .await?
            .into_iter()
            .filter(|doc| {
                doc.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
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
            if let Some(doc) = docs.iter().find(|doc| strategy(doc, name)) {
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
            .filter(|doc| fuzzy_matches(doc, name))
            .collect())
    }

    async fn batch(&self, writes: Vec<BatchWrite>) -> Result<Vec<Value>, StoreError> {
        let mut touched: Vec<String> = Vec::new();
        let prepared: Vec<BatchWrite> = writes
            .into_iter()
            .map(|write| {
                if !touched.iter().any(|c| c == write.collection()) {
                    touched.push(write.collection().to_string());
                }
                match write {
                    BatchWrite::Create { collection, data } => {
                        let data = self.prepare_create(&collection, data);
                        BatchWrite::Create { collection, data }
                    }
                    BatchWrite::Update { collection, id, data } => {
                        let data = self.prepare_update(data);
                        BatchWrite::Update { collection, id, data }
                    }
                    delete @ BatchWrite::Delete { .. } => delete,
                }
            })
            .collect();
        let out = self.backend.apply_batch(prepared).await?;
        for collection in &touched {
            self.invalidate(collection);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::clock::ManualClock;
    use crate::store::memory::MemoryBackend;

    fn store_with(seed: Value) -> (CachedDocumentStore, Arc<ManualClock>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::from_seed(&seed).unwrap());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store =
            CachedDocumentStore::new(backend.clone() as Arc<dyn StoreBackend>, clock.clone());
        (store, clock, backend)
    }

    #[tokio::test]
    async fn test_fresh_cache_serves_stale_reads() {
        let (store, _clock, backend) = store_with(json!({
            "staff": [{"id": "s1", "name": "Jon Smith"}],
        }));
        assert_eq!(store.get_all("staff", true).await.unwrap().len(), 1);

        // Mutate the backend behind the cache's back
        backend
            .insert("staff", json!({"id": "s2", "name": "Jane Roe"}))
            .await
            .unwrap();
        assert_eq!(store.get_all("staff", true).await.unwrap().len(), 1);
        assert_eq!(store.get_all("staff", false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ttl_expiry_refetches() {
        let (store, clock, backend) = store_with(json!({
            "staff": [{"id": "s1", "name": "Jon Smith"}],
        }));
        store.get_all("staff", true).await.unwrap();
        backend
            .insert("staff", json!({"id": "s2", "name": "Jane Roe"}))
            .await
            .unwrap();

        clock.advance_secs(DEFAULT_TTL_SECONDS as i64 - 1);
        assert_eq!(store.get_all("staff", true).await.unwrap().len(), 1);

        clock.advance_secs(2);
        assert_eq!(store.get_all("staff", true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_writes_invalidate_their_collection() {
        let (store, _clock, _backend) = store_with(json!({
            "staff": [{"id": "s1", "name": "Jon Smith"}],
            "shows": [{"id": "show1", "name": "Gala"}],
        }));
        store.get_all("staff", true).await.unwrap();
        store.get_all("shows", true).await.unwrap();

        store
            .create("staff", json!({"name": "Jane Roe"}))
            .await
            .unwrap();
        assert_eq!(store.get_all("staff", true).await.unwrap().len(), 2);
        // Untouched collection keeps its cache entry
        assert!(store.cached_docs("shows").is_some());
        assert!(store.cached_docs("staff").is_some());
    }

    #[tokio::test]
    async fn test_create_stamps_id_and_timestamps() {
        let (store, _clock, _backend) = store_with(json!({}));
        let doc = store
            .create("clients", json!({"name": "Acme"}))
            .await
            .unwrap();
        let id = doc["id"].as_str().unwrap();
        assert!(id.starts_with("clients_1700000000000_"));
        assert_eq!(doc["createdAt"], "2023-11-14T22:13:20.000Z");
        assert_eq!(doc["updatedAt"], doc["createdAt"]);
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at_only() {
        let (store, clock, _backend) = store_with(json!({
            "staff": [{"id": "s1", "name": "Jon Smith", "createdAt": "2023-01-01T00:00:00.000Z"}],
        }));
        clock.advance_secs(60);
        let doc = store
            .update("staff", "s1", json!({"role": "Lead"}))
            .await
            .unwrap();
        assert_eq!(doc["role"], "Lead");
        assert_eq!(doc["createdAt"], "2023-01-01T00:00:00.000Z");
        assert_eq!(doc["updatedAt"], "2023-11-14T22:14:20.000Z");
    }

    #[tokio::test]
    async fn test_find_by_name_prefers_exact_over_substring() {
        let (store, _clock, _backend) = store_with(json!({
            "staff": [
                {"id": "s1", "name": "Jon Smithson"},
                {"id": "s2", "name": "Jon Smith"},
            ],
        }));
        let doc = store.find_by_name("staff", "jon smith").await.unwrap().unwrap();
        assert_eq!(doc["id"], "s2");
    }

    #[tokio::test]
    async fn test_query_orders_and_limits() {
        let (store, _clock, _backend) = store_with(json!({
            "shows": [
                {"id": "show1", "name": "Gala", "startDate": "2025-03-01"},
                {"id": "show2", "name": "Expo", "startDate": "2025-01-15"},
                {"id": "show3", "name": "Fair", "startDate": "2025-02-10"},
            ],
        }));
        let order = OrderBy {
            field: "startDate".to_string(),
            direction: crewcall_domain::document::query::Direction::Asc,
        };
        let docs = store
            .query("shows", &[], Some(&order), Some(2))
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["id"], "show2");
        assert_eq!(docs[1]["id"], "show3");
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_caches_intact() {
        let (store, _clock, backend) = store_with(json!({
            "staff": [{"id": "s1", "name": "Jon Smith"}],
        }));
        store.get_all("staff", true).await.unwrap();

        let writes = vec![BatchWrite::Update {
            collection: "staff".to_string(),
            id: "missing".to_string(),
            data: json!({"role": "Lead"}),
        }];
        assert!(store.batch(writes).await.is_err());
        assert_eq!(backend.read_all("staff").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_stamps_creates() {
        let (store, _clock, _backend) = store_with(json!({}));
        let out = store
            .batch(vec![BatchWrite::Create {
                collection: "clients".to_string(),
                data: json!({"name": "Acme"}),
            }])
            .await
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0]["id"].as_str().unwrap().starts_with("clients_"));
        assert!(out[0]["createdAt"].is_string());
    }
}
