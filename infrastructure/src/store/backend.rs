//! Raw collection storage behind [`CachedDocumentStore`].
//!
//! Backends store documents verbatim — id assignment and timestamp
//! stamping happen in the cached store before a write reaches here.

use async_trait::async_trait;
use crewcall_application::{BatchWrite, StoreError};
use serde_json::Value;

#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Every document of a collection, in deterministic order.
    async fn read_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    async fn read(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert a fully prepared document (id and stamps already set).
    async fn insert(&self, collection: &str, doc: Value) -> Result<Value, StoreError>;

    /// Shallow-merge a partial document into an existing one.
    async fn merge(&self, collection: &str, id: &str, partial: Value)
    -> Result<Value, StoreError>;

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Apply prepared writes all-or-nothing. Returns the documents
    /// produced by creates and updates, in input order.
    async fn apply_batch(&self, writes: Vec<BatchWrite>) -> Result<Vec<Value>, StoreError>;
}
