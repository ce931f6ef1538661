//! Document Store port
//!
//! Defines how the application layer reads and writes collection
//! documents. The concrete adapter (cached, clock-injected) lives in the
//! infrastructure layer.
//!
//! Failure semantics: store failures propagate as [`StoreError`] without
//! retries — the dispatcher surfaces them to the caller, which owns the
//! user-facing message.

use async_trait::async_trait;
use crewcall_domain::DispatchError;
use crewcall_domain::document::query::{FieldFilter, OrderBy};
use serde_json::Value;
use thiserror::Error;

/// Errors from the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("document {collection}/{id} not found")]
    MissingDocument { collection: String, id: String },
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        DispatchError::Store(err.to_string())
    }
}

/// One write in an all-or-nothing batch.
#[derive(Debug, Clone)]
pub enum BatchWrite {
    Create { collection: String, data: Value },
    Update { collection: String, id: String, data: Value },
    Delete { collection: String, id: String },
}

impl BatchWrite {
    pub fn collection(&self) -> &str {
        match self {
            Self::Create { collection, .. }
            | Self::Update { collection, .. }
            | Self::Delete { collection, .. } => collection,
        }
    }
}

/// Port for collection CRUD, querying and name resolution.
///
/// Every returned document is tagged with its `id`. Reads may be served
/// from a time-boxed cache; any write invalidates the written
/// collection's cache entries.
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// All documents of a collection, from cache when fresh.
    async fn get_all(&self, collection: &str, use_cache: bool) -> Result<Vec<Value>, StoreError>;

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert a document, stamping `createdAt`/`updatedAt`.
    async fn create(&self, collection: &str, data: Value) -> Result<Value, StoreError>;

    /// Partial update, stamping `updatedAt`. Does not merge-read first —
    /// the caller must hold current state if it wants a minimal patch.
    async fn update(&self, collection: &str, id: &str, data: Value) -> Result<Value, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// AND-combined filter query with optional ordering and limit.
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Case-insensitive substring match on a single string field,
    /// computed over the full cached collection.
    async fn search(&self, collection: &str, field: &str, term: &str)
    -> Result<Vec<Value>, StoreError>;

    /// Exact resolution: ci-exact display name, then exact id, then
    /// substring on name/company/email. First match wins.
    async fn find_by_name(&self, collection: &str, name: &str)
    -> Result<Option<Value>, StoreError>;

    /// Every document whose id, name, company or email ci-contains the
    /// query substring.
    async fn find_by_name_fuzzy(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Vec<Value>, StoreError>;

    /// Apply a sequence of writes atomically from the caller's
    /// perspective, then invalidate caches once. Returns the documents
    /// produced by creates and updates, in input order.
    async fn batch(&self, writes: Vec<BatchWrite>) -> Result<Vec<Value>, StoreError>;
}
