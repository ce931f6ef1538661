//! Infrastructure layer for crewcall
//!
//! Concrete adapters behind the application layer's ports: the cached
//! document store and its backends, the JSON tool-schema converter, and
//! configuration loading.

pub mod config;
pub mod schema;
pub mod store;

pub use config::{ConfigLoader, FileConfig};
pub use schema::JsonToolSchema;
pub use store::{CachedDocumentStore, Clock, ManualClock, MemoryBackend, StoreBackend, SystemClock};
