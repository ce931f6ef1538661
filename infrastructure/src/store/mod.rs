//! Document store adapters.
//!
//! [`CachedDocumentStore`] implements the application's store port over a
//! [`StoreBackend`], adding the TTL read cache, id/stamp generation and
//! name resolution. [`MemoryBackend`] is the shipped backend.

mod backend;
mod cached;
mod clock;
mod memory;

pub use backend::StoreBackend;
pub use cached::CachedDocumentStore;
pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryBackend;
