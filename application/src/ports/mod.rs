//! Port definitions (interfaces to infrastructure)

pub mod document_store;
pub mod tool_schema;
