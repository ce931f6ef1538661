//! Application layer for crewcall
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; concrete store adapters live in infrastructure.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    document_store::{BatchWrite, DocumentStorePort, StoreError},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::analytics::{AnalyticsUseCase, AnalyticsWindow};
pub use use_cases::confirm_action::ConfirmActionUseCase;
pub use use_cases::dispatch::{DispatchConfig, Operation, ToolDispatcher, build_catalog};
pub use use_cases::query_engine::{DateRange, QueryEngine, QueryParams};
pub use use_cases::recommend_staff::{RecommendStaffInput, RecommendStaffUseCase};
