//! Domain layer for crewcall
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Documents
//!
//! Booking, staff, client, show and availability records are stored as
//! schema-drifted JSON documents. The [`document`] module provides the
//! shape-detection strategies that read legacy variants in a single
//! reviewable precedence order, and [`sanitize`] turns provider-specific
//! timestamp objects into plain display-safe values.
//!
//! ## Tools
//!
//! The language model only ever sees the [`tool::ToolCatalog`] — a closed
//! set of named operations with typed parameter schemas. Every execution
//! produces a [`tool::DispatchOutcome`]: plain data, a renderable data
//! pair, a no-op message, or a [`tool::PendingAction`] that mutates
//! nothing until it is explicitly confirmed.

pub mod core;
pub mod document;
pub mod sanitize;
pub mod staffing;
pub mod tool;

// Re-export commonly used types
pub use core::error::DispatchError;
pub use document::{
    matching::{fuzzy_matches, matches_exact_name, suggestion_names},
    query::{Direction, FieldFilter, FilterOp, OrderBy},
    shapes::{availability_dates, client_display, display_name, show_date_span, show_display},
};
pub use sanitize::{normalize_timestamps_deep, sanitize_for_display};
pub use tool::{
    entities::{ParamType, RiskLevel, ToolCall, ToolCatalog, ToolDefinition, ToolParameter},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ActionType, DispatchOutcome, PendingAction, PendingWrite, Preview, WriteKind},
};
