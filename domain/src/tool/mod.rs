//! Tool domain module
//!
//! Defines the contract surface between the language model and the
//! back office. Every operation the model may request is described by a
//! [`ToolDefinition`] in the [`ToolCatalog`]; an invocation arrives as a
//! [`ToolCall`]; execution produces a [`value_objects::DispatchOutcome`].
//!
//! # Risk-based execution
//!
//! Each tool has a [`entities::RiskLevel`] that determines whether the
//! result may be applied immediately or must round-trip through the
//! confirmation flow:
//!
//! | Risk | Examples | Behavior |
//! |------|----------|----------|
//! | **Low** | `get_bookings`, `recommend_staff` | Executes immediately, returns sanitized data |
//! | **High** | `create_booking`, `update_staff_by_name` | Returns a [`value_objects::PendingAction`] that mutates nothing until confirmed |
//!
//! # Key types
//!
//! - [`ToolCatalog`] — closed registry of operations shown to the model
//! - [`ToolDefinition`] — one operation's name, description and typed parameters
//! - [`ToolCall`] — an invocation request with JSON arguments
//! - [`value_objects::DispatchOutcome`] — tagged result union (`Data` /
//!   `Rendered` / `NoOp` / `Pending`), replacing the historical
//!   sentinel-key object shapes with something callers pattern-match
//!   exhaustively
//! - [`ToolValidator`] — pure parameter validation against a definition

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, RiskLevel, ToolCall, ToolCatalog, ToolDefinition, ToolParameter};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ActionType, DispatchOutcome, PendingAction, PendingWrite, Preview, WriteKind};
