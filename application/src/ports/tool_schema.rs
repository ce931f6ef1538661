//! Tool schema port
//!
//! Converts catalog definitions into the JSON schema shape the language
//! model integration consumes.

use crewcall_domain::{ToolCatalog, ToolDefinition};

/// Port for converting tool definitions to provider schemas.
pub trait ToolSchemaPort {
    /// Convert a single tool to its schema representation.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert the whole catalog, in catalog (name) order.
    fn catalog_schema(&self, catalog: &ToolCatalog) -> Vec<serde_json::Value> {
        catalog.all().map(|t| self.tool_to_schema(t)).collect()
    }
}
