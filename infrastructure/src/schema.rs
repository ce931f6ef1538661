//! JSON Schema rendering of the tool catalog.
//!
//! Produces the function-calling shape language model providers expect:
//! `{name, description, parameters: {type: "object", properties, required}}`.

use crewcall_application::ToolSchemaPort;
use crewcall_domain::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonToolSchema;

impl JsonToolSchema {
    pub fn new() -> Self {
        Self
    }

    fn parameter_schema(param: &ToolParameter) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(param.param_type.as_str()));
        schema.insert("description".to_string(), json!(param.description));
        if let Some(item_type) = param.item_type {
            schema.insert("items".to_string(), json!({"type": item_type.as_str()}));
        }
        Value::Object(schema)
    }
}

impl ToolSchemaPort for JsonToolSchema {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &tool.parameters {
            properties.insert(param.name.clone(), Self::parameter_schema(param));
            if param.required {
                required.push(json!(param.name));
            }
        }
        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewcall_domain::{ParamType, RiskLevel, ToolCatalog};

    #[test]
    fn test_tool_to_schema_shape() {
        let tool = ToolDefinition::new("get_bookings", "List bookings", RiskLevel::Low)
            .with_parameter(ToolParameter::new("status", "Filter by status", false))
            .with_parameter(
                ToolParameter::new("clientName", "Client name to match", true),
            )
            .with_parameter(
                ToolParameter::new("staffIds", "Staff ids", false).with_items(ParamType::String),
            );

        let schema = JsonToolSchema::new().tool_to_schema(&tool);
        assert_eq!(schema["name"], "get_bookings");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(
            schema["parameters"]["properties"]["status"]["type"],
            "string"
        );
        assert_eq!(
            schema["parameters"]["properties"]["staffIds"]["items"]["type"],
            "string"
        );
        assert_eq!(schema["parameters"]["required"], json!(["clientName"]));
    }

    #[test]
    fn test_catalog_schema_follows_catalog_order() {
        let catalog = ToolCatalog::new()
            .register(ToolDefinition::new("b_tool", "", RiskLevel::Low))
            .register(ToolDefinition::new("a_tool", "", RiskLevel::High));
        let schemas = JsonToolSchema::new().catalog_schema(&catalog);
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0]["name"], "a_tool");
        assert_eq!(schemas[1]["name"], "b_tool");
    }
}
