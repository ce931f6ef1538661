//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk - side-effect-free reads (e.g. get_bookings, recommend_staff)
    Low,
    /// High risk - operations that modify state (e.g. create_booking)
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter type as declared to the language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }

    /// Whether a JSON value is an instance of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Declared type
    pub param_type: ParamType,
    /// Element type for array parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ParamType>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
            item_type: None,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_items(mut self, item_type: ParamType) -> Self {
        self.param_type = ParamType::Array;
        self.item_type = Some(item_type);
        self
    }
}

/// Definition of a single operation the language model may request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique operation name (e.g. "update_staff_by_name")
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// Risk level of this operation
    pub risk_level: RiskLevel,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_write(&self) -> bool {
        self.risk_level.is_write()
    }
}

/// The closed set of operations exposed to the language model.
///
/// Keyed by operation name with deterministic iteration order, so the
/// schema handed to the model is stable across runs. The catalog must be
/// kept in lockstep with the dispatcher's routing — both are generated
/// from the same operation list, and a test asserts the key sets match.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn write_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values().filter(|t| t.is_write())
    }

    pub fn read_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values().filter(|t| !t.is_write())
    }
}

/// A call to a tool with arguments, as chosen by the language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the operation to execute
    pub tool_name: String,
    /// Arguments passed to the operation
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a non-empty string argument
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_string(key).filter(|s| !s.trim().is_empty())
    }

    /// Get a required string argument
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {key}"))
    }

    /// Get an optional u64 argument
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.arguments.get(key).and_then(|v| v.as_u64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Get an optional array argument
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.arguments.get(key).and_then(|v| v.as_array())
    }

    /// Get an array of strings, skipping non-string elements
    pub fn get_string_array(&self, key: &str) -> Vec<String> {
        self.get_array(key)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get an optional object argument
    pub fn get_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.arguments.get(key).and_then(|v| v.as_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_risk_level() {
        assert!(!RiskLevel::Low.is_write());
        assert!(RiskLevel::High.is_write());
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::String.accepts(&json!("x")));
        assert!(ParamType::Number.accepts(&json!(3.5)));
        assert!(ParamType::Array.accepts(&json!([])));
        assert!(!ParamType::Object.accepts(&json!([])));
        assert!(!ParamType::Boolean.accepts(&json!("true")));
    }

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("get_bookings", "List bookings", RiskLevel::Low)
            .with_parameter(ToolParameter::new("status", "Filter by status", false))
            .with_parameter(
                ToolParameter::new("staffIds", "Staff ids", false).with_items(ParamType::String),
            );

        assert_eq!(tool.name, "get_bookings");
        assert!(!tool.is_write());
        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.parameters[1].param_type, ParamType::Array);
        assert_eq!(tool.parameters[1].item_type, Some(ParamType::String));
    }

    #[test]
    fn test_catalog_register_and_lookup() {
        let catalog = ToolCatalog::new()
            .register(ToolDefinition::new("get_staff", "List staff", RiskLevel::Low))
            .register(ToolDefinition::new(
                "create_booking",
                "Create a booking",
                RiskLevel::High,
            ));

        assert!(catalog.contains("get_staff"));
        assert!(catalog.get("create_booking").is_some());
        assert!(catalog.get("unknown").is_none());
        assert_eq!(catalog.read_tools().count(), 1);
        assert_eq!(catalog.write_tools().count(), 1);
    }

    #[test]
    fn test_catalog_names_are_sorted() {
        let catalog = ToolCatalog::new()
            .register(ToolDefinition::new("b", "", RiskLevel::Low))
            .register(ToolDefinition::new("a", "", RiskLevel::Low));
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_tool_call_getters() {
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "Jane Smith")
            .with_arg("limit", 5)
            .with_arg("skills", json!(["runway", 7]))
            .with_arg("updates", json!({"role": "Lead"}));

        assert_eq!(call.get_string("name"), Some("Jane Smith"));
        assert_eq!(call.require_string("name").unwrap(), "Jane Smith");
        assert!(call.require_string("missing").is_err());
        assert_eq!(call.get_u64("limit"), Some(5));
        assert_eq!(call.get_string_array("skills"), vec!["runway"]);
        assert_eq!(call.get_object("updates").unwrap()["role"], "Lead");
        assert_eq!(call.get_non_empty("empty"), None);
    }
}
