//! Tool domain traits
//!
//! Pure validation of tool calls against their catalog definitions.
//! Execution lives behind the application layer's ports.

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation: required parameters must be present and every
/// supplied argument must match a declared parameter's type. Nulls are
/// tolerated for optional parameters (models send them for "omitted").
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) => {
                    if param.required {
                        return Err(format!(
                            "Missing required parameter '{}' for tool '{}'",
                            param.name, definition.name
                        ));
                    }
                }
                Some(value) => {
                    if !param.param_type.accepts(value) {
                        return Err(format!(
                            "Parameter '{}' of tool '{}' must be a {}",
                            param.name,
                            definition.name,
                            param.param_type.as_str()
                        ));
                    }
                }
            }
        }

        let declared: std::collections::HashSet<&str> = definition
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        for arg_name in call.arguments.keys() {
            if !declared.contains(arg_name.as_str()) {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ParamType, RiskLevel, ToolParameter};
    use serde_json::json;

    fn definition() -> ToolDefinition {
        ToolDefinition::new("update_staff_by_name", "Update a staff member", RiskLevel::High)
            .with_parameter(ToolParameter::new("name", "Staff name", true))
            .with_parameter(
                ToolParameter::new("updates", "Fields to change", true)
                    .with_type(ParamType::Object),
            )
            .with_parameter(
                ToolParameter::new("limit", "Cap", false).with_type(ParamType::Number),
            )
    }

    #[test]
    fn test_missing_required_parameter() {
        let call = ToolCall::new("update_staff_by_name").with_arg("name", "Jane");
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert!(err.contains("Missing required parameter 'updates'"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "Jane")
            .with_arg("updates", "not an object");
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert!(err.contains("must be a object"));
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "Jane")
            .with_arg("updates", json!({}))
            .with_arg("surprise", 1);
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert!(err.contains("Unknown parameter 'surprise'"));
    }

    #[test]
    fn test_null_optional_tolerated() {
        let call = ToolCall::new("update_staff_by_name")
            .with_arg("name", "Jane")
            .with_arg("updates", json!({"role": "Lead"}))
            .with_arg("limit", json!(null));
        assert!(DefaultToolValidator.validate(&call, &definition()).is_ok());
    }
}
