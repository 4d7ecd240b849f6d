//! Tool call validation
//!
//! Pure checks of a [`ToolCall`] against the declared schema. The async
//! `ToolExecutorPort` lives in the application layer.

use super::entities::{ToolCall, ToolDefinition, ToolSpec};
use super::value_objects::ToolError;

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;

    /// Resolve the tool name, validate, and fill in declared defaults.
    ///
    /// The returned call carries the canonical tool name. Every rejection is
    /// an `INVALID_CALL` error.
    fn prepare(&self, call: &ToolCall, spec: &ToolSpec) -> Result<ToolCall, ToolError> {
        let definition = spec.get_resolved(&call.tool_name).ok_or_else(|| {
            ToolError::invalid_call(format!("Unknown tool '{}'", call.tool_name))
        })?;

        self.validate(call, definition)
            .map_err(ToolError::invalid_call)?;

        let mut prepared = ToolCall {
            tool_name: definition.name.clone(),
            arguments: call.arguments.clone(),
        };
        for param in &definition.parameters {
            if let Some(default) = &param.default {
                prepared
                    .arguments
                    .entry(param.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        Ok(prepared)
    }
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) if param.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(value) if !value.is_null() && !param.param_type.accepts(value) => {
                    return Err(format!(
                        "Parameter '{}' for tool '{}' must be of type {}",
                        param.name, definition.name, param.param_type
                    ));
                }
                _ => {}
            }
        }

        for arg_name in call.arguments.keys() {
            if definition.parameter(arg_name).is_none() {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}
