//! Tool call dispatch

use serde_json::Value;
use tracing::{debug, warn};

use super::{ToolContext, ToolRegistry};
use crate::error::{Error, Result, ToolError};
use crate::provider::{FUNCTION_CALL_TYPE, ToolCall};

/// Resolves tool calls against a registry and runs them
#[derive(Clone)]
pub struct ToolExecutor {
    registry: ToolRegistry,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute an approved tool call and return the text for the tool message.
    ///
    /// Every failure is returned as an error; nothing here produces a
    /// tool-result message on its own.
    pub async fn execute(&self, call: &ToolCall, ctx: &ToolContext) -> Result<String> {
        if call.call_type != FUNCTION_CALL_TYPE {
            return Err(Error::UnsupportedToolCall(call.call_type.clone()));
        }

        let name = call.name();
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        let args = parse_arguments(name, &call.function.arguments)?;

        debug!(tool = name, tool_call_id = %call.id, "Executing tool");
        match tool.execute(args, ctx).await {
            Ok(output) => Ok(output),
            Err(ToolError::InvalidParams(message)) => Err(Error::MalformedArguments {
                tool: name.to_string(),
                message,
            }),
            Err(source) => {
                warn!(tool = name, error = %source, "Tool execution failed");
                Err(Error::ToolExecution {
                    tool: name.to_string(),
                    source,
                })
            }
        }
    }
}

/// Parse raw argument text; an empty string means no arguments
fn parse_arguments(tool: &str, raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw).map_err(|e| Error::MalformedArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_arguments_as_object() {
        let value = parse_arguments("t", "  ").unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_arguments() {
        let err = parse_arguments("t", "{code: 2+2").unwrap_err();
        assert!(matches!(err, Error::MalformedArguments { tool, .. } if tool == "t"));
    }
}
