//! Tool system
//!
//! Tools are the functions the model may ask to invoke. Each tool has:
//! - A name and description for the LLM
//! - A detailed description rendered into the system prompt
//! - A JSON schema for parameters
//! - An execute method returning the text handed back to the model
//! - A flag saying whether its result needs another model round

mod executor;

pub use executor::ToolExecutor;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::context::AmbientContext;
use crate::error::{Error, Result, ToolError};

/// Boxed future type for object-safe async trait methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Tool definition for LLM consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Context handed to a tool while it executes
#[derive(Clone)]
pub struct ToolContext {
    /// Id of the tool call being executed
    pub tool_call_id: String,
    /// Host state shared with the orchestrator
    pub ambient: AmbientContext,
    /// Cancellation token of the enclosing turn
    pub cancel: CancellationToken,
}

impl ToolContext {
    pub fn new(tool_call_id: impl Into<String>, ambient: AmbientContext) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            ambient,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Core trait for all tools
pub trait Tool: Send + Sync {
    /// Tool name (used by LLM to invoke)
    fn name(&self) -> &str;

    /// Short description sent with the function schema
    fn description(&self) -> &str;

    /// Long-form documentation for the system prompt
    fn detailed_description(&self) -> &str {
        self.description()
    }

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Whether the model must be called again after this tool runs.
    ///
    /// Tools returning `false` are terminal: a batch made only of terminal
    /// calls ends the turn.
    fn requires_follow_up(&self) -> bool {
        true
    }

    /// Execute the tool with parsed arguments
    fn execute<'a>(
        &'a self,
        args: Value,
        ctx: &'a ToolContext,
    ) -> BoxFuture<'a, std::result::Result<String, ToolError>>;

    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Ordered registry of available tools
///
/// Names are unique; registration order is preserved for prompt rendering.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting duplicate names
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Result<Self> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        if self.contains(tool.name()) {
            return Err(Error::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Definitions of all tools, in registration order
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// All tools, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Whether a call to `name` needs another model round.
    ///
    /// Unknown names count as needing one.
    pub fn requires_follow_up(&self, name: &str) -> bool {
        self.get(name).map(|t| t.requires_follow_up()).unwrap_or(true)
    }
}

/// Helper macro for creating tool parameter schemas
#[macro_export]
macro_rules! tool_params {
    ($($field:ident : $type:expr => $desc:expr),* $(,)?) => {
        serde_json::json!({
            "type": "object",
            "properties": {
                $( stringify!($field): { "type": $type, "description": $desc } ),*
            },
            "required": [ $( stringify!($field) ),* ]
        })
    };
}
