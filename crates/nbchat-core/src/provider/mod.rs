//! Chat completion wire types and the transport abstraction
//!
//! The message model mirrors the OpenAI-compatible chat completions format
//! used by OpenRouter, so transcripts serialize to the request body as-is.
//! Implementations of [`Transport`] perform the actual network call.

pub mod catalog;
pub mod logging;
mod openrouter;

pub use catalog::{ModelCatalog, ModelPricing};
pub use openrouter::{DEFAULT_BASE_URL, OpenRouterTransport};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::HIDDEN_CONTEXT_MARKER;
use crate::error::Result;
use crate::tools::ToolDefinition;

/// The only tool call type the executor knows how to run
pub const FUNCTION_CALL_TYPE: &str = "function";

/// A transcript message, tagged by role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    /// Either free text or a non-empty list of tool calls (content is null then)
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        content: String,
        tool_call_id: String,
    },
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create a free-text assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message carrying tool calls
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: None,
            tool_calls,
        }
    }

    /// Create a tool result message
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    /// Text content, if any
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } | Self::Tool { content, .. } => {
                Some(content.as_str())
            }
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Tool calls carried by an assistant message
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Injected ambient-context messages that a renderer should not display
    pub fn is_hidden_context(&self) -> bool {
        matches!(self, Self::System { content } if content.starts_with(HIDDEN_CONTEXT_MARKER))
    }
}

/// A model-issued request to invoke a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Generated by the model; echoed verbatim as `tool_call_id`
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    FUNCTION_CALL_TYPE.to_string()
}

impl ToolCall {
    /// Create a function tool call
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Function name plus raw JSON argument text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// Request body for the chat completions endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
}

/// A tool entry in the request's `tools` list
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub function: ToolDefinition,
}

impl From<ToolDefinition> for ToolSchema {
    fn from(function: ToolDefinition) -> Self {
        Self {
            schema_type: FUNCTION_CALL_TYPE,
            function,
        }
    }
}

/// A fully built request plus the credential needed to send it
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub api_key: String,
    pub body: ChatRequest,
}

/// Parsed chat completions response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Required; an error body without it fails to decode
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ResponseUsage>,
}

impl ChatResponse {
    /// The first choice's message, which is the only one the loop consumes
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ResponseMessage {
    /// Tool calls requested by the model, empty when none
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

/// Token counts reported by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Sends a chat request and returns the parsed response
///
/// Non-success statuses and undecodable bodies are reported as
/// [`crate::Error::Transport`]. Retries and timeouts, if any, belong here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse>;
}
