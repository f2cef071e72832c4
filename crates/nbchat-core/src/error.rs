//! Error types for nbchat core

use thiserror::Error;

/// Result type alias using nbchat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a conversation turn
#[derive(Error, Debug)]
pub enum Error {
    #[error("API key not set")]
    CredentialMissing,

    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("No executor found for tool: {0}")]
    ToolNotFound(String),

    #[error("Malformed arguments for tool {tool}: {message}")]
    MalformedArguments { tool: String, message: String },

    #[error("Tool {tool} failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Unsupported tool call type: {0}")]
    UnsupportedToolCall(String),

    #[error("Exceeded maximum of {0} model rounds in a single turn")]
    RecursionLimitExceeded(usize),

    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Error {
    /// Build a transport error from an optional HTTP status and a message
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }
}

/// Tool-specific errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_includes_status() {
        let err = Error::transport(Some(401), "Unauthorized");
        assert_eq!(err.to_string(), "Transport error (HTTP 401): Unauthorized");

        let err = Error::transport(None, "connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_tool_execution_keeps_source() {
        let err = Error::ToolExecution {
            tool: "execute_python_code".to_string(),
            source: ToolError::ExecutionFailed("kernel died".to_string()),
        };
        assert!(err.to_string().contains("kernel died"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
