//! LLM request/response logging
//!
//! Set the `LLM_LOG_FILE` environment variable to append one JSON line per
//! chat completion round trip. Useful for debugging context injection,
//! token usage and model behavior.
//!
//! Example: `LLM_LOG_FILE=/tmp/llm.log nbchat`

use serde_json::json;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use super::{ChatRequest, ChatResponse};

/// Environment variable naming the log file
pub const LLM_LOG_FILE_ENV: &str = "LLM_LOG_FILE";

/// What to include in one log line
#[derive(Default)]
pub struct LogEntry<'a> {
    pub request: Option<&'a ChatRequest>,
    /// Raw response body as received
    pub raw_response: Option<&'a str>,
    pub response: Option<&'a ChatResponse>,
    pub status: Option<u16>,
    pub error: Option<&'a str>,
}

/// Log an interaction if `LLM_LOG_FILE` is set
pub fn log_llm_interaction(entry: LogEntry<'_>) {
    let Ok(path) = std::env::var(LLM_LOG_FILE_ENV) else {
        return;
    };
    write_entry(Path::new(&path), &entry);
}

/// Append one JSON line describing `entry` to `path`
pub fn write_entry(path: &Path, entry: &LogEntry<'_>) {
    let line = json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model": entry.request.map(|r| r.model.as_str()),
        "request": entry.request.map(|r| json!({
            "messages": r.messages,
            "message_count": r.messages.len(),
            "tools": r.tools.iter().map(|t| t.function.name.as_str()).collect::<Vec<_>>(),
        })),
        "response": entry.response.map(|r| {
            let message = r.first_message();
            json!({
                "choice_count": r.choices.len(),
                "content": message.and_then(|m| m.content.as_deref()),
                "tool_calls": message.map(|m| m.tool_calls()).unwrap_or_default(),
                "usage": r.usage.map(|u| json!({
                    "prompt_tokens": u.prompt_tokens,
                    "completion_tokens": u.completion_tokens,
                })),
            })
        }),
        "raw_response": entry.raw_response,
        "status": entry.status,
        "error": entry.error,
    });

    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", line) {
                warn!("Failed to write to LLM log file: {}", e);
            }
        }
        Err(e) => {
            warn!("Failed to open LLM log file {}: {}", path.display(), e);
        }
    }

    debug!("Logged LLM interaction to {}", path.display());
}
