//! Document editing tool
//!
//! Applies model-requested edits to the document held in the ambient
//! context. The result is shown to the user directly, so the turn ends
//! after it runs.

use nbchat_core::{BoxFuture, Tool, ToolContext, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AppAction {
    ReplaceDocument,
    AppendToDocument,
}

#[derive(Debug, Deserialize)]
struct InteractParams {
    action: AppAction,
    text: String,
}

/// Edits the open document on the user's behalf
#[derive(Debug, Default)]
pub struct InteractWithApp;

impl InteractWithApp {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for InteractWithApp {
    fn name(&self) -> &str {
        "interact_with_app"
    }

    fn description(&self) -> &str {
        "Replace or extend the document the user has open."
    }

    fn detailed_description(&self) -> &str {
        "Edits the document the user is working on. \
Use action \"replace_document\" to swap the whole content for `text`, or \
\"append_to_document\" to add `text` at the end. \
The user sees the change immediately; do not repeat the text in your reply."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["replace_document", "append_to_document"],
                    "description": "How to apply the text"
                },
                "text": {
                    "type": "string",
                    "description": "The new content"
                }
            },
            "required": ["action", "text"]
        })
    }

    fn requires_follow_up(&self) -> bool {
        false
    }

    fn execute<'a>(
        &'a self,
        args: Value,
        ctx: &'a ToolContext,
    ) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(async move {
            let params: InteractParams = serde_json::from_value(args)
                .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

            let document = match params.action {
                AppAction::ReplaceDocument => params.text,
                AppAction::AppendToDocument => {
                    let mut document = ctx.ambient.document();
                    if !document.is_empty() && !document.ends_with('\n') {
                        document.push('\n');
                    }
                    document.push_str(&params.text);
                    document
                }
            };

            let lines = document.lines().count();
            ctx.ambient.set_document(document);
            ctx.ambient.set_view(format!(
                "The assistant just edited the open document, which now has {} lines.",
                lines
            ));

            Ok(match params.action {
                AppAction::ReplaceDocument => format!("Document replaced ({} lines)", lines),
                AppAction::AppendToDocument => format!("Text appended ({} lines total)", lines),
            })
        })
    }
}
