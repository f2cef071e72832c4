//! System prompt management
//!
//! The initial system message is rebuilt on every round: tool descriptions
//! and the document snapshot may change between rounds.

use crate::context::AmbientContext;
use crate::tools::ToolRegistry;

/// System prompt configuration and generation
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    /// Operating instructions placed before the tool documentation
    base: String,
    /// Instructions placed after the tool documentation
    closing: String,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPrompt {
    /// Create a new system prompt with the default content
    pub fn new() -> Self {
        Self {
            base: DEFAULT_SYSTEM_PROMPT.to_string(),
            closing: DEFAULT_CLOSING.to_string(),
        }
    }

    /// Create with custom base instructions
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            closing: DEFAULT_CLOSING.to_string(),
        }
    }

    /// Replace the text that follows the tool documentation
    pub fn with_closing(mut self, closing: impl Into<String>) -> Self {
        self.closing = closing.into();
        self
    }

    /// Build the final system prompt
    pub fn build(&self, registry: &ToolRegistry, ambient: &AmbientContext) -> String {
        let mut prompt = String::with_capacity(self.base.len() + 1024);
        prompt.push_str(&self.base);

        for tool in registry.iter() {
            prompt.push_str("## Tool: ");
            prompt.push_str(tool.name());
            prompt.push('\n');
            prompt.push_str(tool.detailed_description());
            prompt.push_str("\n\n");
        }

        prompt.push_str(&self.closing);
        prompt.push_str("\n\nHere is the content of the notebook:\n");
        prompt.push_str(&ambient.document());
        prompt.push('\n');
        prompt
    }
}

/// Default operating instructions
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful technical assistant.

The user is working in a notebook application for creating and sharing Python Jupyter notebooks.

You are going to help answer questions relevant to the notebook content.

If the user asks you to generate code, provide it in markdown format. They will likely copy and paste it into a cell.

Do not use the execute_python_code tool unless the user explicitly asks you to run Python code. Normally, they'll just want to get the code to paste into the notebook.

The following specialized tools are available.

"#;

/// Default text between the tool documentation and the notebook snapshot
pub const DEFAULT_CLOSING: &str =
    "If you generate a script to create a plot, your response should be a suitable caption for the plot.";
