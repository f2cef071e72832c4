//! Tools offered to the model by the CLI host

mod app;
mod python;

use app::InteractWithApp;
use python::ExecutePythonCode;

use nbchat_core::ToolRegistry;
use std::sync::Arc;

/// Registry with every CLI tool, in prompt order
pub fn default_registry(python: &str) -> nbchat_core::Result<ToolRegistry> {
    ToolRegistry::new()
        .with_tool(Arc::new(ExecutePythonCode::new().with_interpreter(python)))?
        .with_tool(Arc::new(InteractWithApp::new()))
}
