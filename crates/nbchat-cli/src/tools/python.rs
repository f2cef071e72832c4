//! Execute Python code tool

use nbchat_core::{BoxFuture, Tool, ToolContext, ToolError, tool_params};
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs a snippet with the local Python interpreter
pub struct ExecutePythonCode {
    interpreter: String,
    timeout: Duration,
}

impl ExecutePythonCode {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Use a different interpreter binary, e.g. a virtualenv's python
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }
}

impl Default for ExecutePythonCode {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine process output into the text handed back to the model
fn format_output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> String {
    let mut output = String::new();
    if !stdout.is_empty() {
        output.push_str(stdout.trim_end());
    }
    if !stderr.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str("[stderr] ");
        output.push_str(stderr.trim_end());
    }
    match exit_code {
        Some(0) => {}
        Some(code) => {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[exit code {}]", code));
        }
        None => {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("[terminated by signal]");
        }
    }
    if output.is_empty() {
        output = "Code executed with no output".to_string();
    }
    output
}

impl Tool for ExecutePythonCode {
    fn name(&self) -> &str {
        "execute_python_code"
    }

    fn description(&self) -> &str {
        "Execute Python code and return what it printed."
    }

    fn detailed_description(&self) -> &str {
        "Runs a Python snippet in a fresh interpreter and returns stdout and stderr. \
Use print() to show values; the value of the last expression is not echoed. \
Each call starts from a clean state, so import what you need every time. \
The user is asked to approve every execution."
    }

    fn parameters_schema(&self) -> Value {
        tool_params!(code: "string" => "The Python source to execute")
    }

    fn execute<'a>(
        &'a self,
        args: Value,
        _ctx: &'a ToolContext,
    ) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(async move {
            let code = args["code"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidParams("code is required".into()))?;

            let output = tokio::time::timeout(
                self.timeout,
                Command::new(&self.interpreter)
                    .arg("-c")
                    .arg(code)
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .kill_on_drop(true)
                    .output(),
            )
            .await
            .map_err(|_| {
                ToolError::ExecutionFailed(format!(
                    "Python timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(ToolError::Io)?;

            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(format_output(&stdout, &stderr, output.status.code()))
        })
    }
}
