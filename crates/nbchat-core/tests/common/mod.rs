//! Shared test doubles: scripted transport, scripted approval gate and a
//! recording tool.

#![allow(dead_code)]

use async_trait::async_trait;
use nbchat_core::{
    AmbientContext, ApprovalGate, BoxFuture, ChatOrchestrator, ChatResponse, Error, OutboundRequest,
    RequestBuilder, Result, Tool, ToolCall, ToolContext, ToolError, ToolRegistry, Transport,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;

pub const MODEL: &str = "test/model";

/// Transport returning queued responses and recording every request
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = Value>) -> Arc<Self> {
        let queue = responses
            .into_iter()
            .map(|v| Ok(serde_json::from_value(v).expect("valid response fixture")))
            .collect();
        Arc::new(Self {
            responses: Mutex::new(queue),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: Error) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::from([Err(error)])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport(None, "no scripted response left")))
    }
}

/// Gate answering from a fixed list of decisions (approve once exhausted)
#[derive(Default)]
pub struct ScriptedGate {
    decisions: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedGate {
    pub fn new(decisions: impl IntoIterator<Item = bool>) -> Arc<Self> {
        Arc::new(Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        })
    }

    /// Ids of the tool calls the gate was asked about, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl ApprovalGate for ScriptedGate {
    async fn request_approval(&self, call: &ToolCall) -> bool {
        self.asked.lock().push(call.id.clone());
        self.decisions.lock().pop_front().unwrap_or(true)
    }
}

/// Tool returning a fixed output and recording the arguments it ran with
pub struct RecordingTool {
    name: &'static str,
    terminal: bool,
    output: std::result::Result<String, String>,
    calls: Mutex<Vec<Value>>,
}

impl RecordingTool {
    pub fn new(name: &'static str, output: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            terminal: false,
            output: Ok(output.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn terminal(name: &'static str, output: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            terminal: true,
            output: Ok(output.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            terminal: false,
            output: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().clone()
    }
}

impl Tool for RecordingTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Test tool"
    }

    fn detailed_description(&self) -> &str {
        "A tool used by tests. It records its arguments."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn requires_follow_up(&self) -> bool {
        !self.terminal
    }

    fn execute<'a>(
        &'a self,
        args: Value,
        _ctx: &'a ToolContext,
    ) -> BoxFuture<'a, std::result::Result<String, ToolError>> {
        Box::pin(async move {
            self.calls.lock().push(args);
            self.output.clone().map_err(ToolError::ExecutionFailed)
        })
    }
}

pub fn registry(tools: Vec<Arc<dyn Tool>>) -> ToolRegistry {
    ToolRegistry::from_tools(tools).expect("unique tool names")
}

pub fn orchestrator(
    transport: Arc<dyn Transport>,
    gate: Arc<dyn ApprovalGate>,
    registry: ToolRegistry,
    ambient: AmbientContext,
) -> ChatOrchestrator {
    ChatOrchestrator::new(
        transport,
        gate,
        registry,
        ambient,
        RequestBuilder::new(MODEL, Some("sk-test".to_string())),
    )
}

/// A response whose message carries the given tool calls
pub fn tool_calls_response(calls: &[(&str, &str, &str)], prompt: u64, completion: u64) -> Value {
    let tool_calls: Vec<Value> = calls
        .iter()
        .map(|(id, name, args)| {
            json!({
                "id": id,
                "type": "function",
                "function": {"name": name, "arguments": args}
            })
        })
        .collect();
    json!({
        "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": tool_calls}}],
        "usage": {"prompt_tokens": prompt, "completion_tokens": completion}
    })
}

/// A plain text response
pub fn text_response(text: &str, prompt: u64, completion: u64) -> Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": text}}],
        "usage": {"prompt_tokens": prompt, "completion_tokens": completion}
    })
}
