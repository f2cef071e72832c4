//! nbchat Core - tool-calling conversation orchestration
//!
//! This crate drives a multi-turn exchange between a user, a chat
//! completion endpoint and a set of locally executed tools:
//! - Message and tool-call data model matching the wire format
//! - Tool registry and executor
//! - Human-in-the-loop approval gates
//! - Ambient context injection with de-duplication
//! - The agent loop with usage and cost accounting

pub mod approval;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestration;
pub mod provider;
pub mod session;
pub mod tools;

pub use approval::{
    ApprovalGate, ApprovalPolicy, AutoApprove, ChannelApprovalGate, DENIED_TOOL_RESULT, DenyAll,
    approval_channel,
};
pub use config::{Config, ConfigManager, defaults};
pub use context::AmbientContext;
pub use error::{Error, Result, ToolError};
pub use orchestration::{RequestBuilder, SystemPrompt, Usage};
pub use provider::{
    ChatRequest, ChatResponse, Message, ModelCatalog, ModelPricing, OpenRouterTransport,
    OutboundRequest, ToolCall, Transport,
};
pub use session::{ChatOrchestrator, ChatSession, TurnHooks, TurnOutcome};
pub use tools::{BoxFuture, Tool, ToolContext, ToolDefinition, ToolExecutor, ToolRegistry};
