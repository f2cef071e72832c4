//! Approval system for human-in-the-loop control
//!
//! Every tool call goes through an [`ApprovalGate`] before it runs. A
//! denial is not an error: the orchestrator records it as a tool result and
//! stops processing the rest of the batch.

mod channel;

pub use channel::{ApprovalReceiver, ApprovalRequest, ChannelApprovalGate, approval_channel};

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::provider::ToolCall;

/// Tool result content recorded when a call is denied
pub const DENIED_TOOL_RESULT: &str = "Tool execution was not approved by the user.";

/// Decides whether a requested tool call may run
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    /// Resolve to `true` to run the call, `false` to deny it
    async fn request_approval(&self, call: &ToolCall) -> bool;
}

/// Approves every call
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn request_approval(&self, _call: &ToolCall) -> bool {
        true
    }
}

/// Denies every call
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl ApprovalGate for DenyAll {
    async fn request_approval(&self, _call: &ToolCall) -> bool {
        false
    }
}

/// Auto-approves a configured set of tools and asks `inner` about the rest
pub struct ApprovalPolicy {
    auto_approve: HashSet<String>,
    approve_all: bool,
    inner: Arc<dyn ApprovalGate>,
}

impl ApprovalPolicy {
    pub fn new(inner: Arc<dyn ApprovalGate>) -> Self {
        Self {
            auto_approve: HashSet::new(),
            approve_all: false,
            inner,
        }
    }

    /// Add tool names that never need a prompt
    pub fn with_auto_approve<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_approve.extend(names.into_iter().map(Into::into));
        self
    }

    /// Approve everything without asking (dangerous - for trusted hosts)
    pub fn approve_all(mut self, enabled: bool) -> Self {
        self.approve_all = enabled;
        self
    }

    /// Check if a tool should be auto-approved
    pub fn should_auto_approve(&self, tool_name: &str) -> bool {
        self.approve_all || self.auto_approve.contains(tool_name)
    }
}

#[async_trait]
impl ApprovalGate for ApprovalPolicy {
    async fn request_approval(&self, call: &ToolCall) -> bool {
        if self.should_auto_approve(call.name()) {
            debug!(tool = call.name(), "Tool auto-approved");
            return true;
        }
        self.inner.request_approval(call).await
    }
}
