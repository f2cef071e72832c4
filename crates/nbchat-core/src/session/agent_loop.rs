//! Agent loop - drives one conversation turn
//!
//! A turn is one or more rounds against the chat endpoint:
//! - Inject the ambient view context if it changed
//! - Build and send the request
//! - Record usage
//! - Ask for approval and execute each requested tool, in order
//! - Start another round while non-terminal tools were used
//!
//! Cancellation is checked between steps and while waiting on the endpoint
//! or the approval gate.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::approval::{ApprovalGate, DENIED_TOOL_RESULT};
use crate::config::{Config, defaults};
use crate::context::{AmbientContext, inject_view_context, view_context_message};
use crate::error::{Error, Result};
use crate::orchestration::{RequestBuilder, SystemPrompt, Usage};
use crate::provider::{Message, ModelCatalog, ToolCall, Transport};
use crate::tools::{ToolContext, ToolExecutor, ToolRegistry};

/// Observer receiving the full working transcript after every change
pub type PendingMessagesCallback = Arc<dyn Fn(&[Message]) + Send + Sync>;

/// Observer receiving each round's usage as soon as the response arrives
pub type RoundUsageCallback = Arc<dyn Fn(Usage) + Send + Sync>;

/// Per-turn hooks supplied by the host
#[derive(Clone, Default)]
pub struct TurnHooks {
    /// Called synchronously after each transcript mutation
    pub on_pending_messages: Option<PendingMessagesCallback>,
    /// Called once per round, including rounds of a turn that later fails
    pub on_round_usage: Option<RoundUsageCallback>,
    /// Cancels the turn between steps; a running tool is never interrupted
    pub cancel: CancellationToken,
}

impl TurnHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: impl Fn(&[Message]) + Send + Sync + 'static) -> Self {
        self.on_pending_messages = Some(Arc::new(observer));
        self
    }

    pub fn with_usage_observer(mut self, observer: impl Fn(Usage) + Send + Sync + 'static) -> Self {
        self.on_round_usage = Some(Arc::new(observer));
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn notify(&self, transcript: &[Message]) {
        if let Some(observer) = &self.on_pending_messages {
            observer(transcript);
        }
    }

    fn record_usage(&self, usage: Usage) {
        if let Some(observer) = &self.on_round_usage {
            observer(usage);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

/// Result of a completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Input transcript plus everything appended during the turn
    pub messages: Vec<Message>,
    /// Usage summed over every round
    pub usage: Usage,
    /// Number of requests sent
    pub rounds: usize,
}

/// How a batch of tool calls ended
enum BatchOutcome {
    Completed,
    Denied,
}

/// Drives tool-calling conversations against one model
pub struct ChatOrchestrator {
    transport: Arc<dyn Transport>,
    approval: Arc<dyn ApprovalGate>,
    executor: ToolExecutor,
    requests: RequestBuilder,
    ambient: AmbientContext,
    catalog: ModelCatalog,
    max_rounds: usize,
}

impl ChatOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        approval: Arc<dyn ApprovalGate>,
        registry: ToolRegistry,
        ambient: AmbientContext,
        requests: RequestBuilder,
    ) -> Self {
        Self {
            transport,
            approval,
            executor: ToolExecutor::new(registry),
            requests,
            ambient,
            catalog: ModelCatalog::builtin(),
            max_rounds: defaults::MAX_ROUNDS,
        }
    }

    /// Create an orchestrator using the model, key, prices and round cap from `config`
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn Transport>,
        approval: Arc<dyn ApprovalGate>,
        registry: ToolRegistry,
        ambient: AmbientContext,
    ) -> Self {
        let requests = RequestBuilder::new(config.model.clone(), config.get_api_key());
        Self::new(transport, approval, registry, ambient, requests)
            .with_catalog(config.catalog())
            .with_max_rounds(config.max_rounds)
    }

    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// At least one round is always allowed
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: SystemPrompt) -> Self {
        self.requests = self.requests.with_system_prompt(system_prompt);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.executor.registry()
    }

    pub fn ambient(&self) -> &AmbientContext {
        &self.ambient
    }

    pub fn model(&self) -> &str {
        self.requests.model()
    }

    /// Run one turn starting from `messages`.
    ///
    /// Any error ends the turn; progress already reported through the
    /// observer stays visible to the host.
    pub async fn send(&self, messages: &[Message], hooks: &TurnHooks) -> Result<TurnOutcome> {
        let mut transcript = messages.to_vec();
        let mut usage = Usage::default();
        let price = self.catalog.price(self.model());
        let mut rounds = 0;

        loop {
            hooks.check_cancelled()?;
            if rounds >= self.max_rounds {
                warn!(max_rounds = self.max_rounds, "Turn hit the round limit");
                return Err(Error::RecursionLimitExceeded(self.max_rounds));
            }
            rounds += 1;

            inject_view_context(&mut transcript, view_context_message(&self.ambient));
            let request = self.requests.build(&transcript, self.registry(), &self.ambient)?;

            info!(
                round = rounds,
                model = %request.body.model,
                message_count = request.body.messages.len(),
                "Calling chat endpoint"
            );
            let response = tokio::select! {
                biased;
                _ = hooks.cancel.cancelled() => return Err(Error::Cancelled),
                response = self.transport.send(&request) => response?,
            };

            let round_usage = Usage::from_response(response.usage, price);
            usage += round_usage;
            hooks.record_usage(round_usage);
            debug!(
                round = rounds,
                prompt_tokens = round_usage.prompt_tokens,
                completion_tokens = round_usage.completion_tokens,
                cost = round_usage.cost,
                "Round usage"
            );
            hooks.notify(&transcript);

            let Some(message) = response.first_message() else {
                warn!(round = rounds, "Response contained no choices");
                return Ok(TurnOutcome {
                    messages: transcript,
                    usage,
                    rounds,
                });
            };

            let tool_calls = message.tool_calls();
            if tool_calls.is_empty() {
                transcript.push(Message::assistant(message.content.clone().unwrap_or_default()));
                hooks.notify(&transcript);
                return Ok(TurnOutcome {
                    messages: transcript,
                    usage,
                    rounds,
                });
            }

            info!(
                round = rounds,
                tool_call_count = tool_calls.len(),
                "Model requested tool calls"
            );
            transcript.push(Message::assistant_tool_calls(tool_calls.to_vec()));
            hooks.notify(&transcript);

            let batch = self.run_tool_calls(tool_calls, &mut transcript, hooks).await?;
            if let BatchOutcome::Denied = batch {
                return Ok(TurnOutcome {
                    messages: transcript,
                    usage,
                    rounds,
                });
            }

            if !self.needs_follow_up(tool_calls) {
                debug!(round = rounds, "Only terminal tools were called, ending turn");
                return Ok(TurnOutcome {
                    messages: transcript,
                    usage,
                    rounds,
                });
            }
        }
    }

    /// Approve and execute calls strictly in order; stop at the first denial
    async fn run_tool_calls(
        &self,
        tool_calls: &[ToolCall],
        transcript: &mut Vec<Message>,
        hooks: &TurnHooks,
    ) -> Result<BatchOutcome> {
        for (index, call) in tool_calls.iter().enumerate() {
            hooks.check_cancelled()?;

            let approved = tokio::select! {
                biased;
                _ = hooks.cancel.cancelled() => return Err(Error::Cancelled),
                approved = self.approval.request_approval(call) => approved,
            };

            if !approved {
                info!(tool = call.name(), tool_call_id = %call.id, "Tool call denied");
                transcript.push(Message::tool_result(&call.id, DENIED_TOOL_RESULT));
                hooks.notify(transcript);
                let abandoned = tool_calls.len() - index - 1;
                if abandoned > 0 {
                    debug!(abandoned, "Skipping remaining tool calls in batch");
                }
                return Ok(BatchOutcome::Denied);
            }

            let ctx =
                ToolContext::new(&call.id, self.ambient.clone()).with_cancel(hooks.cancel.clone());
            let output = self.executor.execute(call, &ctx).await?;
            debug!(tool = call.name(), output_len = output.len(), "Tool finished");

            transcript.push(Message::tool_result(&call.id, output));
            hooks.notify(transcript);
        }
        Ok(BatchOutcome::Completed)
    }

    /// Another round is needed unless every call in the batch was terminal
    fn needs_follow_up(&self, tool_calls: &[ToolCall]) -> bool {
        tool_calls
            .iter()
            .any(|call| self.registry().requires_follow_up(call.name()))
    }
}
