//! Chat session state across turns
//!
//! Holds the committed transcript and running usage totals for a host.
//! A turn either commits all of its messages or, on error, none of them.

use tracing::warn;

use super::agent_loop::{ChatOrchestrator, TurnHooks, TurnOutcome};
use crate::error::Result;
use crate::orchestration::Usage;
use crate::provider::Message;

/// One conversation with its committed transcript
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    total_usage: Usage,
    turns: usize,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing transcript
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages a renderer should show, without injected context
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_hidden_context())
    }

    pub fn total_usage(&self) -> Usage {
        self.total_usage
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Send a user message and commit the resulting transcript.
    ///
    /// On error the session is left exactly as it was before the call.
    pub async fn submit(
        &mut self,
        orchestrator: &ChatOrchestrator,
        text: impl Into<String>,
        hooks: &TurnHooks,
    ) -> Result<TurnOutcome> {
        let mut pending = self.messages.clone();
        pending.push(Message::user(text));

        match orchestrator.send(&pending, hooks).await {
            Ok(outcome) => {
                self.messages = outcome.messages.clone();
                self.total_usage += outcome.usage;
                self.turns += 1;
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Turn failed, transcript not committed");
                Err(e)
            }
        }
    }

    /// Drop the transcript and totals
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
