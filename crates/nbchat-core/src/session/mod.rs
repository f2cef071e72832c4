//! Conversation sessions
//!
//! - `agent_loop`: the orchestrator that runs a single turn
//! - `chat`: committed transcript and usage across turns

mod agent_loop;
mod chat;

pub use agent_loop::{
    ChatOrchestrator, PendingMessagesCallback, RoundUsageCallback, TurnHooks, TurnOutcome,
};
pub use chat::ChatSession;
