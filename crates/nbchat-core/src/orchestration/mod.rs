//! Orchestration building blocks shared by the agent loop
//!
//! This module contains:
//! - System prompt generation
//! - Outbound request construction
//! - Usage and cost accounting

mod request;
mod system_prompt;
mod usage;

pub use request::RequestBuilder;
pub use system_prompt::{DEFAULT_CLOSING, DEFAULT_SYSTEM_PROMPT, SystemPrompt};
pub use usage::{Usage, cost_of};
