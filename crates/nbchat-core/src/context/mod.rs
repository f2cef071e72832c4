//! Ambient host state and context injection
//!
//! The host writes what it wants the model to see into an
//! [`AmbientContext`]; the orchestrator reads it once per round. The
//! `document` slot feeds the initial system prompt, the `view` slot feeds a
//! separate system message that is inserted into the transcript only when
//! it changed since the last one.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::provider::Message;

/// Leading marker on injected context messages; renderers hide them
pub const HIDDEN_CONTEXT_MARKER: &str = ":";

/// Preamble of the view context message
pub const VIEW_CONTEXT_PREAMBLE: &str =
    "The following is information about what the user is seeing on the web application.";

/// Placeholder used when the view slot is empty
pub const NO_CONTEXT_AVAILABLE: &str = "There is no context available.";

#[derive(Debug, Default)]
struct Slots {
    document: String,
    view: String,
}

/// Shared handle to the latest host state snapshot
#[derive(Debug, Clone, Default)]
pub struct AmbientContext {
    slots: Arc<RwLock<Slots>>,
}

impl AmbientContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current document snapshot
    pub fn document(&self) -> String {
        self.slots.read().document.clone()
    }

    pub fn set_document(&self, document: impl Into<String>) {
        self.slots.write().document = document.into();
    }

    /// Current view snapshot
    pub fn view(&self) -> String {
        self.slots.read().view.clone()
    }

    pub fn set_view(&self, view: impl Into<String>) {
        self.slots.write().view = view.into();
    }
}

/// Render the view context system message for the current ambient state
pub fn view_context_message(ambient: &AmbientContext) -> Message {
    let view = ambient.view();
    if view.is_empty() {
        return Message::system(format!("{}{}", HIDDEN_CONTEXT_MARKER, NO_CONTEXT_AVAILABLE));
    }
    // Rendered as a JSON string literal
    let quoted = serde_json::to_string_pretty(&view).unwrap_or(view);
    Message::system(format!("{}{}{}", HIDDEN_CONTEXT_MARKER, VIEW_CONTEXT_PREAMBLE, quoted))
}

/// Insert `context` into `transcript` unless the last system message
/// already carries the same text.
///
/// A trailing user message keeps its position at the end: the context goes
/// right before it, since that is what the user was looking at when typing.
/// Returns whether the transcript changed.
pub fn inject_view_context(transcript: &mut Vec<Message>, context: Message) -> bool {
    let last_system = transcript.iter().rev().find(|m| m.is_system());
    if last_system.is_some_and(|m| m.content() == context.content()) {
        return false;
    }

    match transcript.last() {
        Some(last) if last.is_user() => {
            let at = transcript.len() - 1;
            transcript.insert(at, context);
        }
        _ => transcript.push(context),
    }
    true
}
