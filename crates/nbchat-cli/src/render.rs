//! Terminal rendering of transcript updates and usage

use console::style;
use nbchat_core::{DENIED_TOOL_RESULT, Message, Usage};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Maximum tool output lines echoed to the terminal
const MAX_TOOL_OUTPUT_LINES: usize = 12;

/// Prints messages appended to the working transcript since the last call
#[derive(Debug)]
pub struct TranscriptPrinter {
    printed: AtomicUsize,
}

impl TranscriptPrinter {
    /// Start after the first `already_shown` messages
    pub fn starting_at(already_shown: usize) -> Self {
        Self {
            printed: AtomicUsize::new(already_shown),
        }
    }

    pub fn print_new(&self, messages: &[Message]) {
        let start = self.printed.swap(messages.len(), Ordering::SeqCst);
        for message in messages.iter().skip(start) {
            print_message(message);
        }
    }
}

fn print_message(message: &Message) {
    match message {
        // Context messages and the user's own input are never echoed
        Message::System { .. } | Message::User { .. } => {}
        Message::Assistant { content, tool_calls } => {
            if let Some(text) = content.as_deref().filter(|t| !t.is_empty()) {
                println!("{}: {}", style("Assistant").bold().green(), text);
            }
            for call in tool_calls {
                println!("  {} {}", style("[Calling:").dim(), style(call.name()).yellow());
            }
        }
        Message::Tool { content, .. } => {
            if content == DENIED_TOOL_RESULT {
                println!("  {} {}", style("✗").red(), style("denied").dim());
                return;
            }
            println!("  {}", style("✓").green());
            for line in truncate_lines(content, MAX_TOOL_OUTPUT_LINES) {
                println!("    {}", style(line).dim());
            }
        }
    }
}

fn truncate_lines(text: &str, max: usize) -> Vec<String> {
    let total = text.lines().count();
    let mut lines: Vec<String> = text.lines().take(max).map(str::to_string).collect();
    if total > max {
        lines.push(format!("... ({} more lines)", total - max));
    }
    lines
}

/// Print token counts and cost for the last turn and the whole session
pub fn print_usage(turn: Usage, session: Usage) {
    println!(
        "{}",
        style(format!(
            "[tokens: {} in / {} out, ${:.4} | session: {} tokens, ${:.4}]",
            turn.prompt_tokens,
            turn.completion_tokens,
            turn.cost,
            session.total_tokens(),
            session.cost
        ))
        .dim()
    );
}

/// Print what a failed turn already cost, if anything
pub fn print_wasted_usage(spent: Usage) {
    if let Some(line) = wasted_usage_line(spent) {
        println!("{}", style(line).dim());
    }
}

fn wasted_usage_line(spent: Usage) -> Option<String> {
    if spent.total_tokens() == 0 {
        return None;
    }
    Some(format!(
        "[spent before failing: {} in / {} out, ${:.4}]",
        spent.prompt_tokens, spent.completion_tokens, spent.cost
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_lines() {
        let text = (1..=5).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        assert_eq!(truncate_lines(&text, 10).len(), 5);
        let truncated = truncate_lines(&text, 2);
        assert_eq!(truncated, vec!["1", "2", "... (3 more lines)"]);
    }

    #[test]
    fn test_wasted_usage_line() {
        assert_eq!(wasted_usage_line(Usage::default()), None);
        let spent = Usage {
            prompt_tokens: 120,
            completion_tokens: 30,
            cost: 0.0125,
        };
        assert_eq!(
            wasted_usage_line(spent).as_deref(),
            Some("[spent before failing: 120 in / 30 out, $0.0125]")
        );
    }

    #[test]
    fn test_printer_tracks_position() {
        let printer = TranscriptPrinter::starting_at(1);
        printer.print_new(&[Message::user("hi"), Message::assistant("hello")]);
        assert_eq!(printer.printed.load(Ordering::SeqCst), 2);
    }
}
