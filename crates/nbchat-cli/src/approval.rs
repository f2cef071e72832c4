//! Terminal approval prompts

use async_trait::async_trait;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use nbchat_core::{ApprovalGate, ToolCall};
use serde_json::Value;
use tracing::warn;

/// Human readable summary of a tool call for the approval prompt
pub fn describe_call(call: &ToolCall) -> String {
    let args: Option<Value> = serde_json::from_str(&call.function.arguments).ok();

    if call.name() == "execute_python_code" {
        if let Some(code) = args.as_ref().and_then(|a| a["code"].as_str()) {
            return code.to_string();
        }
    }

    match args {
        Some(args) => format!(
            "{}({})",
            call.name(),
            serde_json::to_string_pretty(&args).unwrap_or_default()
        ),
        None => format!("{}({})", call.name(), call.function.arguments),
    }
}

/// Asks on the terminal before every tool call
#[derive(Debug, Default)]
pub struct PromptApprovalGate;

#[async_trait]
impl ApprovalGate for PromptApprovalGate {
    async fn request_approval(&self, call: &ToolCall) -> bool {
        let name = call.name().to_string();
        let summary = describe_call(call);

        let answer = tokio::task::spawn_blocking(move || {
            println!();
            println!("{} {}", style("Tool request:").yellow().bold(), style(&name).cyan());
            for line in summary.lines() {
                println!("  {}", style(line).dim());
            }
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Allow {}?", name))
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(approved)) => approved,
            Ok(Err(e)) => {
                warn!(error = %e, "Approval prompt failed, denying tool call");
                false
            }
            Err(e) => {
                warn!(error = %e, "Approval prompt task failed, denying tool call");
                false
            }
        }
    }
}

/// Denies everything without asking; used when there is nobody to ask
#[derive(Debug, Default)]
pub struct NonInteractiveGate;

#[async_trait]
impl ApprovalGate for NonInteractiveGate {
    async fn request_approval(&self, call: &ToolCall) -> bool {
        println!(
            "{}: {} (auto-rejected in one-shot mode)",
            style("Tool pending").yellow(),
            call.name()
        );
        false
    }
}
