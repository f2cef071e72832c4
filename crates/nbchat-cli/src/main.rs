//! nbchat CLI - chat with a notebook assistant from the terminal
//!
//! The CLI is a thin host around nbchat-core: it supplies the approval
//! prompt, the tools, and a document loaded from disk as ambient state.

mod approval;
mod render;
mod tools;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use nbchat_core::{
    AmbientContext, ApprovalGate, ApprovalPolicy, ChatOrchestrator, ChatSession, ConfigManager,
    Message, OpenRouterTransport, ToolRegistry, TurnHooks, Usage, defaults,
};

use approval::{NonInteractiveGate, PromptApprovalGate};
use render::{TranscriptPrinter, print_usage, print_wasted_usage};

#[derive(Parser)]
#[command(name = "nbchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Chat with an assistant that can run Python and edit your document",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model to use (defaults to config setting)
    #[arg(short, long)]
    model: Option<String>,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document to load as the assistant's working context
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// Python interpreter used by execute_python_code
    #[arg(long, default_value = "python3")]
    python: String,

    /// Auto-approve all tool calls (use with caution!)
    #[arg(long)]
    auto_approve: bool,

    /// Execute a single prompt and exit (non-interactive mode)
    #[arg(long)]
    one_shot: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat mode
    Chat,

    /// Show available tools
    Tools,

    /// Show known models and prices
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };

    // RUST_LOG wins, then --verbose, then [general] log_level
    let default_filter = log_filter(cli.verbose, &config_manager.config().general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Some(Commands::Tools) => show_tools(&cli.python)?,
        Some(Commands::Models) => show_models(&config_manager),
        Some(Commands::Chat) | None => run(&cli, &config_manager).await?,
    }

    Ok(())
}

/// Filter used when RUST_LOG is not set
fn log_filter(verbose: bool, configured: &str) -> &str {
    if verbose {
        "info,nbchat_core=debug"
    } else if configured.trim().is_empty() {
        defaults::LOG_LEVEL
    } else {
        configured
    }
}

/// Everything a chat needs, built from config and flags
struct Host {
    orchestrator: ChatOrchestrator,
    ambient: AmbientContext,
    document_path: Option<PathBuf>,
}

impl Host {
    fn build(
        cli: &Cli,
        config_manager: &ConfigManager,
        interactive: bool,
    ) -> anyhow::Result<Self> {
        let mut config = config_manager.config().clone();
        if let Some(model) = &cli.model {
            config.model = model.clone();
        }

        let ambient = AmbientContext::new();
        if let Some(path) = &cli.document {
            let document = if path.exists() {
                std::fs::read_to_string(path)?
            } else {
                String::new()
            };
            ambient.set_document(document);
            ambient.set_view(describe_view(path, &ambient));
        }

        let inner: Arc<dyn ApprovalGate> = if interactive {
            Arc::new(PromptApprovalGate)
        } else {
            Arc::new(NonInteractiveGate)
        };
        let approval = ApprovalPolicy::new(inner)
            .with_auto_approve(config.approval.auto_approve.iter().cloned())
            .approve_all(cli.auto_approve || config.approval.approve_all);

        let transport = OpenRouterTransport::with_base_url(config.base_url.clone())?;
        let registry = tools::default_registry(&cli.python)?;

        let orchestrator = ChatOrchestrator::from_config(
            &config,
            Arc::new(transport),
            Arc::new(approval),
            registry,
            ambient.clone(),
        );

        Ok(Self {
            orchestrator,
            ambient,
            document_path: cli.document.clone(),
        })
    }

    /// Run one turn, printing progress; Ctrl-C cancels it
    async fn turn(&self, session: &mut ChatSession, input: &str) {
        let before = self.ambient.document();
        let printer = Arc::new(TranscriptPrinter::starting_at(session.messages().len()));
        let spent = Arc::new(Mutex::new(Usage::default()));
        let cancel = CancellationToken::new();
        let hooks = TurnHooks::new()
            .with_observer({
                let printer = printer.clone();
                move |messages: &[Message]| printer.print_new(messages)
            })
            .with_usage_observer({
                let spent = spent.clone();
                move |usage| *spent.lock() += usage
            })
            .with_cancel(cancel.clone());

        let ctrl_c = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            }
        });

        let result = session.submit(&self.orchestrator, input, &hooks).await;
        ctrl_c.abort();

        match result {
            Ok(outcome) => print_usage(outcome.usage, session.total_usage()),
            Err(e) => {
                println!("{}", style(format!("Error: {}", e)).red());
                print_wasted_usage(*spent.lock());
            }
        }

        if self.ambient.document() != before {
            self.save_document();
        }
    }

    fn save_document(&self) {
        let Some(path) = &self.document_path else {
            return;
        };
        match std::fs::write(path, self.ambient.document()) {
            Ok(()) => println!("  {} {}", style("Saved").green(), style(path.display()).dim()),
            Err(e) => {
                let message = format!("Failed to save {}: {}", path.display(), e);
                println!("{}", style(message).red());
            }
        }
        self.ambient.set_view(describe_view(path, &self.ambient));
    }
}

fn describe_view(path: &Path, ambient: &AmbientContext) -> String {
    format!(
        "The user has {} open in the terminal ({} lines).",
        path.display(),
        ambient.document().lines().count()
    )
}

async fn run(cli: &Cli, config_manager: &ConfigManager) -> anyhow::Result<()> {
    if !config_manager.has_api_key() {
        show_setup_instructions(config_manager);
        return Ok(());
    }

    if let Some(prompt) = &cli.one_shot {
        let host = Host::build(cli, config_manager, false)?;
        let mut session = ChatSession::new();
        host.turn(&mut session, prompt).await;
        return Ok(());
    }

    let host = Host::build(cli, config_manager, true)?;
    run_chat(&host).await
}

async fn run_chat(host: &Host) -> anyhow::Result<()> {
    println!("{}", style("nbchat").bold().cyan());
    println!(
        "Model: {}  {}",
        style(host.orchestrator.model()).green(),
        style("(/clear to reset, /exit to quit)").dim()
    );
    println!();

    let mut session = ChatSession::new();

    loop {
        let line = tokio::task::spawn_blocking(|| {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("You")
                .allow_empty(true)
                .interact_text()
        })
        .await??;

        let input = line.trim();
        match input {
            "" => continue,
            "/exit" | "/quit" => break,
            "/clear" => {
                session.clear();
                println!("{}", style("Conversation cleared").dim());
                continue;
            }
            "/usage" => {
                let total = session.total_usage();
                println!(
                    "{} turns, {} prompt + {} completion tokens, ${:.4}",
                    session.turns(),
                    total.prompt_tokens,
                    total.completion_tokens,
                    total.cost
                );
                continue;
            }
            _ => {}
        }

        host.turn(&mut session, input).await;
        println!();
    }

    Ok(())
}

fn show_tools(python: &str) -> anyhow::Result<()> {
    let registry: ToolRegistry = tools::default_registry(python)?;

    println!("{}", style("Available Tools:").bold());
    println!();
    for tool in registry.iter() {
        let kind = if tool.requires_follow_up() {
            style("follow-up").yellow()
        } else {
            style("terminal").green()
        };
        println!(
            "  {:<22} {:<50} [{}]",
            style(tool.name()).cyan(),
            tool.description(),
            kind
        );
    }
    Ok(())
}

fn show_models(config_manager: &ConfigManager) {
    let config = config_manager.config();
    let catalog = config.catalog();

    println!("{}", style("Models (USD per million tokens):").bold());
    println!();
    for entry in catalog.models() {
        let marker = if entry.model == config.model { "*" } else { " " };
        println!(
            "{} {:<36} {:<24} {:>8.2} in {:>8.2} out",
            marker,
            style(&entry.model).cyan(),
            entry.display_name(),
            entry.cost.prompt,
            entry.cost.completion
        );
    }
}

fn show_setup_instructions(config_manager: &ConfigManager) {
    let config = config_manager.config();

    println!("{}", style("Setup Required").bold().yellow());
    println!("No API key configured. Please set one up before using nbchat.");
    println!();

    println!("{}", style("Option 1: Environment Variable (Quick)").bold());
    println!("  export {}=\"your-api-key-here\"", style(&config.api_key_env).cyan());
    println!();

    println!("{}", style("Option 2: Config File (Persistent)").bold());
    println!("  Edit: {}", style(config_manager.config_path().display()).cyan());
    println!();
    println!("  Example config:");
    println!("  {}", style("─".repeat(50)).dim());
    println!(
        r#"  model = "openai/gpt-4.1-mini"
  api_key = "your-api-key-here"

  [approval]
  auto_approve = ["interact_with_app"]"#
    );
    println!("  {}", style("─".repeat(50)).dim());
    println!();
    println!("For more help: {}", style("nbchat --help").cyan());
}
