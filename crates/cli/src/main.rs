//! Railguard CLI
//!
//! Main entry point for the railguard command-line tool.
//! Runs questions through guardrails and an agent workflow, from the
//! terminal or a web UI.

mod bootstrap;
mod commands;
mod report;
mod server;

use clap::{Parser, Subcommand};
use commands::{ActionsCommand, AskCommand, ConfigureCommand, ServeCommand};
use railguard_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Railguard - compare agent answers with and without guardrails
#[derive(Parser, Debug)]
#[command(name = "railguard")]
#[command(about = "Compare agent answers with and without guardrails", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RAILGUARD_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAILGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Guardrails server URL
    #[arg(long, global = true, env = "RAILGUARD_GUARDRAILS_URL")]
    guardrails_url: Option<String>,

    /// Workflow server URL
    #[arg(long, global = true, env = "RAILGUARD_WORKFLOW_URL")]
    workflow_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web UI
    Serve(ServeCommand),

    /// Ask a question from the terminal
    Ask(AskCommand),

    /// Switch config files to a deployment environment
    Configure(ConfigureCommand),

    /// List the rail actions
    Actions(ActionsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load_with(cli.workspace, cli.config, |key| std::env::var(key).ok())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.guardrails_url,
        cli.workflow_url,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.log_format, config.no_color)?;

    tracing::info!("Railguard CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Guardrails: {} at {}", config.guardrails.backend.as_str(), config.guardrails.endpoint);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Configure(_) => "configure",
        Commands::Actions(_) => "actions",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(config).await,
        Commands::Ask(cmd) => cmd.execute(config).await,
        Commands::Configure(cmd) => cmd.execute(&config),
        Commands::Actions(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
