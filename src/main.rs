// ABOUTME: Entry point for the cdrelease CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use std::env;
use std::path::PathBuf;

use cdrelease::config::{self, RawConfig};
use cdrelease::error::Result;
use cdrelease::output::{Output, OutputMode};
use cdrelease::types::DeploymentId;
use clap::Parser;
use cli::{Cli, Commands};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| cwd.clone());
    let output = Output::new(mode);

    match cli.command {
        Commands::Init { application, force } => {
            config::init_config(&cwd, application.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Prepare => {
            let raw = load_config(cli.config, &cwd)?;
            commands::prepare(raw, &data_dir, output).await
        }
        Commands::Deploy => {
            let raw = load_config(cli.config, &cwd)?;
            commands::deploy(raw, &data_dir, output, cancel_on_ctrl_c()).await
        }
        Commands::Status { deployment_id } => {
            let raw = load_config(cli.config, &cwd)?;
            commands::status(raw, &data_dir, DeploymentId::new(deployment_id), output).await
        }
    }
}

fn load_config(path: Option<PathBuf>, cwd: &std::path::Path) -> Result<RawConfig> {
    match path {
        Some(path) => RawConfig::load(&path),
        None => RawConfig::discover(cwd),
    }
}

/// Stop monitoring on Ctrl-C. The deployment itself keeps running in CodeDeploy.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; stopping status polling");
            token.cancel();
        }
    });
    cancel
}
