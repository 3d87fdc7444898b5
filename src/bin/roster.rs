//! Roster Server Binary
//!
//! Serves the user capabilities over line-delimited JSON-RPC on stdin/stdout.

use anyhow::Context;
use clap::Parser;
use roster::config::{ConfigLoader, RosterConfig};
use roster::logging::init_logging;
use roster::server;
use roster::transport::run_stdio;
use std::path::PathBuf;
use tracing::info;

/// Roster - user directory capability server
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Serve user actions, resources and prompts over stdio JSON-RPC")]
struct Cli {
    /// Working directory used for config discovery and relative data paths
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    config: Option<PathBuf>,

    /// User collection file
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    log_format: Option<String>,

    /// Log output (stderr, file, file+stderr)
    #[arg(long)]
    log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut RosterConfig) {
        if let Some(data_file) = &self.data_file {
            config.storage.data_file = data_file.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let workspace = std::fs::canonicalize(&cli.workspace)
        .with_context(|| format!("Workspace not accessible: {}", cli.workspace.display()))?;
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => ConfigLoader::load(&workspace).context("Failed to load configuration")?,
    };
    cli.apply_overrides(&mut config);

    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    // Registration conflicts are fatal
    let router =
        server::from_config(&config, &workspace).context("Failed to register capabilities")?;
    info!(capabilities = router.registry().len(), "Capabilities registered");

    run_stdio(&router).await.context("Transport failed")?;
    info!("Shutting down");
    Ok(())
}
