//! Tidemark CLI - Command-line interface
//!
//! Inspects `.torrent` files and dumps bencode trees.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use tidemark_core::TidemarkError;
use tidemark_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "tidemark")]
#[command(about = "Torrent metadata inspector")]
struct Cli {
    /// Console log level
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// Directory for the per-run debug log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    if let Err(error) = commands::handle_command(cli.command).await {
        match error.downcast_ref::<TidemarkError>() {
            Some(tidemark_error) => eprintln!("Error: {}", tidemark_error.user_message()),
            None => eprintln!("Error: {error:#}"),
        }
        tracing::debug!(error = ?error, "Command failed");
        std::process::exit(1);
    }

    Ok(())
}
