//! plugmirror CLI - command-line interface
//!
//! Thin glue over the plugmirror library: `refresh` is the authenticated
//! sync trigger, `export` emits the enriched catalog for the presentation
//! layer.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use plugmirror::config::MirrorConfig;
use plugmirror::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plugmirror")]
#[command(version = plugmirror::VERSION)]
#[command(about = "Mirror the TRMNL plugin catalog to local disk", long_about = None)]
struct Cli {
    /// Path to config.ini (default: ~/.plugmirror/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync the catalog: fetch listings, refresh stale metadata and images
    Refresh {
        /// Shared refresh secret; must match refresh.secret in config.ini
        #[arg(long)]
        secret: Option<String>,
    },
    /// Print the enriched catalog snapshot as JSON
    Export,
}

fn load_config(path: Option<&PathBuf>) -> Result<MirrorConfig, CliError> {
    let result = match path {
        Some(path) => MirrorConfig::load_from(path),
        None => MirrorConfig::load(),
    };
    result.map_err(CliError::Config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The export command writes JSON to stdout, so logs stay file-only there.
    let stdout_logs = matches!(&cli.command, Command::Refresh { .. });
    let _guard = match logging::init_logging(
        logging::default_log_dir(),
        logging::default_log_file(),
        stdout_logs,
    ) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Command::Refresh { secret } => commands::refresh::run(&config, secret.as_deref()).await,
        Command::Export => commands::export::run(&config),
    };

    if let Err(e) = result {
        e.exit();
    }
}
