//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use plugmirror::config::ConfigFileError;
use plugmirror::reader::ReadError;
use plugmirror::sync::SyncError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration problem (load, validation, or trigger authorization)
    Config(ConfigFileError),
    /// Sync could not start
    Sync(SyncError),
    /// HTTP client could not be constructed
    Http(String),
    /// Failed to read the cache
    Read(ReadError),
    /// Failed to serialize the export output
    Export(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::MissingUserId) => {
                eprintln!();
                eprintln!("Set your TRMNL account id in ~/.plugmirror/config.ini:");
                eprintln!("  [catalog]");
                eprintln!("  user_id = <your user id>");
                eprintln!();
                eprintln!("You can find it in any of your plugin's variables under trmnl.user.id.");
            }
            CliError::Config(ConfigFileError::MissingSecret) => {
                eprintln!();
                eprintln!("Set a refresh secret in ~/.plugmirror/config.ini:");
                eprintln!("  [refresh]");
                eprintln!("  secret = <shared secret>");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Sync(e) => write!(f, "sync failed: {}", e),
            CliError::Http(msg) => write!(f, "{}", msg),
            CliError::Read(e) => write!(f, "failed to read cache: {}", e),
            CliError::Export(e) => write!(f, "failed to serialize catalog: {}", e),
        }
    }
}

impl std::error::Error for CliError {}
