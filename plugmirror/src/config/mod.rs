//! Configuration file handling for ~/.plugmirror/config.ini.
//!
//! Loads user configuration with sensible defaults. Settings structs live in
//! [`settings`], INI key mapping in [`parser`]. Nothing here is ambient
//! state: the loaded [`MirrorConfig`] is passed explicitly into the syncer
//! and reader.

mod parser;
mod settings;

pub use settings::{
    CacheSettings, CatalogSettings, DisplaySettings, DownloadSettings, MirrorConfig,
    RefreshSettings, DEFAULT_BASE_URL, DEFAULT_CACHE_DIR,
};

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// No account identifier configured, so the catalog URL cannot be built
    #[error("catalog.user_id is not configured")]
    MissingUserId,

    /// No refresh secret configured, so the trigger can never be authorized
    #[error("refresh.secret is not configured")]
    MissingSecret,

    /// Provided refresh secret did not match the configured one
    #[error("refresh secret does not match")]
    SecretMismatch,
}

impl MirrorConfig {
    /// Load configuration from the default path (~/.plugmirror/config.ini).
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        parser::parse_ini(&ini)
    }

    /// First page of the catalog listing for the configured account.
    pub fn catalog_url(&self) -> Result<String, ConfigFileError> {
        let user_id = self
            .catalog
            .user_id
            .as_deref()
            .ok_or(ConfigFileError::MissingUserId)?;
        Ok(format!(
            "{}/recipes.json?search=&sort-by=name&user_id={}",
            self.catalog.base_url, user_id
        ))
    }

    /// Gate for the refresh trigger.
    ///
    /// Refuses before any sync work when the account id is missing, no
    /// secret is configured, or the provided secret does not match. This is
    /// the only place a configuration problem is fatal; nothing mid-batch
    /// ever re-checks it.
    pub fn authorize_refresh(&self, provided_secret: Option<&str>) -> Result<(), ConfigFileError> {
        if self.catalog.user_id.is_none() {
            return Err(ConfigFileError::MissingUserId);
        }
        let expected = self
            .refresh
            .secret
            .as_deref()
            .ok_or(ConfigFileError::MissingSecret)?;
        match provided_secret {
            Some(given) if given == expected => Ok(()),
            _ => Err(ConfigFileError::SecretMismatch),
        }
    }
}

/// Default config file location: `~/.plugmirror/config.ini`.
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".plugmirror")
        .join("config.ini")
}
