//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. Pure data
//! types; parsing lives in [`super::parser`].

use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::sync::{DEFAULT_ASSET_TTL, DEFAULT_METADATA_TTL};
use std::path::PathBuf;

/// Default catalog host.
pub const DEFAULT_BASE_URL: &str = "https://usetrmnl.com";

/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "plugins";

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Catalog endpoint settings
    pub catalog: CatalogSettings,
    /// Refresh trigger and staleness settings
    pub refresh: RefreshSettings,
    /// Cache settings
    pub cache: CacheSettings,
    /// Download settings
    pub download: DownloadSettings,
    /// Display defaults handed to the presentation layer
    pub display: DisplaySettings,
}

/// Catalog endpoint configuration.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Catalog host, e.g. `https://usetrmnl.com`.
    pub base_url: String,
    /// Account identifier required to build the listing URL.
    pub user_id: Option<String>,
}

/// Refresh trigger and staleness configuration.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Shared secret gating the refresh trigger.
    pub secret: Option<String>,
    /// Metadata TTL in seconds (default ~23 hours).
    pub metadata_ttl_secs: u64,
    /// Asset TTL in seconds (default ~6.7 days).
    pub asset_ttl_secs: u64,
}

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Cache root directory; one subdirectory per plugin id.
    pub directory: PathBuf,
}

/// Download configuration.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// Timeout in seconds for HTTP requests.
    pub timeout: u64,
}

/// Display defaults consumed by the presentation layer.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    /// Site title.
    pub site_name: String,
    /// Initial color mode: "light" or "dark".
    pub default_color_mode: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                user_id: None,
            },
            refresh: RefreshSettings {
                secret: None,
                metadata_ttl_secs: DEFAULT_METADATA_TTL.as_secs(),
                asset_ttl_secs: DEFAULT_ASSET_TTL.as_secs(),
            },
            cache: CacheSettings {
                directory: PathBuf::from(DEFAULT_CACHE_DIR),
            },
            download: DownloadSettings {
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            display: DisplaySettings {
                site_name: "TRMNL Plugin Browser".to_string(),
                default_color_mode: "light".to_string(),
            },
        }
    }
}
