//! plugmirror - Local mirror of the TRMNL plugin catalog
//!
//! This library mirrors a remote, paginated plugin catalog to local disk,
//! caches plugin icons and screenshots with age-based refresh, and loads the
//! cached records back as an enriched, presentation-ready model.
//!
//! # High-Level API
//!
//! ```ignore
//! use plugmirror::config::MirrorConfig;
//! use plugmirror::http::ReqwestClient;
//! use plugmirror::sync::{CatalogSyncer, SyncOptions};
//! use plugmirror::time::SystemClock;
//!
//! let config = MirrorConfig::load()?;
//! let options = SyncOptions::from_config(&config)?;
//! let syncer = CatalogSyncer::new(ReqwestClient::new()?, SystemClock, options);
//! let report = syncer.sync().await?;
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod http;
pub mod logging;
pub mod reader;
pub mod sync;
pub mod time;

/// Version of the plugmirror library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
