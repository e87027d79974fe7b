//! The `refresh` command: the authenticated sync trigger.
//!
//! Mirrors the original trigger shape: refuses up front unless an account id
//! is configured and the provided secret matches, then runs one sync pass.
//! Re-invoking while a pass is running is rejected, not interleaved.

use crate::error::CliError;
use plugmirror::config::MirrorConfig;
use plugmirror::http::ReqwestClient;
use plugmirror::sync::{CatalogSyncer, SyncOptions};
use plugmirror::time::SystemClock;
use tracing::info;

pub async fn run(config: &MirrorConfig, secret: Option<&str>) -> Result<(), CliError> {
    config.authorize_refresh(secret).map_err(CliError::Config)?;

    let options = SyncOptions::from_config(config).map_err(CliError::Config)?;
    let http =
        ReqwestClient::with_timeout(config.download.timeout).map_err(|e| CliError::Http(e.to_string()))?;

    info!(cache_root = %options.cache_root.display(), "refresh authorized");
    let syncer = CatalogSyncer::new(http, SystemClock, options);
    let report = syncer.sync().await.map_err(CliError::Sync)?;

    println!("{report}");
    if report.truncation.is_some() {
        println!("note: the catalog fetch stopped early; cached data remains valid");
    }
    Ok(())
}
