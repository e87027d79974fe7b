//! Catalog synchronization.
//!
//! [`CatalogSyncer`] orchestrates one refresh pass: fetch the full paginated
//! listing, then bring each plugin's cache entry up to date under two
//! independent staleness policies (metadata vs. images). Plugins are
//! independent records; one failing never aborts the batch.

mod report;

pub use report::{EntryOutcome, SyncReport};

use crate::cache::{self, AssetCache, CacheError};
use crate::catalog::{PageFetcher, PluginRecord};
use crate::config::{ConfigFileError, MirrorConfig};
use crate::http::HttpClient;
use crate::time::{file_age, Clock};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Metadata TTL default: just under one day.
///
/// A daily sync job plus a full 24h TTL would leave entries one scheduler
/// jitter away from skipping a whole day, so the window is 23 hours.
pub const DEFAULT_METADATA_TTL: Duration = Duration::from_secs(82_800);

/// Asset TTL default: just under one week. Images churn far less than
/// metadata, so they refresh on a much longer cycle.
pub const DEFAULT_ASSET_TTL: Duration = Duration::from_secs(579_600);

/// Errors that abort a sync before any per-plugin work starts.
///
/// Everything past this boundary is per-plugin and recoverable.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another sync is holding the guard. Overlapping refresh triggers must
    /// not interleave writes to the same entry directories.
    #[error("a sync is already running")]
    AlreadyRunning,

    /// The cache root could not be created.
    #[error("cache root unavailable: {0}")]
    CacheRoot(std::io::Error),
}

/// Why one plugin's sync was abandoned. Logged and tallied, never fatal.
#[derive(Debug, Error)]
enum EntryError {
    #[error("record has no usable id")]
    MissingId,

    #[error("refusing id with path separators: {0:?}")]
    UnsafeId(String),

    #[error("failed to create entry directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteMetadata {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("record not serializable: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Asset(#[from] CacheError),
}

/// Construction parameters for [`CatalogSyncer`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Cache root; one subdirectory per plugin id.
    pub cache_root: PathBuf,
    /// First page of the paginated catalog endpoint.
    pub catalog_url: String,
    /// Maximum age of `data.json` before it is rewritten.
    pub metadata_ttl: Duration,
    /// Maximum age of icons/screenshots before they are re-downloaded.
    pub asset_ttl: Duration,
}

impl SyncOptions {
    /// Options with default TTLs.
    pub fn new(cache_root: impl Into<PathBuf>, catalog_url: impl Into<String>) -> Self {
        Self {
            cache_root: cache_root.into(),
            catalog_url: catalog_url.into(),
            metadata_ttl: DEFAULT_METADATA_TTL,
            asset_ttl: DEFAULT_ASSET_TTL,
        }
    }

    /// Derives options from loaded configuration.
    ///
    /// Fails only when the catalog URL cannot be built (no user id
    /// configured) - the same boundary check the refresh trigger applies.
    pub fn from_config(config: &MirrorConfig) -> Result<Self, ConfigFileError> {
        Ok(Self {
            cache_root: config.cache.directory.clone(),
            catalog_url: config.catalog_url()?,
            metadata_ttl: Duration::from_secs(config.refresh.metadata_ttl_secs),
            asset_ttl: Duration::from_secs(config.refresh.asset_ttl_secs),
        })
    }
}

/// Mirrors the remote catalog into the on-disk cache.
pub struct CatalogSyncer<H: HttpClient, C: Clock> {
    http: H,
    clock: C,
    options: SyncOptions,
    /// Single-flight guard: concurrent triggers get [`SyncError::AlreadyRunning`].
    guard: Mutex<()>,
}

impl<H: HttpClient, C: Clock> CatalogSyncer<H, C> {
    pub fn new(http: H, clock: C, options: SyncOptions) -> Self {
        Self {
            http,
            clock,
            options,
            guard: Mutex::new(()),
        }
    }

    /// Runs one full sync pass and reports what happened.
    ///
    /// An empty or truncated fetch is not an error: whatever records arrived
    /// are processed and the truncation reason is carried in the report.
    /// Re-running with fresh caches performs zero writes.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let _guard = self
            .guard
            .try_lock()
            .map_err(|_| SyncError::AlreadyRunning)?;

        fs::create_dir_all(&self.options.cache_root).map_err(SyncError::CacheRoot)?;

        info!(url = %self.options.catalog_url, "starting catalog sync");
        let fetched = PageFetcher::new(&self.http)
            .fetch_all(&self.options.catalog_url)
            .await;
        if let Some(reason) = &fetched.truncation {
            warn!(%reason, records = fetched.records.len(), "catalog fetch truncated");
        }

        let mut report = SyncReport::new(fetched.truncation.clone());
        for record in &fetched.records {
            report.processed += 1;
            match self.sync_entry(record).await {
                Ok(outcome) => report.tally(outcome),
                Err(e) => {
                    warn!(error = %e, "plugin sync failed, continuing with the rest");
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            complete = report.truncation.is_none(),
            "catalog sync finished"
        );
        Ok(report)
    }

    /// Brings one plugin's cache entry up to date.
    async fn sync_entry(&self, record: &PluginRecord) -> Result<EntryOutcome, EntryError> {
        let id = record.id().ok_or(EntryError::MissingId)?;
        if id.contains(['/', '\\']) || id.contains("..") {
            return Err(EntryError::UnsafeId(id));
        }

        let dir = cache::entry_dir(&self.options.cache_root, &id);
        fs::create_dir_all(&dir).map_err(|source| EntryError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let data_path = dir.join(cache::path::DATA_FILE);
        let existed = data_path.exists();
        let metadata_written = self.refresh_metadata(record, &data_path)?;

        let assets = AssetCache::new(&self.http, &self.clock);
        let mut asset_written = false;

        if let Some(url) = record.icon_url() {
            let icon_name = cache::icon_file_name(record.icon_content_type());
            let icon_path = dir.join(&icon_name);
            if assets
                .ensure_fresh(url, &icon_path, Some(self.options.asset_ttl))
                .await?
            {
                asset_written = true;
                remove_other_assets(&dir, "icon", &icon_name);
            }
        }

        if let Some(url) = record.screenshot_url() {
            let shot_path = dir.join(cache::screenshot_file_name());
            if assets
                .ensure_fresh(url, &shot_path, Some(self.options.asset_ttl))
                .await?
            {
                asset_written = true;
            }
        }

        let outcome = if !existed {
            EntryOutcome::Created
        } else if metadata_written || asset_written {
            EntryOutcome::Updated
        } else {
            EntryOutcome::Fresh
        };
        debug!(id, ?outcome, "entry synced");
        Ok(outcome)
    }

    /// Rewrites `data.json` when absent or older than the metadata TTL
    /// (exclusive boundary). Returns whether a write happened.
    fn refresh_metadata(
        &self,
        record: &PluginRecord,
        data_path: &Path,
    ) -> Result<bool, EntryError> {
        let stale = match file_age(&self.clock, data_path) {
            None => true,
            Some(age) => age > self.options.metadata_ttl,
        };
        if !stale {
            return Ok(false);
        }

        let body = record.to_pretty_json()?;
        fs::write(data_path, body).map_err(|source| EntryError::WriteMetadata {
            path: data_path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }
}

/// Deletes stale sibling assets (`<stem>.*`) other than `keep`.
///
/// Runs only after a successful download, so a changed icon content type
/// replaces the old file instead of accumulating next to it.
fn remove_other_assets(dir: &Path, stem: &str, keep: &str) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let same_stem = path.file_stem().and_then(|s| s.to_str()) == Some(stem);
        let is_keep = path.file_name().and_then(|n| n.to_str()) == Some(keep);
        if same_stem && !is_keep {
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "failed to remove stale asset");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockHttpClient;
    use crate::time::mock::FixedClock;
    use serde_json::json;
    use tempfile::TempDir;

    const CATALOG: &str = "https://catalog.example/recipes.json";

    fn catalog_page(records: serde_json::Value) -> String {
        json!({"data": records, "next_page_url": null}).to_string()
    }

    fn syncer_with(
        http: MockHttpClient,
        root: &std::path::Path,
    ) -> CatalogSyncer<MockHttpClient, FixedClock> {
        CatalogSyncer::new(
            http,
            FixedClock::starting_now(),
            SyncOptions::new(root, CATALOG),
        )
    }

    #[tokio::test]
    async fn creates_entries_with_metadata_and_assets() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new()
            .respond(
                CATALOG,
                catalog_page(json!([{
                    "id": 7,
                    "name": "clock",
                    "icon_url": "https://img.example/icon",
                    "icon_content_type": "image/svg+xml",
                    "screenshot_url": "https://img.example/shot",
                }])),
            )
            .respond("https://img.example/icon", b"<svg/>".to_vec())
            .respond("https://img.example/shot", b"pngbytes".to_vec());

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 0);
        assert!(report.truncation.is_none());

        let entry = dir.path().join("7");
        assert!(entry.join("data.json").is_file());
        assert!(entry.join("icon.svg").is_file());
        assert!(entry.join("screenshot.png").is_file());

        let stored: serde_json::Value =
            serde_json::from_slice(&fs::read(entry.join("data.json")).unwrap()).unwrap();
        assert_eq!(stored["name"], "clock");
    }

    #[tokio::test]
    async fn empty_catalog_reports_zero_work() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new().respond(CATALOG, catalog_page(json!([])));

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        assert_eq!(report.processed, 0);
        assert!(report.truncation.is_none());
    }

    #[tokio::test]
    async fn unreachable_catalog_reports_truncation_not_error() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new();

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        assert_eq!(report.processed, 0);
        assert!(report.truncation.is_some());
    }

    #[tokio::test]
    async fn second_run_with_fresh_caches_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let page = catalog_page(json!([{
            "id": 1,
            "icon_url": "https://img.example/icon",
            "icon_content_type": "image/png",
        }]));
        let http = MockHttpClient::new()
            .respond(CATALOG, page.clone())
            .respond("https://img.example/icon", b"png".to_vec());
        let syncer = syncer_with(http, dir.path());

        let first = syncer.sync().await.unwrap();
        assert_eq!(first.created, 1);

        let data_mtime = |p: &std::path::Path| fs::metadata(p).unwrap().modified().unwrap();
        let entry = dir.path().join("1");
        let before_json = data_mtime(&entry.join("data.json"));
        let before_icon = data_mtime(&entry.join("icon.png"));

        let second = syncer.sync().await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 0);
        assert_eq!(second.skipped, 1);

        assert_eq!(data_mtime(&entry.join("data.json")), before_json);
        assert_eq!(data_mtime(&entry.join("icon.png")), before_icon);
    }

    #[tokio::test]
    async fn expired_metadata_ttl_rewrites_data_json() {
        let dir = TempDir::new().unwrap();
        let page = catalog_page(json!([{"id": 1, "name": "a"}]));
        let http = MockHttpClient::new().respond(CATALOG, page);
        let clock = FixedClock::starting_now();
        let syncer = CatalogSyncer::new(http, clock, SyncOptions::new(dir.path(), CATALOG));

        syncer.sync().await.unwrap();
        syncer.clock.advance(DEFAULT_METADATA_TTL + Duration::from_secs(1));

        let report = syncer.sync().await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn one_bad_entry_does_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        // A plain file where entry "2" wants its directory.
        fs::write(dir.path().join("2"), b"roadblock").unwrap();

        let http = MockHttpClient::new().respond(
            CATALOG,
            catalog_page(json!([{"id": 1}, {"id": 2}, {"id": 3}])),
        );

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        assert_eq!(report.processed, 3);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        assert!(dir.path().join("1/data.json").is_file());
        assert!(dir.path().join("3/data.json").is_file());
    }

    #[tokio::test]
    async fn record_without_id_counts_as_failed() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new().respond(
            CATALOG,
            catalog_page(json!([{"name": "anonymous"}, {"id": 1}])),
        );

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn traversal_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new().respond(
            CATALOG,
            catalog_page(json!([{"id": "../escape"}, {"id": "ok"}])),
        );

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.created, 1);
        assert!(!dir.path().parent().unwrap().join("escape").exists());
    }

    #[tokio::test]
    async fn failed_asset_download_still_counts_entry() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new().respond(
            CATALOG,
            catalog_page(json!([{
                "id": 1,
                "icon_url": "https://img.example/unreachable",
            }])),
        );

        let report = syncer_with(http, dir.path()).sync().await.unwrap();

        // Metadata landed, icon fetch degraded silently.
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 0);
        assert!(dir.path().join("1/data.json").is_file());
        assert!(!dir.path().join("1/icon.png").exists());
    }

    #[tokio::test]
    async fn changed_icon_content_type_replaces_old_extension() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("1");
        fs::create_dir_all(&entry).unwrap();
        fs::write(entry.join("icon.svg"), b"<svg/>").unwrap();

        let http = MockHttpClient::new()
            .respond(
                CATALOG,
                catalog_page(json!([{
                    "id": 1,
                    "icon_url": "https://img.example/icon",
                    "icon_content_type": "image/png",
                }])),
            )
            .respond("https://img.example/icon", b"png".to_vec());

        syncer_with(http, dir.path()).sync().await.unwrap();

        assert!(entry.join("icon.png").is_file());
        assert!(!entry.join("icon.svg").exists());
    }

    #[tokio::test]
    async fn overlapping_sync_is_rejected() {
        let dir = TempDir::new().unwrap();
        let http = MockHttpClient::new().respond(CATALOG, catalog_page(json!([])));
        let syncer = syncer_with(http, dir.path());

        let held = syncer.guard.try_lock().unwrap();
        let result = syncer.sync().await;
        assert!(matches!(result, Err(SyncError::AlreadyRunning)));
        drop(held);

        assert!(syncer.sync().await.is_ok());
    }
}
