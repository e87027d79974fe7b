//! Read path: cached entries to the enriched presentation model.
//!
//! Every load rebuilds the model from disk. Broken entries are skipped, not
//! fatal, and a missing cache root just reads as an empty catalog - the
//! presentation layer degrades to whatever was cached, never to an error.

use crate::cache;
use crate::catalog::{EnrichedPlugin, PluginRecord};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Read-path errors. Only enumerating the cache root itself can fail;
/// anything wrong with an individual entry is skipped.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to enumerate cache root {path}: {source}")]
    ListEntries {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything the presentation layer consumes, rebuilt per load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSnapshot {
    /// Enriched plugins in filesystem enumeration order. Display ordering
    /// is the presentation layer's job.
    pub plugins: Vec<EnrichedPlugin>,
    /// Distinct category tags, trimmed and sorted.
    pub categories: Vec<String>,
    /// Occurrences per category tag across all plugins.
    pub category_counts: BTreeMap<String, usize>,
}

/// Loads cached plugin entries from disk.
pub struct CatalogReader {
    cache_root: PathBuf,
    /// Prefix under which asset paths are reported, e.g. `plugins`.
    public_prefix: String,
}

impl CatalogReader {
    /// Reader over `cache_root`.
    ///
    /// Asset paths in the output are relative, prefixed with the root's
    /// directory name (the shape the front end serves them under).
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        let cache_root = cache_root.into();
        let public_prefix = cache_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("plugins")
            .to_string();
        Self {
            cache_root,
            public_prefix,
        }
    }

    /// Loads all valid entries and aggregates the category taxonomy.
    pub fn load_all(&self) -> Result<CatalogSnapshot, ReadError> {
        if !self.cache_root.is_dir() {
            return Ok(CatalogSnapshot::default());
        }

        let entries = fs::read_dir(&self.cache_root).map_err(|source| ReadError::ListEntries {
            path: self.cache_root.clone(),
            source,
        })?;

        let mut snapshot = CatalogSnapshot::default();
        for entry in entries.flatten() {
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }
            let Some(plugin) = self.load_entry(&dir) else {
                continue;
            };
            accumulate_categories(&plugin.record, &mut snapshot.category_counts);
            snapshot.plugins.push(plugin);
        }

        snapshot.categories = snapshot.category_counts.keys().cloned().collect();
        Ok(snapshot)
    }

    /// Loads one entry directory; `None` when `data.json` is missing or
    /// unparseable.
    fn load_entry(&self, dir: &Path) -> Option<EnrichedPlugin> {
        let data_path = dir.join(cache::path::DATA_FILE);
        let body = fs::read(&data_path).ok()?;
        let value: Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                debug!(path = %data_path.display(), error = %e, "skipping malformed entry");
                return None;
            }
        };
        let record = PluginRecord::from_value(value);
        let total_installs = record.total_installs();

        Some(EnrichedPlugin {
            local_icon: self.public_asset_path(dir, "icon"),
            local_screenshot: self.public_asset_path(dir, "screenshot"),
            total_installs,
            record,
        })
    }

    /// Relative public path of the entry's `<stem>.*` asset, if present.
    fn public_asset_path(&self, dir: &Path, stem: &str) -> Option<String> {
        let found = cache::find_asset(dir, stem)?;
        let file = found.file_name()?.to_str()?.to_string();
        let entry = dir.file_name()?.to_str()?.to_string();
        Some(format!("{}/{}/{}", self.public_prefix, entry, file))
    }
}

/// Splits `author_bio.category` on commas and counts every trimmed,
/// non-empty tag. Tags are case-sensitive.
fn accumulate_categories(record: &PluginRecord, counts: &mut BTreeMap<String, usize>) {
    let Some(raw) = record.category() else {
        return;
    };
    for tag in raw.split(',') {
        let tag = tag.trim();
        if !tag.is_empty() {
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }
}
