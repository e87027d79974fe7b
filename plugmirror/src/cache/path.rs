//! Cache entry layout and filename handling.
//!
//! One directory per plugin id under the cache root:
//!
//! ```text
//! <cache_root>/<id>/data.json
//! <cache_root>/<id>/icon.<ext>       extension from icon_content_type
//! <cache_root>/<id>/screenshot.png   always png, whatever the source was
//! ```

use std::path::{Path, PathBuf};

/// Metadata file name inside each entry directory.
pub const DATA_FILE: &str = "data.json";

/// Directory holding one plugin's cached entry.
pub fn entry_dir(cache_root: &Path, id: &str) -> PathBuf {
    cache_root.join(id)
}

/// Path to the entry's `data.json`.
pub fn data_json_path(cache_root: &Path, id: &str) -> PathBuf {
    entry_dir(cache_root, id).join(DATA_FILE)
}

/// Local file extension for an icon, derived from its content type.
///
/// Substring match, so `image/svg+xml` maps to `svg`. Anything unknown or
/// absent falls back to `png`.
pub fn icon_extension(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some(ct) if ct.contains("svg") => "svg",
        Some(ct) if ct.contains("jpeg") => "jpg",
        Some(ct) if ct.contains("gif") => "gif",
        _ => "png",
    }
}

/// File name for the cached icon given its content type.
pub fn icon_file_name(content_type: Option<&str>) -> String {
    format!("icon.{}", icon_extension(content_type))
}

/// File name for the cached screenshot.
///
/// Always `screenshot.png` regardless of the source content type. The
/// asymmetry with icons is deliberate and matches upstream consumers.
pub fn screenshot_file_name() -> &'static str {
    "screenshot.png"
}

/// Finds the file named `<stem>.*` inside an entry directory.
///
/// At most one such file should exist; if several somehow do, the
/// lexicographically first wins so repeated reads agree.
pub fn find_asset(entry_dir: &Path, stem: &str) -> Option<PathBuf> {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(entry_dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file() && p.file_stem().and_then(|s| s.to_str()) == Some(stem)
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}
