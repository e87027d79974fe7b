//! On-disk cache for plugin entries and their image assets.

pub mod asset;
pub mod path;

pub use asset::AssetCache;
pub use path::{
    data_json_path, entry_dir, find_asset, icon_extension, icon_file_name, screenshot_file_name,
};

use thiserror::Error;

/// Cache-related errors.
///
/// Network failures are not errors here: the asset cache reports them as
/// "nothing downloaded". Only local I/O problems surface.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}
