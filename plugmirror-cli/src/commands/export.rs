//! The `export` command: emit the enriched catalog for the presentation layer.
//!
//! Prints one JSON object with `plugins`, `categories`, and
//! `category_counts` plus the configured display defaults - the exact data
//! contract the browsing UI consumes.

use crate::error::CliError;
use plugmirror::config::MirrorConfig;
use plugmirror::reader::CatalogReader;
use serde_json::json;

pub fn run(config: &MirrorConfig) -> Result<(), CliError> {
    let reader = CatalogReader::new(&config.cache.directory);
    let snapshot = reader.load_all().map_err(CliError::Read)?;

    let output = json!({
        "site_name": config.display.site_name,
        "default_color_mode": config.display.default_color_mode,
        "plugins": snapshot.plugins,
        "categories": snapshot.categories,
        "category_counts": snapshot.category_counts,
    });

    let rendered = serde_json::to_string_pretty(&output).map_err(CliError::Export)?;
    println!("{rendered}");
    Ok(())
}
