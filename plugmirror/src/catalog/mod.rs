//! Remote catalog model and paginated fetch.
//!
//! [`record`] holds the plugin record types shared by the sync and read
//! paths; [`page`] walks the paginated listing endpoint.

pub mod page;
pub mod record;

pub use page::{FetchedCatalog, PageFetcher, Truncation, MAX_PAGES};
pub use record::{EnrichedPlugin, PluginRecord};
