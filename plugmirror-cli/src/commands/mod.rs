//! CLI command implementations.
//!
//! - [`refresh`] - authenticated sync trigger
//! - [`export`] - enriched catalog snapshot as JSON

pub mod export;
pub mod refresh;
