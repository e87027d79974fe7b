//! Sync outcome bookkeeping.

use crate::catalog::Truncation;
use std::fmt;

/// What happened to one plugin entry during a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Entry directory had no `data.json` before this pass.
    Created,
    /// Entry existed and at least one file was rewritten.
    Updated,
    /// Entry existed and every artifact was within its TTL.
    Fresh,
}

/// Tallied results of one sync pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Records received from the catalog fetch.
    pub processed: usize,
    /// Entries written for the first time.
    pub created: usize,
    /// Existing entries with at least one refreshed file.
    pub updated: usize,
    /// Existing entries left untouched (all TTLs still valid).
    pub skipped: usize,
    /// Entries abandoned due to a local failure.
    pub failed: usize,
    /// Set when the catalog fetch stopped early; the counts above cover
    /// only the records that arrived.
    pub truncation: Option<Truncation>,
}

impl SyncReport {
    pub fn new(truncation: Option<Truncation>) -> Self {
        Self {
            processed: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            truncation,
        }
    }

    /// Folds one entry outcome into the counts.
    pub fn tally(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Created => self.created += 1,
            EntryOutcome::Updated => self.updated += 1,
            EntryOutcome::Fresh => self.skipped += 1,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed: {} created, {} updated, {} skipped, {} failed",
            self.processed, self.created, self.updated, self.skipped, self.failed
        )?;
        if let Some(reason) = &self.truncation {
            write!(f, " (fetch truncated: {reason})")?;
        }
        Ok(())
    }
}
