//! Unknown-query log: queries no source could answer.
//!
//! Append-only apart from age-based pruning by `scoutctl maintenance`.

use crate::error::Result;
use crate::store::{migrate_as_is, StoreFile};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

const SCHEMA: &str = "unknown_queries";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownEntry {
    pub query: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

pub struct UnknownLog {
    file: StoreFile,
    entries: Vec<UnknownEntry>,
}

impl UnknownLog {
    pub fn open(path: &Path) -> Self {
        let file = StoreFile::new(path, SCHEMA, VERSION);
        let entries = file.load(migrate_as_is).unwrap_or_else(|e| {
            warn!(error = %e, "unknown-query log unavailable, starting empty");
            Vec::new()
        });
        Self { file, entries }
    }

    pub fn append(&mut self, query: &str, reason: &str) {
        self.entries.push(UnknownEntry {
            query: query.to_string(),
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
        if let Err(e) = self.file.save(&self.entries) {
            warn!(error = %e, "failed to persist unknown-query log");
        }
    }

    /// Remove entries older than `days`; returns how many were removed
    pub fn prune_older_than(&mut self, days: i64, now: DateTime<Utc>) -> Result<usize> {
        let horizon = now - Duration::days(days);
        let before = self.entries.len();
        self.entries.retain(|e| e.timestamp >= horizon);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.file.save(&self.entries)?;
        }
        Ok(removed)
    }

    pub fn entries(&self) -> &[UnknownEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
