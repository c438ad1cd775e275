//! Query cache: normalized query key -> TruthResult snapshot.
//!
//! Bounded by `max_entries`; when full, the entries with the oldest
//! `cached_at` go first. Write failures are logged and absorbed, a corrupt
//! file reads as an empty cache.

use crate::error::Result;
use crate::store::StoreFile;
use crate::types::{TruthResult, TruthStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

const SCHEMA: &str = "query_cache";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub truth: TruthResult,
    pub cached_at: DateTime<Utc>,
}

pub struct QueryCache {
    file: StoreFile,
    entries: BTreeMap<String, CacheEntry>,
    max_entries: usize,
}

impl QueryCache {
    pub fn open(path: &Path, max_entries: usize) -> Self {
        let file = StoreFile::new(path, SCHEMA, VERSION);
        let entries = file.load(migrate).unwrap_or_else(|e| {
            warn!(error = %e, code = e.code(), "query cache unavailable, starting empty");
            BTreeMap::new()
        });
        Self {
            file,
            entries,
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TruthResult> {
        self.entries.get(key).map(|e| &e.truth)
    }

    pub fn put(&mut self, key: &str, truth: &TruthResult) {
        self.put_at(key, truth, Utc::now());
    }

    fn put_at(&mut self, key: &str, truth: &TruthResult, at: DateTime<Utc>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                truth: truth.clone(),
                cached_at: at,
            },
        );
        self.evict();
        self.persist();
    }

    fn evict(&mut self) {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        if excess == 0 {
            return;
        }
        let mut by_age: Vec<(DateTime<Utc>, String)> = self
            .entries
            .iter()
            .map(|(k, e)| (e.cached_at, k.clone()))
            .collect();
        by_age.sort();
        for (_, key) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        debug!(evicted = excess, "query cache over capacity");
    }

    /// Drop negative results cached more than `days` ago; returns how many
    pub fn prune_negative_older_than(&mut self, days: i64, now: DateTime<Utc>) -> usize {
        let horizon = now - Duration::days(days);
        let before = self.entries.len();
        self.entries
            .retain(|_, e| e.truth.status == TruthStatus::Found || e.cached_at >= horizon);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.file.save(&self.entries) {
            warn!(error = %e, "failed to persist query cache");
        }
    }
}

/// Version 0 files mapped keys straight to results with no timestamp
fn migrate(from: u32, raw: serde_json::Value) -> Result<BTreeMap<String, CacheEntry>> {
    debug!(from, "upgrading query cache");
    let legacy: BTreeMap<String, TruthResult> = serde_json::from_value(raw)?;
    let now = Utc::now();
    Ok(legacy
        .into_iter()
        .map(|(k, truth)| {
            (
                k,
                CacheEntry {
                    truth,
                    cached_at: now,
                },
            )
        })
        .collect())
}
