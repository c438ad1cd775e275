//! Fact Store: durable topic -> fact map.
//!
//! Facts are only ever replaced whole through `put`; the term vector is
//! recomputed from the new summary on every write. Persistence failures are
//! returned to the caller since losing a fact is the one fatal storage error.
//!
//! v0.3.0: Wire format is a list of entries inside the versioned envelope;
//!         v0 files (a bare key -> {summary, metadata} map) are upgraded on read.

use crate::error::{Result, ScoutError};
use crate::semantic::{cosine, term_vector, TermVector};
use crate::store::StoreFile;
use crate::types::normalize_key;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "facts";
const VERSION: u32 = 1;

/// Minimum cosine similarity for a related-topic suggestion
pub const RELATED_THRESHOLD: f64 = 0.15;
pub const RELATED_LIMIT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactMetadata {
    pub source: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub corrected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactEntry {
    pub key: String,
    pub summary: String,
    pub metadata: FactMetadata,
    pub term_vector: TermVector,
    pub updated_at: DateTime<Utc>,
}

impl FactEntry {
    /// Same content, ignoring when it was written
    pub fn same_content(&self, other: &FactEntry) -> bool {
        self.key == other.key
            && self.summary == other.summary
            && self.metadata == other.metadata
            && self.term_vector == other.term_vector
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FactTableWire {
    facts: Vec<FactEntry>,
}

pub struct FactStore {
    file: StoreFile,
    facts: BTreeMap<String, FactEntry>,
}

impl FactStore {
    pub fn open(path: &Path) -> Result<Self> {
        let file = StoreFile::new(path, SCHEMA, VERSION);
        let wire: FactTableWire = file.load(migrate)?;
        let facts = wire.facts.into_iter().map(|f| (f.key.clone(), f)).collect();
        Ok(Self { file, facts })
    }

    /// Replace the fact for `key` wholesale and persist
    pub fn put(&mut self, key: &str, summary: &str, metadata: FactMetadata) -> Result<()> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(ScoutError::storage(self.file.path(), "empty fact key"));
        }
        let entry = FactEntry {
            key: key.clone(),
            summary: summary.to_string(),
            metadata,
            term_vector: term_vector(summary),
            updated_at: Utc::now(),
        };
        let previous = self.facts.insert(key.clone(), entry);
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.facts.insert(key, old),
                None => self.facts.remove(&key),
            };
            return Err(e);
        }
        debug!(key = %key, "fact stored");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FactEntry> {
        self.facts.get(&normalize_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Up to three other topics whose facts resemble `summary`
    pub fn related(&self, topic: &str, summary: &str) -> Vec<String> {
        let topic = normalize_key(topic);
        let query = term_vector(summary);
        let mut scored: Vec<(f64, &str)> = self
            .facts
            .values()
            .filter(|f| f.key != topic)
            .map(|f| (cosine(&query, &f.term_vector), f.key.as_str()))
            .filter(|(score, _)| *score > RELATED_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(RELATED_LIMIT)
            .map(|(_, k)| k.to_string())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.facts.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let wire = FactTableWire {
            facts: self.facts.values().cloned().collect(),
        };
        self.file.save(&wire)
    }
}

#[derive(Deserialize)]
struct LegacyFact {
    summary: String,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

fn migrate(from: u32, raw: serde_json::Value) -> Result<FactTableWire> {
    debug!(from, "upgrading fact store");
    let legacy: BTreeMap<String, LegacyFact> = serde_json::from_value(raw)?;
    let now = Utc::now();
    let facts = legacy
        .into_iter()
        .map(|(key, fact)| {
            let meta = &fact.metadata;
            FactEntry {
                key: normalize_key(&key),
                term_vector: term_vector(&fact.summary),
                metadata: FactMetadata {
                    source: meta
                        .get("source")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    confidence: meta
                        .get("confidence")
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0)
                        .clamp(0.0, 1.0),
                    url: meta.get("url").and_then(|v| v.as_str()).map(String::from),
                    corrected: meta
                        .get("corrected")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false),
                },
                summary: fact.summary,
                updated_at: now,
            }
        })
        .collect();
    Ok(FactTableWire { facts })
}
