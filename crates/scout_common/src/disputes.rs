//! Dispute log: append-only audit trail of user corrections.
//!
//! Every correction attempt is recorded, whether or not new evidence was
//! found. A failed write is a storage error the caller must see.

use crate::error::Result;
use crate::store::{migrate_as_is, StoreFile};
use crate::types::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

const SCHEMA: &str = "disputes";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeRecord {
    pub id: Uuid,
    pub topic: String,
    pub user_correction_text: String,
    #[serde(default)]
    pub old_summary: Option<String>,
    #[serde(default)]
    pub old_metadata: Metadata,
    #[serde(default)]
    pub new_evidence_summary: Option<String>,
    #[serde(default)]
    pub new_evidence_source: Option<String>,
    #[serde(default)]
    pub new_evidence_confidence: f64,
    pub created_at: DateTime<Utc>,
}

pub struct DisputeLog {
    file: StoreFile,
    records: Vec<DisputeRecord>,
}

impl DisputeLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = StoreFile::new(path, SCHEMA, VERSION);
        let records = file.load(migrate_as_is)?;
        Ok(Self { file, records })
    }

    /// Append and persist; the record is only kept in memory if the write succeeds
    pub fn append(&mut self, record: DisputeRecord) -> Result<()> {
        self.records.push(record);
        if let Err(e) = self.file.save(&self.records) {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn records(&self) -> &[DisputeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
