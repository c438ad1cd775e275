//! User memory: facts the user asked the assistant to remember.

use crate::error::Result;
use crate::store::{migrate_as_is, StoreFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SCHEMA: &str = "user_profile";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RememberedFact {
    pub text: String,
    pub remembered_at: DateTime<Utc>,
}

pub struct ProfileStore {
    file: StoreFile,
    facts: Vec<RememberedFact>,
}

impl ProfileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let file = StoreFile::new(path, SCHEMA, VERSION);
        let facts = file.load(migrate_as_is)?;
        Ok(Self { file, facts })
    }

    /// Store a fact; repeating an identical fact is a no-op. Returns true if added.
    pub fn remember(&mut self, text: &str) -> Result<bool> {
        let text = text.trim().trim_end_matches(['.', '!']).trim();
        if text.is_empty() || self.facts.iter().any(|f| f.text.eq_ignore_ascii_case(text)) {
            return Ok(false);
        }
        self.facts.push(RememberedFact {
            text: text.to_string(),
            remembered_at: Utc::now(),
        });
        self.file.save(&self.facts)?;
        Ok(true)
    }

    pub fn facts(&self) -> &[RememberedFact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
