//! Learned search policies.
//!
//! A policy is taught from user feedback and applies to any later search whose
//! normalized query contains its pattern.

use crate::store::{migrate_as_is, StoreFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

const SCHEMA: &str = "search_policies";
const VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRules {
    /// Drop candidates whose summary contains no digit
    #[serde(default)]
    pub require_numeric: bool,
    /// Source names that receive a confidence bonus
    #[serde(default)]
    pub preferred_sources: BTreeSet<String>,
}

impl PolicyRules {
    pub fn is_empty(&self) -> bool {
        !self.require_numeric && self.preferred_sources.is_empty()
    }

    fn merge(&mut self, other: &PolicyRules) {
        self.require_numeric |= other.require_numeric;
        self.preferred_sources
            .extend(other.preferred_sources.iter().cloned());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Substring matched against the normalized query
    pub pattern: String,
    #[serde(default)]
    pub rules: PolicyRules,
}

impl SearchPolicy {
    pub fn new(pattern: &str, rules: PolicyRules) -> Self {
        Self {
            pattern: crate::types::normalize_key(pattern),
            rules,
        }
    }

    pub fn matches(&self, query_key: &str) -> bool {
        !self.pattern.is_empty() && query_key.contains(&self.pattern)
    }
}

pub struct PolicyStore {
    file: StoreFile,
    policies: Vec<SearchPolicy>,
}

impl PolicyStore {
    pub fn open(path: &Path) -> Self {
        let file = StoreFile::new(path, SCHEMA, VERSION);
        let policies = file.load(migrate_as_is).unwrap_or_else(|e| {
            warn!(error = %e, "search policies unavailable, starting empty");
            Vec::new()
        });
        Self { file, policies }
    }

    /// Add rules for `pattern`, merging into an existing policy with the same pattern
    pub fn teach(&mut self, pattern: &str, rules: PolicyRules) {
        if rules.is_empty() {
            return;
        }
        let policy = SearchPolicy::new(pattern, rules);
        if policy.pattern.is_empty() {
            return;
        }
        match self.policies.iter_mut().find(|p| p.pattern == policy.pattern) {
            Some(existing) => existing.rules.merge(&policy.rules),
            None => self.policies.push(policy.clone()),
        }
        info!(pattern = %policy.pattern, "search policy learned");
        if let Err(e) = self.file.save(&self.policies) {
            warn!(error = %e, "failed to persist search policies");
        }
    }

    /// Combined rules of every policy matching `query_key`
    pub fn find_for(&self, query_key: &str) -> Option<SearchPolicy> {
        let mut matched = self.policies.iter().filter(|p| p.matches(query_key));
        let first = matched.next()?.clone();
        Some(matched.fold(first, |mut acc, p| {
            acc.rules.merge(&p.rules);
            acc
        }))
    }

    pub fn policies(&self) -> &[SearchPolicy] {
        &self.policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
