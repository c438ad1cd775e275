//! Domain Router: coarse domain label -> ordered adapter tiers.
//!
//! Loaded once from configuration. Unknown domains get empty tiers, never an
//! error; the orchestrator then goes straight to the generic fallback.

use crate::config::{DomainTiersConfig, ScoutConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTiers {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub tertiary: Vec<String>,
}

impl DomainTiers {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.tertiary.is_empty()
    }

    /// `(tier number, adapter name)` in priority order; tier numbers start at 1
    pub fn ordered(&self) -> impl Iterator<Item = (u8, &str)> {
        self.primary
            .iter()
            .map(|n| (1u8, n.as_str()))
            .chain(self.secondary.iter().map(|n| (2u8, n.as_str())))
            .chain(self.tertiary.iter().map(|n| (3u8, n.as_str())))
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len() + self.tertiary.len()
    }
}

impl From<&DomainTiersConfig> for DomainTiers {
    fn from(c: &DomainTiersConfig) -> Self {
        Self {
            primary: c.primary.clone(),
            secondary: c.secondary.clone(),
            tertiary: c.tertiary.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DomainRouter {
    table: BTreeMap<String, DomainTiers>,
}

impl DomainRouter {
    pub fn new(table: BTreeMap<String, DomainTiers>) -> Self {
        let table = table
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self { table }
    }

    pub fn from_config(config: &ScoutConfig) -> Self {
        Self::new(
            config
                .domain_table()
                .iter()
                .map(|(k, v)| (k.clone(), DomainTiers::from(v)))
                .collect(),
        )
    }

    pub fn tiers_for(&self, domain: &str) -> DomainTiers {
        self.table
            .get(&domain.trim().to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(|k| k.as_str())
    }
}
