//! Adapter contract and the generic fetch registry.
//!
//! Adapters are thin, blocking calls that always return an `EvidenceResult`;
//! the registry keeps them in registration order, scores them against query
//! keywords when no domain hint is available, and enforces the result contract
//! on every call.

use crate::types::{clamp_confidence, EvidenceResult, SourceKind};
use tracing::{debug, warn};

/// Uniform evidence source.
///
/// `fetch` must not panic: transport and parse failures become `ERROR` or
/// `NOT_FOUND` results with confidence 0.
pub trait Adapter: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> SourceKind;
    fn fetch(&self, query: &str) -> EvidenceResult;
}

/// Adapters consulted when no keyword matches
pub const DEFAULT_ROUTE: &[&str] = &["wikidata", "wikipedia"];

struct Registered {
    adapter: Box<dyn Adapter>,
    keywords: Vec<String>,
}

/// One adapter call as seen by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub adapter: String,
    pub kind: SourceKind,
    pub evidence: EvidenceResult,
}

#[derive(Default)]
pub struct FetchRegistry {
    adapters: Vec<Registered>,
}

impl FetchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter with its routing keywords; a later registration
    /// under the same name replaces the earlier one.
    pub fn register(&mut self, adapter: Box<dyn Adapter>, keywords: &[&str]) {
        let name = adapter.name().to_string();
        let entry = Registered {
            adapter,
            keywords: keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
        };
        match self.adapters.iter_mut().find(|r| r.adapter.name() == name) {
            Some(existing) => {
                warn!(adapter = %name, "adapter registered twice, replacing");
                *existing = entry;
            }
            None => self.adapters.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Adapter> {
        self.adapters
            .iter()
            .find(|r| r.adapter.name() == name)
            .map(|r| r.adapter.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|r| r.adapter.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// First registered adapter of any of `kinds`, in the order the kinds are given
    pub fn first_of_kind(&self, kinds: &[SourceKind]) -> Option<&str> {
        kinds.iter().find_map(|k| {
            self.adapters
                .iter()
                .find(|r| r.adapter.kind() == *k)
                .map(|r| r.adapter.name())
        })
    }

    /// Adapter names ranked by keyword score, best first.
    ///
    /// A keyword scores the number of times it occurs in the query. Ties keep
    /// registration order. With no match at all the default route is used.
    pub fn route_query(&self, query: &str) -> Vec<String> {
        let words: Vec<String> = crate::semantic::tokenize(query);
        let joined = format!(" {} ", words.join(" "));
        let mut scored: Vec<(usize, usize, &str)> = self
            .adapters
            .iter()
            .enumerate()
            .filter_map(|(pos, r)| {
                let score: usize = r
                    .keywords
                    .iter()
                    .map(|kw| joined.matches(&format!(" {} ", kw)).count())
                    .sum();
                (score > 0).then_some((score, pos, r.adapter.name()))
            })
            .collect();

        if scored.is_empty() {
            return DEFAULT_ROUTE
                .iter()
                .filter(|n| self.contains(n))
                .map(|n| n.to_string())
                .collect();
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, _, n)| n.to_string()).collect()
    }

    /// Call one adapter by name, enforcing the result contract
    pub fn call(&self, name: &str, query: &str) -> Option<Fetched> {
        let registered = self.adapters.iter().find(|r| r.adapter.name() == name)?;
        let kind = registered.adapter.kind();
        let mut evidence = registered.adapter.fetch(query);

        if evidence.is_found() {
            evidence.confidence = clamp_confidence(evidence.confidence);
            if evidence.summary.trim().is_empty() {
                evidence = EvidenceResult::not_found(name);
            }
        } else {
            evidence.confidence = 0.0;
        }

        debug!(
            adapter = name,
            status = evidence.status.as_str(),
            confidence = evidence.confidence,
            "adapter call"
        );

        Some(Fetched {
            adapter: name.to_string(),
            kind,
            evidence,
        })
    }
}
