//! Counting mock adapters shared by the integration tests.

#![allow(dead_code)]

use scout_common::cache::QueryCache;
use scout_common::config::ScoutConfig;
use scout_common::router::DomainRouter;
use scout_common::unknown_log::UnknownLog;
use scout_common::{Adapter, DataPaths, EvidenceResult, FetchRegistry, Scout, SourceKind};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockAdapter {
    name: String,
    kind: SourceKind,
    result: EvidenceResult,
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Adapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.result.clone()
    }
}

/// Handle for inspecting a registered mock
#[derive(Clone)]
pub struct Spy {
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Spy {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

pub fn adapter(name: &str, kind: SourceKind, result: EvidenceResult) -> (Box<dyn Adapter>, Spy) {
    let spy = Spy {
        calls: Arc::new(AtomicUsize::new(0)),
        queries: Arc::new(Mutex::new(Vec::new())),
    };
    let mock = MockAdapter {
        name: name.to_string(),
        kind,
        result,
        calls: spy.calls.clone(),
        queries: spy.queries.clone(),
    };
    (Box::new(mock), spy)
}

/// Register a mock answering `summary` with `confidence`
pub fn found(
    registry: &mut FetchRegistry,
    name: &str,
    kind: SourceKind,
    summary: &str,
    confidence: f64,
    keywords: &[&str],
) -> Spy {
    let (a, spy) = adapter(name, kind, EvidenceResult::found(name, summary, confidence));
    registry.register(a, keywords);
    spy
}

/// Register a mock that never finds anything
pub fn empty(registry: &mut FetchRegistry, name: &str, kind: SourceKind) -> Spy {
    let (a, spy) = adapter(name, kind, EvidenceResult::not_found(name));
    registry.register(a, &[]);
    spy
}

pub fn scout_in(dir: &Path, registry: FetchRegistry) -> Scout {
    let paths = DataPaths::new(dir);
    let config = ScoutConfig::default();
    Scout::new(
        registry,
        DomainRouter::from_config(&config),
        QueryCache::open(&paths.cache(), 100),
        UnknownLog::open(&paths.unknowns()),
        config.retrieval.clone(),
    )
}
