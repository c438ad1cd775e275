//! Catalog wiring and offline adapter behaviour.

use scout_common::config::ScoutConfig;
use scout_common::{DataPaths, EvidenceStatus, SourceKind};
use scout_sources::{default_registry, ADAPTER_NAMES};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_catalog_registers_every_adapter() {
    let dir = tempdir().unwrap();
    let registry = default_registry(&ScoutConfig::default(), &DataPaths::new(dir.path())).unwrap();
    assert_eq!(registry.len(), ADAPTER_NAMES.len());
    for name in ADAPTER_NAMES {
        assert!(registry.contains(name), "missing {}", name);
    }
    assert_eq!(registry.get("coingecko").unwrap().kind(), SourceKind::Crypto);
    assert_eq!(registry.get("reddit").unwrap().kind(), SourceKind::Community);
    assert_eq!(registry.get("local_corpus").unwrap().kind(), SourceKind::LocalCorpus);
}

#[test]
fn test_keyed_adapters_need_credentials_offline() {
    let dir = tempdir().unwrap();
    let registry =
        default_registry(&ScoutConfig::default(), &DataPaths::new(dir.path())).unwrap();
    for name in ["newsapi", "nyt_bestseller"] {
        let fetched = registry.call(name, "latest headlines").unwrap();
        assert_eq!(fetched.evidence.status, EvidenceStatus::NeedsCredential, "{}", name);
        assert_eq!(fetched.evidence.confidence, 0.0);
    }
}

#[test]
fn test_corpus_defaults_under_data_dir() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::create_dir_all(paths.corpus()).unwrap();
    fs::write(paths.corpus().join("tides.txt"), "Spring tides follow the new and full moon.").unwrap();

    let registry = default_registry(&ScoutConfig::default(), &paths).unwrap();
    let ev = registry.get("local_corpus").unwrap().fetch("spring tides moon");
    assert_eq!(ev.status, EvidenceStatus::Found);
    assert!(ev.summary.contains("Spring tides"));
}

#[test]
fn test_configured_corpus_dir_wins() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("elsewhere");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("owls.txt"), "Barn owls hunt by sound.").unwrap();

    let mut config = ScoutConfig::default();
    config.sources.corpus_dir = Some(corpus);
    let registry = default_registry(&config, &DataPaths::new(dir.path())).unwrap();
    let ev = registry.get("local_corpus").unwrap().fetch("barn owls");
    assert!(ev.is_found());
}

#[test]
fn test_bare_asset_name_routes_to_encyclopedias() {
    let dir = tempdir().unwrap();
    let registry = default_registry(&ScoutConfig::default(), &DataPaths::new(dir.path())).unwrap();
    let routed = registry.route_query("bitcoin");
    assert!(!routed.iter().any(|n| n == "coingecko"), "routed: {:?}", routed);
    assert!(registry.route_query("crypto price").iter().any(|n| n == "coingecko"));
}
