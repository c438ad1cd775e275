//! End-to-end conversations through the Engine with mock adapters.

mod common;

use common::found;
use scout_common::cache::QueryCache;
use scout_common::config::ScoutConfig;
use scout_common::intent::{param, ClassifyContext};
use scout_common::{
    Action, DataPaths, Engine, EvidenceResult, FetchRegistry, IntentClassifier, SourceKind,
    TruthResult,
};
use tempfile::tempdir;

fn engine(dir: &std::path::Path, registry: FetchRegistry) -> Engine {
    Engine::open(ScoutConfig::default(), DataPaths::new(dir), registry).unwrap()
}

#[test]
fn test_bitcoin_price_end_to_end() {
    let config = ScoutConfig::default();
    let classifier = IntentClassifier::new(config.knowledge_cutoff().unwrap());
    let intent = classifier.classify("what is the current price of bitcoin", &ClassifyContext::default());
    assert_eq!(intent.action, Action::PriceQuery);
    assert_eq!(intent.get(param::ASSET), Some("bitcoin"));
    assert!(intent.time_sensitive);

    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    {
        let mut stale = QueryCache::open(&paths.cache(), 100);
        let old = EvidenceResult::found("coingecko", "Bitcoin (BTC): $1.00 USD", 0.9);
        stale.put("bitcoin", &TruthResult::found("bitcoin", SourceKind::Crypto, &old));
    }

    let mut registry = FetchRegistry::new();
    let coingecko = found(
        &mut registry,
        "coingecko",
        SourceKind::Crypto,
        "Bitcoin (BTC): $64,250.12 USD",
        0.95,
        &["bitcoin", "btc", "crypto"],
    );
    let mut engine = engine(dir.path(), registry);

    let reply = engine.handle("what is the current price of bitcoin").unwrap();
    assert_eq!(reply.action, Action::PriceQuery);
    assert!(reply.text.contains("$64,250.12 USD"), "got: {}", reply.text);
    assert!(!reply.text.contains("$1.00"));
    assert_eq!(coingecko.calls(), 1);
    assert_eq!(coingecko.queries(), vec!["bitcoin".to_string()]);

    engine.handle("what is the current price of bitcoin").unwrap();
    assert_eq!(coingecko.calls(), 2, "price lookups never come from the cache");
}

#[test]
fn test_price_lookup_never_answers_what_is() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let coingecko = found(
        &mut registry,
        "coingecko",
        SourceKind::Crypto,
        "Bitcoin (BTC): $64,250.12 USD",
        0.95,
        &["crypto", "price"],
    );
    let wikipedia = found(
        &mut registry,
        "wikipedia",
        SourceKind::Wikipedia,
        "Bitcoin is a decentralized digital currency.",
        0.8,
        &[],
    );
    let mut engine = engine(dir.path(), registry);

    engine.handle("what is the current price of bitcoin").unwrap();
    assert_eq!(coingecko.calls(), 1);

    let reply = engine.handle("what is bitcoin").unwrap();
    assert_eq!(reply.action, Action::Retrieve);
    assert_eq!(wikipedia.calls(), 1);
    assert!(reply.text.contains("decentralized digital currency"), "got: {}", reply.text);
    assert!(!reply.text.contains("$64,250.12"));
    let fact = engine.facts().get("bitcoin").unwrap();
    assert_eq!(fact.summary, "Bitcoin is a decentralized digital currency.");
    assert_eq!(fact.metadata.source, "wikipedia");
}

#[test]
fn test_live_data_is_not_stored_as_a_fact() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(
        &mut registry,
        "coingecko",
        SourceKind::Crypto,
        "Bitcoin (BTC): $64,250.12 USD",
        0.95,
        &["bitcoin"],
    );
    let mut engine = engine(dir.path(), registry);

    let reply = engine.handle("what is bitcoin").unwrap();
    assert_eq!(reply.action, Action::Retrieve);
    assert!(!engine.facts().contains("bitcoin"));
}

#[test]
fn test_open_domain_lookup_is_remembered() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let wikipedia = found(
        &mut registry,
        "wikipedia",
        SourceKind::Wikipedia,
        "Rust is a programming language focused on memory safety.",
        0.8,
        &[],
    );
    let mut engine = engine(dir.path(), registry);

    let first = engine.handle("What is Rust?").unwrap();
    assert_eq!(first.action, Action::Retrieve);
    assert_eq!(first.topic.as_deref(), Some("rust"));
    assert!(first.text.starts_with("Here is a concise explanation of"));
    assert!(engine.facts().contains("rust"));

    engine.handle("what is python").unwrap();
    assert_eq!(wikipedia.calls(), 2);

    let again = engine.handle("what is rust").unwrap();
    assert_eq!(again.action, Action::ReturnKnowledge);
    assert_eq!(wikipedia.calls(), 2);
    assert!(again.text.contains("You might also ask about: python."), "got: {}", again.text);
}

#[test]
fn test_correction_teaches_policy_and_corrects_fact() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(
        &mut registry,
        "wikidata",
        SourceKind::Wikidata,
        "Rust: systems programming language first released in 2015",
        0.75,
        &[],
    );
    found(
        &mut registry,
        "wikipedia",
        SourceKind::Wikipedia,
        "Rust is a fungal plant disease.",
        0.8,
        &[],
    );
    let mut engine = engine(dir.path(), registry);

    let first = engine.handle("what is rust").unwrap();
    assert_eq!(first.truth.as_ref().unwrap().source_name, "wikipedia");

    let fix = engine.handle("that's wrong, check wikidata").unwrap();
    assert_eq!(fix.action, Action::Correction);
    assert_eq!(fix.topic.as_deref(), Some("rust"));

    let fact = engine.facts().get("rust").unwrap();
    assert!(fact.metadata.corrected);
    assert_eq!(fact.metadata.source, "wikidata");
    assert_eq!(engine.disputes().len(), 1);
    let policy = engine.policies().find_for("rust").unwrap();
    assert!(policy.rules.preferred_sources.contains("wikidata"));
}

#[test]
fn test_correction_without_topic() {
    let dir = tempdir().unwrap();
    let mut engine = engine(dir.path(), FetchRegistry::new());
    let reply = engine.handle("that's wrong").unwrap();
    assert_eq!(reply.action, Action::Correction);
    assert!(reply.text.contains("which topic"));
    assert!(engine.disputes().is_empty());
}

#[test]
fn test_memory_round_trip() {
    let dir = tempdir().unwrap();
    let mut engine = engine(dir.path(), FetchRegistry::new());

    let empty = engine.handle("what do you know about me").unwrap();
    assert_eq!(empty.action, Action::MemoryRead);
    assert!(empty.text.contains("don't know anything"));

    let saved = engine.handle("remember that I live in Lisbon.").unwrap();
    assert_eq!(saved.action, Action::MemoryWrite);
    let dup = engine.handle("remember that i live in lisbon").unwrap();
    assert_eq!(dup.text, "I already knew that.");

    let listed = engine.handle("what do you know about me?").unwrap();
    assert!(listed.text.contains("- I live in Lisbon"));
}

#[test]
fn test_identity_and_conversation() {
    let dir = tempdir().unwrap();
    let mut engine = engine(dir.path(), FetchRegistry::new());

    let who = engine.handle("who are you").unwrap();
    assert_eq!(who.action, Action::Identity);
    assert!(who.text.contains("Scout"));

    let chat = engine.handle("hello").unwrap();
    assert_eq!(chat.action, Action::Converse);
    assert_eq!(engine.turns().len(), 4);
}

#[test]
fn test_status_and_maintenance() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    common::empty(&mut registry, "wikidata", SourceKind::Wikidata);
    let mut engine = engine(dir.path(), registry);

    engine.handle("what is a zzyzx").unwrap();
    let status = engine.status();
    assert_eq!(status.unknowns, 1);
    assert_eq!(status.cache_entries, 1);
    assert_eq!(status.facts, 0);
    assert_eq!(status.adapters, vec!["wikidata".to_string()]);
    assert_eq!(status.data_dir, dir.path());

    let report = engine.maintenance(7).unwrap();
    assert_eq!(report.unknowns_pruned, 0);
    assert_eq!(report.cache_pruned, 0);
    assert_eq!(engine.status().unknowns, 1);
}
