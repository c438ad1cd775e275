//! Retrieval orchestrator behaviour against counting mock adapters.

mod common;

use common::{empty, found, scout_in};
use scout_common::cache::QueryCache;
use scout_common::correction::{apply_correction, CorrectionContext, CorrectionOutcome};
use scout_common::disputes::DisputeLog;
use scout_common::fact_store::{FactMetadata, FactStore};
use scout_common::{DataPaths, FetchRegistry, SearchRequest, SourceKind, SourceTier, TruthStatus};
use tempfile::tempdir;

#[test]
fn test_cache_fidelity_across_reopen() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let spy = found(
        &mut registry,
        "wikidata",
        SourceKind::Wikidata,
        "Paris is the capital of France.",
        0.8300000000000001,
        &[],
    );
    let mut scout = scout_in(dir.path(), registry);

    let first = scout.search(&SearchRequest::new("Capital of France"));
    let second = scout.search(&SearchRequest::new("  capital of france "));
    assert_eq!(first, second);
    assert_eq!(spy.calls(), 1, "second read must come from the cache");

    let reopened = QueryCache::open(&DataPaths::new(dir.path()).cache(), 100);
    assert_eq!(reopened.get("capital of france"), Some(&first));
}

#[test]
fn test_ignore_cache_always_invokes_adapters() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let spy = found(&mut registry, "wikidata", SourceKind::Wikidata, "42", 0.9, &[]);
    let mut scout = scout_in(dir.path(), registry);

    let req = SearchRequest::new("answer to everything").ignore_cache(true);
    scout.search(&req);
    scout.search(&req);
    assert_eq!(spy.calls(), 2);
}

#[test]
fn test_highest_confidence_selected() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(&mut registry, "wikipedia", SourceKind::Wikipedia, "low", 0.4, &["ordering"]);
    found(&mut registry, "news_rss", SourceKind::NewsRss, "high", 0.9, &["ordering"]);
    found(&mut registry, "wikidata", SourceKind::Wikidata, "mid", 0.6, &["ordering"]);
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(&SearchRequest::new("ordering test"));
    assert_eq!(truth.status, TruthStatus::Found);
    assert_eq!(truth.confidence, 0.9);
    assert_eq!(truth.canonical_summary, "high");
    assert_eq!(truth.tier, SourceTier::Tertiary);
    assert!(truth.is_consistent());
}

#[test]
fn test_sports_guard_rejects_news_only_winner() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(
        &mut registry,
        "news_rss",
        SourceKind::NewsRss,
        "Giants won the game 3-1 last night",
        0.9,
        &[],
    );
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(
        &SearchRequest::new("who won the giants game last night")
            .ignore_cache(true)
            .with_domain(Some("sports"))
            .with_query_type(Some("result")),
    );
    assert_eq!(truth.status, TruthStatus::NotFound);
    assert!(truth.violations.iter().any(|v| v.contains("sports guard")));
    assert_eq!(scout.unknowns().len(), 1);
    assert_eq!(
        scout.unknowns().entries()[0].query,
        "who won the giants game last night"
    );
    assert!(truth.canonical_summary.starts_with("I could not find reliable information"));
}

#[test]
fn test_sports_guard_allows_structured_source() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(&mut registry, "news_rss", SourceKind::NewsRss, "Giants won 3-1", 0.9, &[]);
    found(&mut registry, "thesportsdb", SourceKind::Sports, "Giants 3 - 1 Mets", 0.85, &[]);
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(
        &SearchRequest::new("who won the giants game")
            .with_domain(Some("sports"))
            .with_query_type(Some("result")),
    );
    assert!(truth.is_found());
    assert_eq!(truth.source_name, "thesportsdb");
    assert!(scout.unknowns().is_empty());
}

#[test]
fn test_roster_query_never_selects_community() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let reddit = found(
        &mut registry,
        "reddit",
        SourceKind::Community,
        "Giants roster: the quarterback is somebody from reddit",
        0.99,
        &["roster", "quarterback"],
    );
    found(
        &mut registry,
        "wikipedia",
        SourceKind::Wikipedia,
        "The Giants roster lists their quarterback.",
        0.5,
        &[],
    );
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(
        &SearchRequest::new("who is the quarterback for the giants roster")
            .with_domain(Some("sports"))
            .with_query_type(Some("roster")),
    );
    assert!(truth.is_found());
    assert_eq!(truth.source_name, "wikipedia");
    assert_eq!(truth.confidence, 0.5);
    assert!(reddit.calls() <= 1);
    assert!(truth
        .source_trace
        .iter()
        .filter(|t| t.name == "reddit")
        .all(|t| t.note.starts_with("excluded")));
}

#[test]
fn test_roster_query_with_only_community_is_not_found() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(
        &mut registry,
        "reddit",
        SourceKind::Community,
        "The Giants roster according to a forum post",
        0.99,
        &["roster"],
    );
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(
        &SearchRequest::new("giants roster")
            .with_domain(Some("sports"))
            .with_query_type(Some("roster")),
    );
    assert_eq!(truth.status, TruthStatus::NotFound);
}

#[test]
fn test_sports_fast_path_tier_one_stops_search() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let sportsdb = found(&mut registry, "thesportsdb", SourceKind::Sports, "Giants 24 - 17 Eagles", 0.7, &[]);
    let wikidata = found(&mut registry, "wikidata", SourceKind::Wikidata, "w", 0.9, &["giants"]);
    let wikipedia = found(&mut registry, "wikipedia", SourceKind::Wikipedia, "p", 0.9, &["giants"]);
    let news = found(&mut registry, "news_rss", SourceKind::NewsRss, "n", 0.9, &["giants"]);
    let reddit = found(&mut registry, "reddit", SourceKind::Community, "r", 0.9, &["giants"]);
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(
        &SearchRequest::new("giants score")
            .with_domain(Some("sports"))
            .with_query_type(Some("result")),
    );
    assert_eq!(truth.source_name, "thesportsdb");
    assert_eq!(truth.tier, SourceTier::Primary);
    assert_eq!(sportsdb.calls(), 1);
    for spy in [wikidata, wikipedia, news, reddit] {
        assert_eq!(spy.calls(), 0);
    }
}

#[test]
fn test_secondary_below_floor_falls_through() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    empty(&mut registry, "thesportsdb", SourceKind::Sports);
    found(&mut registry, "wikipedia", SourceKind::Wikipedia, "Giants roster notes", 0.3, &[]);
    let news = found(
        &mut registry,
        "news_rss",
        SourceKind::NewsRss,
        "Giants sign a new kicker",
        0.55,
        &[],
    );
    let mut scout = scout_in(dir.path(), registry);

    let truth = scout.search(&SearchRequest::new("giants transfer news").with_domain(Some("sports")));
    assert_eq!(truth.source_name, "news_rss");
    assert_eq!(news.calls(), 1);
    assert!(truth
        .source_trace
        .iter()
        .any(|t| t.name == "wikipedia" && t.note.starts_with("below tier 2 floor")));
}

fn community_answer(summary: &str, confidence: f64) -> scout_common::TruthResult {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(&mut registry, "reddit", SourceKind::Community, summary, confidence, &[]);
    let mut scout = scout_in(dir.path(), registry);
    scout.search(&SearchRequest::new("electric scooter battery fires").with_domain(Some("news")))
}

#[test]
fn test_community_result_needs_two_keyword_hits() {
    let one_hit = community_answer("r/commuting: my electric bike is great", 0.8);
    assert_eq!(one_hit.status, TruthStatus::NotFound);
    assert!(one_hit
        .source_trace
        .iter()
        .any(|t| t.name == "reddit" && t.note.starts_with("social gate rejected (1/2")));

    let relevant = community_answer("r/scooters: why electric scooter battery fires happen", 0.8);
    assert_eq!(relevant.status, TruthStatus::Found);
    assert_eq!(relevant.source_name, "reddit");
    assert_eq!(relevant.tier, SourceTier::Tertiary);
}

#[test]
fn test_community_result_needs_confidence_floor() {
    let weak = community_answer("r/scooters: why electric scooter battery fires happen", 0.6);
    assert_eq!(weak.status, TruthStatus::NotFound);
}

#[test]
fn test_domain_lookup_does_not_fill_open_domain_cache() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let coingecko = found(&mut registry, "coingecko", SourceKind::Crypto, "Bitcoin: $64,250.12 USD", 0.95, &[]);
    let wikipedia = found(&mut registry, "wikipedia", SourceKind::Wikipedia, "Bitcoin is a currency.", 0.8, &[]);
    let mut scout = scout_in(dir.path(), registry);

    let live = SearchRequest::new("bitcoin")
        .ignore_cache(true)
        .with_domain(Some("finance"))
        .with_query_type(Some("price"));
    assert_eq!(scout.search(&live).source_name, "coingecko");

    let open = scout.search(&SearchRequest::new("bitcoin"));
    assert_eq!(open.source_name, "wikipedia");
    assert_eq!(coingecko.calls(), 1);
    assert_eq!(wikipedia.calls(), 1);

    let reopened = QueryCache::open(&DataPaths::new(dir.path()).cache(), 100);
    assert_eq!(reopened.get("finance/price:bitcoin").unwrap().source_name, "coingecko");
    assert_eq!(reopened.get("bitcoin").unwrap().source_name, "wikipedia");
}

#[test]
fn test_policy_requires_numbers() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    found(&mut registry, "wikipedia", SourceKind::Wikipedia, "Gold is a precious metal.", 0.8, &[]);
    found(&mut registry, "wikidata", SourceKind::Wikidata, "Gold: 2,310 USD per ounce", 0.6, &[]);
    let mut scout = scout_in(dir.path(), registry);

    let mut rules = scout_common::policy::PolicyRules::default();
    rules.require_numeric = true;
    let policy = scout_common::policy::SearchPolicy::new("gold", rules);
    let truth = scout.search(&SearchRequest::new("gold").with_policy(Some(&policy)));
    assert_eq!(truth.source_name, "wikidata");
    assert!(truth.violations.iter().any(|v| v.contains("without numbers")));
}

#[test]
fn test_negative_result_is_cached() {
    let dir = tempdir().unwrap();
    let mut registry = FetchRegistry::new();
    let spy = empty(&mut registry, "wikidata", SourceKind::Wikidata);
    let mut scout = scout_in(dir.path(), registry);

    let first = scout.search(&SearchRequest::new("zzyzx"));
    let second = scout.search(&SearchRequest::new("zzyzx"));
    assert_eq!(first.status, TruthStatus::NotFound);
    assert_eq!(first, second);
    assert_eq!(spy.calls(), 1);
    assert_eq!(scout.unknowns().len(), 1);
}

#[test]
fn test_correction_is_idempotent_and_audited() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    let mut registry = FetchRegistry::new();
    found(
        &mut registry,
        "wikidata",
        SourceKind::Wikidata,
        "Pluto is a dwarf planet in the Kuiper belt.",
        0.9,
        &[],
    );
    let mut scout = scout_in(dir.path(), registry);
    let mut facts = FactStore::open(&paths.facts()).unwrap();
    let mut disputes = DisputeLog::open(&paths.disputes()).unwrap();
    facts
        .put(
            "pluto",
            "Pluto is the ninth planet.",
            FactMetadata {
                source: "local_corpus".to_string(),
                confidence: 0.5,
                url: None,
                corrected: false,
            },
        )
        .unwrap();

    let mut ctx = CorrectionContext {
        scout: &mut scout,
        facts: &mut facts,
        disputes: &mut disputes,
    };
    let first = apply_correction(&mut ctx, Some("pluto"), "that's wrong, it is a dwarf planet", None).unwrap();
    assert!(matches!(first, CorrectionOutcome::Resolved { .. }));
    let after_first = ctx.facts.get("pluto").cloned().unwrap();

    apply_correction(&mut ctx, Some("pluto"), "that's wrong, it is a dwarf planet", None).unwrap();
    let after_second = ctx.facts.get("pluto").cloned().unwrap();

    assert!(after_first.same_content(&after_second));
    assert!(after_second.metadata.corrected);
    assert_eq!(after_second.metadata.source, "wikidata");
    assert_eq!(disputes.len(), 2);
    assert_eq!(
        disputes.records()[0].old_summary.as_deref(),
        Some("Pluto is the ninth planet.")
    );
    assert_eq!(
        disputes.records()[1].old_summary.as_deref(),
        Some("Pluto is a dwarf planet in the Kuiper belt.")
    );

    let reopened = DisputeLog::open(&paths.disputes()).unwrap();
    assert_eq!(reopened.len(), 2);
}

#[test]
fn test_unresolved_correction_keeps_old_fact() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    let mut registry = FetchRegistry::new();
    empty(&mut registry, "wikidata", SourceKind::Wikidata);
    let mut scout = scout_in(dir.path(), registry);
    let mut facts = FactStore::open(&paths.facts()).unwrap();
    let mut disputes = DisputeLog::open(&paths.disputes()).unwrap();
    facts
        .put("atlantis", "A legendary island.", FactMetadata::default())
        .unwrap();

    let mut ctx = CorrectionContext {
        scout: &mut scout,
        facts: &mut facts,
        disputes: &mut disputes,
    };
    let outcome = apply_correction(&mut ctx, Some("atlantis"), "no, it's real", None).unwrap();
    assert!(matches!(outcome, CorrectionOutcome::Unresolved { .. }));
    assert_eq!(facts.get("atlantis").unwrap().summary, "A legendary island.");
    assert!(!facts.get("atlantis").unwrap().metadata.corrected);
    assert_eq!(disputes.len(), 1);
    assert!(disputes.records()[0].new_evidence_summary.is_none());

    let mut ctx = CorrectionContext {
        scout: &mut scout,
        facts: &mut facts,
        disputes: &mut disputes,
    };
    let none = apply_correction(&mut ctx, None, "that's wrong", None).unwrap();
    assert_eq!(none, CorrectionOutcome::NoTopic);
    assert_eq!(disputes.len(), 1);
}
