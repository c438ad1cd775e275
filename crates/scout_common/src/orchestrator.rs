//! Retrieval Orchestrator ("Scout")
//!
//! `search` turns one query into one arbitrated `TruthResult`:
//!
//! 1. cache lookup (skipped when `ignore_cache`)
//! 2. domain fast path: tier 1 accepted unconditionally, tiers 2-3 above a
//!    floor, community adapters last and only through the relevance gate
//! 3. generic fallback: keyword-routed adapters, then structured ->
//!    encyclopedic -> news -> local corpus
//! 4. policy filters (numeric requirement, preferred-source bonus)
//! 5. guards: no community answers for roster-style queries, no sports
//!    results from news/social sources alone
//! 6. nothing left: NOT_FOUND, unknown-query log, negative cache entry
//! 7. otherwise highest confidence wins, ties broken by tier
//!
//! Adapter calls are sequential; falling over to the next tier is the only
//! retry.

use crate::cache::QueryCache;
use crate::config::RetrievalConfig;
use crate::intent::is_roster_style;
use crate::policy::SearchPolicy;
use crate::registry::{FetchRegistry, Fetched};
use crate::router::{DomainRouter, DomainTiers};
use crate::types::{Query, SourceKind, SourceTraceEntry, TruthResult};
use crate::unknown_log::UnknownLog;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info};

static RESULT_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:won|win|wins|winner|winners|beat|beats|score|scores|final score|result|results)\b")
        .unwrap()
});

static SPORTS_CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:game|games|match|team|league|cup|championship|series|bowl|race|grand prix|tournament|playoffs?|final|finals|nfl|nba|mlb|nhl|fifa|uefa|premier league|vs|versus)\b",
    )
    .unwrap()
});

/// Words that carry no topic in a generic headlines request
const GENERIC_NEWS_WORDS: &[&str] = &[
    "latest", "breaking", "news", "headline", "headlines", "current", "today", "today's",
    "what's", "whats", "world", "give", "show", "tell", "about", "happening", "there",
];

/// Result-like wording about sports ("who won", "final score of the game")
pub fn is_sports_result_like(query_key: &str, domain: Option<&str>, query_type: Option<&str>) -> bool {
    if domain == Some("sports") && query_type == Some("result") {
        return true;
    }
    RESULT_WORDS_RE.is_match(query_key)
        && (domain == Some("sports") || SPORTS_CONTEXT_RE.is_match(query_key))
}

/// A headlines request with no specific subject
pub fn is_generic_news(query: &Query) -> bool {
    let words = query.significant_keywords();
    !words.is_empty() && words.iter().all(|w| GENERIC_NEWS_WORDS.contains(w))
}

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub policy: Option<&'a SearchPolicy>,
    pub ignore_cache: bool,
    pub domain: Option<&'a str>,
    pub query_type: Option<&'a str>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            policy: None,
            ignore_cache: false,
            domain: None,
            query_type: None,
        }
    }

    pub fn with_policy(mut self, policy: Option<&'a SearchPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn ignore_cache(mut self, yes: bool) -> Self {
        self.ignore_cache = yes;
        self
    }

    pub fn with_domain(mut self, domain: Option<&'a str>) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_query_type(mut self, query_type: Option<&'a str>) -> Self {
        self.query_type = query_type;
        self
    }

    /// Cache slot for `query_key`. Domain lookups live in their own
    /// namespace ("finance/price:bitcoin") so a live quote never answers an
    /// open-domain question about the same subject.
    pub fn cache_key(&self, query_key: &str) -> String {
        match self.domain {
            Some(domain) => format!(
                "{}/{}:{}",
                domain,
                self.query_type.unwrap_or("any"),
                query_key
            ),
            None => query_key.to_string(),
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// One accepted piece of evidence
#[derive(Debug, Clone)]
struct Candidate {
    fetched: Fetched,
    confidence: f64,
}

impl Candidate {
    fn new(fetched: Fetched) -> Self {
        let confidence = fetched.evidence.confidence;
        Self { fetched, confidence }
    }

    fn kind(&self) -> SourceKind {
        self.fetched.kind
    }
}

/// Per-search scratch state
struct Attempt<'q> {
    query: &'q Query,
    roster: bool,
    /// Every adapter result of this search; an adapter is called at most once
    results: HashMap<String, Fetched>,
    /// Adapters already weighed by the generic fallback
    considered: HashSet<String>,
    trace: Vec<SourceTraceEntry>,
}

impl Attempt<'_> {
    fn record(&mut self, f: &Fetched, note: String) {
        self.trace.push(SourceTraceEntry {
            tier: f.kind.tier(),
            kind: f.kind,
            name: f.adapter.clone(),
            url: f.evidence.url.clone(),
            confidence: f.evidence.confidence,
            note,
        });
    }
}

pub struct Scout {
    registry: FetchRegistry,
    router: DomainRouter,
    cache: QueryCache,
    unknowns: UnknownLog,
    settings: RetrievalConfig,
}

impl Scout {
    pub fn new(
        registry: FetchRegistry,
        router: DomainRouter,
        cache: QueryCache,
        unknowns: UnknownLog,
        settings: RetrievalConfig,
    ) -> Self {
        Self {
            registry,
            router,
            cache,
            unknowns,
            settings,
        }
    }

    pub fn search(&mut self, req: &SearchRequest<'_>) -> TruthResult {
        let query = Query::new(req.query);
        let cache_key = req.cache_key(&query.key);

        if !req.ignore_cache {
            if let Some(hit) = self.cache.get(&cache_key) {
                debug!(query = %query.key, key = %cache_key, "cache hit");
                return hit.clone();
            }
        }

        let mut attempt = Attempt {
            query: &query,
            roster: is_roster_style(req.query_type),
            results: HashMap::new(),
            considered: HashSet::new(),
            trace: Vec::new(),
        };
        let mut violations = Vec::new();

        let mut candidates = Vec::new();
        if let Some(domain) = req.domain {
            let tiers = self.router.tiers_for(domain);
            if tiers.is_empty() {
                debug!(domain, "no tiers for domain, using generic fallback");
            } else if let Some(hit) = self.fast_path(&mut attempt, &tiers) {
                candidates.push(hit);
            }
        }
        if candidates.is_empty() {
            candidates = self.generic_fallback(&mut attempt);
        }

        if let Some(policy) = req.policy {
            self.apply_policy(policy, &mut candidates, &mut violations);
        }

        if attempt.roster {
            let before = candidates.len();
            candidates.retain(|c| !c.kind().is_social());
            if candidates.len() < before {
                violations.push(format!(
                    "roster guard: dropped {} community candidate(s)",
                    before - candidates.len()
                ));
            }
        }

        let mut unknown_reason = "no evidence";
        if !candidates.is_empty()
            && is_sports_result_like(&query.key, req.domain, req.query_type)
            && candidates.iter().all(|c| c.kind().is_news_or_social())
        {
            violations.push(format!(
                "sports guard: discarded {} news/social candidate(s) for a result query",
                candidates.len()
            ));
            candidates.clear();
            unknown_reason = "sports result without an authoritative source";
        }

        let trace = attempt.trace;
        let Some(best) = select_best(&candidates) else {
            info!(query = %query.key, reason = unknown_reason, "no reliable answer");
            let truth = TruthResult::not_found(req.query)
                .with_trace(trace)
                .with_violations(violations);
            self.unknowns.append(req.query, unknown_reason);
            self.cache.put(&cache_key, &truth);
            return truth;
        };

        let mut evidence = best.fetched.evidence.clone();
        evidence.confidence = best.confidence;
        let truth = TruthResult::found(req.query, best.kind(), &evidence)
            .with_trace(trace)
            .with_violations(violations);
        info!(
            query = %query.key,
            adapter = %best.fetched.adapter,
            tier = truth.tier.as_str(),
            confidence = truth.confidence,
            "answer selected"
        );
        self.cache.put(&cache_key, &truth);
        truth
    }

    /// Domain tiers in order; returns the first acceptable result
    fn fast_path(&mut self, attempt: &mut Attempt<'_>, tiers: &DomainTiers) -> Option<Candidate> {
        let mut social: Vec<String> = Vec::new();
        let skip_social = attempt.roster || is_generic_news(attempt.query);

        for (tier, name) in tiers.ordered() {
            let Some(kind) = self.registry.get(name).map(|a| a.kind()) else {
                debug!(adapter = name, "domain lists an unregistered adapter");
                continue;
            };
            if kind.is_social() {
                if !skip_social {
                    social.push(name.to_string());
                }
                continue;
            }
            if attempt.results.contains_key(name) {
                continue;
            }
            let Some(fetched) = self.call_once(attempt, name) else {
                continue;
            };
            if !fetched.evidence.is_found() {
                attempt.record(&fetched, fetched.evidence.status.as_str().to_string());
                continue;
            }
            let floor = match tier {
                1 => 0.0,
                2 => self.settings.effective_secondary_floor(),
                _ => self.settings.effective_tertiary_floor(),
            };
            if fetched.evidence.confidence >= floor {
                attempt.record(&fetched, format!("accepted (fast path tier {})", tier));
                return Some(Candidate::new(fetched));
            }
            attempt.record(&fetched, format!("below tier {} floor {:.2}", tier, floor));
        }

        for name in social {
            if attempt.results.contains_key(&name) {
                continue;
            }
            if let Some(fetched) = self.call_once(attempt, &name) {
                if self.passes_social_gate(attempt, &fetched) {
                    return Some(Candidate::new(fetched));
                }
            }
        }
        None
    }

    /// Keyword-routed adapters, then the structured -> encyclopedic -> news ->
    /// local corpus chain. Collects every FOUND result.
    fn generic_fallback(&mut self, attempt: &mut Attempt<'_>) -> Vec<Candidate> {
        let mut found = Vec::new();

        let routed = self.registry.route_query(&attempt.query.raw);
        for name in routed.into_iter().take(self.settings.effective_max_fetchers()) {
            if let Some(c) = self.try_generic(attempt, &name) {
                found.push(c);
            }
        }

        let chain: [&[SourceKind]; 4] = [
            &[SourceKind::Wikidata, SourceKind::Dbpedia],
            &[SourceKind::Wikipedia],
            &[SourceKind::NewsRss],
            &[SourceKind::LocalCorpus],
        ];
        for (step, kinds) in chain.iter().enumerate() {
            let Some(name) = self.registry.first_of_kind(kinds).map(String::from) else {
                continue;
            };
            let hit = self.try_generic(attempt, &name);
            let structured_answered = step == 0 && hit.is_some();
            if let Some(c) = hit {
                found.push(c);
            }
            if structured_answered {
                break;
            }
        }
        found
    }

    /// Call `name` unless this search already did; earlier results are reused
    fn call_once(&mut self, attempt: &mut Attempt<'_>, name: &str) -> Option<Fetched> {
        if let Some(prev) = attempt.results.get(name) {
            return Some(prev.clone());
        }
        let fetched = self.registry.call(name, &attempt.query.raw)?;
        attempt.results.insert(name.to_string(), fetched.clone());
        Some(fetched)
    }

    fn try_generic(&mut self, attempt: &mut Attempt<'_>, name: &str) -> Option<Candidate> {
        if !attempt.considered.insert(name.to_string()) {
            return None;
        }
        let fetched = self.call_once(attempt, name)?;
        if !fetched.evidence.is_found() {
            attempt.record(&fetched, fetched.evidence.status.as_str().to_string());
            return None;
        }
        if fetched.kind.is_social() {
            if attempt.roster {
                attempt.record(&fetched, "excluded: roster-style query".to_string());
                return None;
            }
            if !self.passes_social_gate(attempt, &fetched) {
                return None;
            }
            return Some(Candidate::new(fetched));
        }
        attempt.record(&fetched, "candidate".to_string());
        Some(Candidate::new(fetched))
    }

    /// Community results need a confidence floor and keyword overlap with the query
    fn passes_social_gate(&self, attempt: &mut Attempt<'_>, fetched: &Fetched) -> bool {
        if !fetched.evidence.is_found() {
            attempt.record(fetched, fetched.evidence.status.as_str().to_string());
            return false;
        }
        let floor = self.settings.effective_social_floor();
        let summary = fetched.evidence.summary.to_lowercase();
        let keywords = attempt.query.significant_keywords();
        let hits = keywords.iter().filter(|k| summary.contains(*k)).count();
        let needed = self.settings.social_keyword_hits;
        let ok = fetched.evidence.confidence >= floor && hits >= needed;
        attempt.record(
            fetched,
            format!(
                "social gate {} ({}/{} keywords, floor {:.2})",
                if ok { "passed" } else { "rejected" },
                hits,
                needed,
                floor
            ),
        );
        ok
    }

    fn apply_policy(
        &self,
        policy: &SearchPolicy,
        candidates: &mut Vec<Candidate>,
        violations: &mut Vec<String>,
    ) {
        if policy.rules.require_numeric {
            let before = candidates.len();
            candidates.retain(|c| c.fetched.evidence.summary.chars().any(|ch| ch.is_ascii_digit()));
            if candidates.len() < before {
                violations.push(format!(
                    "policy '{}': dropped {} candidate(s) without numbers",
                    policy.pattern,
                    before - candidates.len()
                ));
            }
        }
        if !policy.rules.preferred_sources.is_empty() {
            let bonus = self.settings.effective_preferred_source_bonus();
            for c in candidates.iter_mut() {
                let preferred = policy.rules.preferred_sources.contains(&c.fetched.adapter)
                    || policy.rules.preferred_sources.contains(&c.fetched.evidence.source_name);
                if preferred {
                    c.confidence = (c.confidence + bonus).min(1.0);
                }
            }
        }
    }

    pub fn registry(&self) -> &FetchRegistry {
        &self.registry
    }

    pub fn router(&self) -> &DomainRouter {
        &self.router
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QueryCache {
        &mut self.cache
    }

    pub fn unknowns(&self) -> &UnknownLog {
        &self.unknowns
    }

    pub fn unknowns_mut(&mut self) -> &mut UnknownLog {
        &mut self.unknowns
    }
}

/// Highest confidence; ties go to the more trusted tier, then the earlier candidate
fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
        None => Some(c),
        Some(b) => {
            let better = c.confidence > b.confidence
                || (c.confidence == b.confidence && c.kind().tier().rank() > b.kind().tier().rank());
            Some(if better { c } else { b })
        }
    })
}
