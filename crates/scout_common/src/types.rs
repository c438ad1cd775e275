//! Core data model shared by every Scout component.
//!
//! - `Query`: raw text plus the normalized key used by the cache and fact store
//! - `EvidenceResult`: what a single adapter call returns
//! - `TruthResult`: the arbitrated, traceable answer to one query
//! - `Turn`: one conversation line, used for topic resolution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form structured metadata attached to results and facts
pub type Metadata = BTreeMap<String, serde_json::Value>;

// ============================================================================
// Query
// ============================================================================

/// A user query and its normalized lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    pub key: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            key: normalize_key(raw),
        }
    }

    /// Words longer than three characters, used by relevance gates
    pub fn significant_keywords(&self) -> Vec<&str> {
        self.key
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.chars().count() > 3)
            .collect()
    }
}

/// Lower-cased, trimmed form of a query used as a store key
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

// ============================================================================
// Source classification
// ============================================================================

/// Trust rank of an evidence source class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTier {
    Primary,
    Secondary,
    Tertiary,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Primary => "PRIMARY",
            SourceTier::Secondary => "SECONDARY",
            SourceTier::Tertiary => "TERTIARY",
        }
    }

    /// Higher is more trusted; used to break confidence ties
    pub fn rank(&self) -> u8 {
        match self {
            SourceTier::Primary => 3,
            SourceTier::Secondary => 2,
            SourceTier::Tertiary => 1,
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of source an adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Wikidata,
    Wikipedia,
    Dbpedia,
    NewsRss,
    Finance,
    Crypto,
    Weather,
    Sports,
    GovernmentApi,
    OpenData,
    Community,
    LocalCorpus,
    Other,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Wikidata => "WIKIDATA",
            SourceKind::Wikipedia => "WIKIPEDIA",
            SourceKind::Dbpedia => "DBPEDIA",
            SourceKind::NewsRss => "NEWS_RSS",
            SourceKind::Finance => "FINANCE",
            SourceKind::Crypto => "CRYPTO",
            SourceKind::Weather => "WEATHER",
            SourceKind::Sports => "SPORTS",
            SourceKind::GovernmentApi => "GOVERNMENT_API",
            SourceKind::OpenData => "OPEN_DATA",
            SourceKind::Community => "COMMUNITY",
            SourceKind::LocalCorpus => "LOCAL_CORPUS",
            SourceKind::Other => "OTHER",
        }
    }

    /// Tier class of this kind.
    ///
    /// Structured registries are PRIMARY, encyclopedic text is SECONDARY,
    /// news and social feeds are TERTIARY.
    pub fn tier(&self) -> SourceTier {
        match self {
            SourceKind::Wikidata
            | SourceKind::Dbpedia
            | SourceKind::Finance
            | SourceKind::Crypto
            | SourceKind::Weather
            | SourceKind::Sports
            | SourceKind::GovernmentApi
            | SourceKind::OpenData => SourceTier::Primary,
            SourceKind::Wikipedia | SourceKind::LocalCorpus => SourceTier::Secondary,
            SourceKind::NewsRss | SourceKind::Community | SourceKind::Other => {
                SourceTier::Tertiary
            }
        }
    }

    /// Generic news or social feed (no editorial authority for results)
    pub fn is_news_or_social(&self) -> bool {
        matches!(self, SourceKind::NewsRss | SourceKind::Community)
    }

    pub fn is_social(&self) -> bool {
        matches!(self, SourceKind::Community)
    }

    /// Quotes and conditions that are stale within hours; never durable knowledge
    pub fn is_live_data(&self) -> bool {
        matches!(self, SourceKind::Finance | SourceKind::Crypto | SourceKind::Weather)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Evidence (per adapter call)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStatus {
    Found,
    NotFound,
    Error,
    RateLimited,
    NeedsCredential,
}

impl EvidenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStatus::Found => "FOUND",
            EvidenceStatus::NotFound => "NOT_FOUND",
            EvidenceStatus::Error => "ERROR",
            EvidenceStatus::RateLimited => "RATE_LIMITED",
            EvidenceStatus::NeedsCredential => "NEEDS_CREDENTIAL",
        }
    }
}

/// Uniform result of one adapter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceResult {
    pub status: EvidenceStatus,
    pub summary: String,
    /// Always within [0, 1]
    pub confidence: f64,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl EvidenceResult {
    pub fn found(source_name: &str, summary: impl Into<String>, confidence: f64) -> Self {
        Self {
            status: EvidenceStatus::Found,
            summary: summary.into(),
            confidence: clamp_confidence(confidence),
            source_name: source_name.to_string(),
            url: None,
            metadata: Metadata::new(),
        }
    }

    pub fn not_found(source_name: &str) -> Self {
        Self::failure(source_name, EvidenceStatus::NotFound, "no match")
    }

    pub fn error(source_name: &str, reason: impl Into<String>) -> Self {
        Self::failure(source_name, EvidenceStatus::Error, reason)
    }

    pub fn rate_limited(source_name: &str) -> Self {
        Self::failure(source_name, EvidenceStatus::RateLimited, "rate limited")
    }

    pub fn needs_credential(source_name: &str, key_name: &str) -> Self {
        Self::failure(
            source_name,
            EvidenceStatus::NeedsCredential,
            format!("{} is not configured", key_name),
        )
    }

    fn failure(source_name: &str, status: EvidenceStatus, reason: impl Into<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("reason".to_string(), serde_json::Value::String(reason.into()));
        Self {
            status,
            summary: String::new(),
            confidence: 0.0,
            source_name: source_name.to_string(),
            url: None,
            metadata,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn is_found(&self) -> bool {
        self.status == EvidenceStatus::Found
    }

    /// Failure reason recorded by the adapter, if any
    pub fn reason(&self) -> Option<&str> {
        self.metadata.get("reason").and_then(|v| v.as_str())
    }
}

pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Truth (orchestrator output)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TruthStatus {
    Found,
    NotFound,
}

/// One step of the provenance chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTraceEntry {
    pub tier: SourceTier,
    pub kind: SourceKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub confidence: f64,
    pub note: String,
}

/// Arbitrated answer to one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthResult {
    pub status: TruthStatus,
    pub query: String,
    pub canonical_summary: String,
    pub confidence: f64,
    pub primary_source_kind: SourceKind,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Always `primary_source_kind.tier()`
    pub tier: SourceTier,
    #[serde(default)]
    pub source_trace: Vec<SourceTraceEntry>,
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl TruthResult {
    /// Build a FOUND result from the winning evidence; tier is derived from kind
    pub fn found(query: &str, kind: SourceKind, evidence: &EvidenceResult) -> Self {
        Self {
            status: TruthStatus::Found,
            query: query.to_string(),
            canonical_summary: evidence.summary.clone(),
            confidence: clamp_confidence(evidence.confidence),
            primary_source_kind: kind,
            source_name: evidence.source_name.clone(),
            url: evidence.url.clone(),
            tier: kind.tier(),
            source_trace: Vec::new(),
            violations: Vec::new(),
            metadata: evidence.metadata.clone(),
        }
    }

    pub fn not_found(query: &str) -> Self {
        Self {
            status: TruthStatus::NotFound,
            query: query.to_string(),
            canonical_summary: format!(
                "I could not find reliable information about '{}' yet.",
                query.trim()
            ),
            confidence: 0.0,
            primary_source_kind: SourceKind::Other,
            source_name: "none".to_string(),
            url: None,
            tier: SourceKind::Other.tier(),
            source_trace: Vec::new(),
            violations: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_trace(mut self, trace: Vec<SourceTraceEntry>) -> Self {
        self.source_trace = trace;
        self
    }

    pub fn with_violations(mut self, violations: Vec<String>) -> Self {
        self.violations = violations;
        self
    }

    pub fn is_found(&self) -> bool {
        self.status == TruthStatus::Found
    }

    /// Tier invariant holds and confidence is in range
    pub fn is_consistent(&self) -> bool {
        self.tier == self.primary_source_kind.tier()
            && (0.0..=1.0).contains(&self.confidence)
    }
}

// ============================================================================
// Conversation turns
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One conversation line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
    /// Topic discussed in this turn, when one was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Turn {
    pub fn user(content: &str) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.to_string(),
            topic: None,
        }
    }

    pub fn assistant(content: &str, topic: Option<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            content: content.to_string(),
            topic,
        }
    }
}

/// Most recently discussed topic, newest turn first
pub fn last_topic(turns: &[Turn]) -> Option<&str> {
    turns.iter().rev().find_map(|t| t.topic.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalization() {
        let q = Query::new("  What Is Rust?  ");
        assert_eq!(q.key, "what is rust?");
        assert_eq!(q.raw, "  What Is Rust?  ");
    }

    #[test]
    fn test_significant_keywords() {
        let q = Query::new("who won the giants game last night");
        assert_eq!(q.significant_keywords(), vec!["giants", "game", "last", "night"]);
    }

    #[test]
    fn test_kind_tier_classes() {
        assert_eq!(SourceKind::Wikidata.tier(), SourceTier::Primary);
        assert_eq!(SourceKind::Sports.tier(), SourceTier::Primary);
        assert_eq!(SourceKind::Wikipedia.tier(), SourceTier::Secondary);
        assert_eq!(SourceKind::NewsRss.tier(), SourceTier::Tertiary);
        assert_eq!(SourceKind::Community.tier(), SourceTier::Tertiary);
    }

    #[test]
    fn test_live_data_kinds() {
        assert!(SourceKind::Crypto.is_live_data());
        assert!(SourceKind::Weather.is_live_data());
        assert!(!SourceKind::Wikipedia.is_live_data());
        assert!(!SourceKind::Wikidata.is_live_data());
    }

    #[test]
    fn test_evidence_confidence_clamped() {
        assert_eq!(EvidenceResult::found("x", "s", 1.7).confidence, 1.0);
        assert_eq!(EvidenceResult::found("x", "s", -0.2).confidence, 0.0);
        assert_eq!(EvidenceResult::found("x", "s", f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_failure_results_have_zero_confidence() {
        let r = EvidenceResult::needs_credential("newsapi", "NEWSAPI_KEY");
        assert_eq!(r.status, EvidenceStatus::NeedsCredential);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.reason(), Some("NEWSAPI_KEY is not configured"));
    }

    #[test]
    fn test_truth_tier_follows_kind() {
        let ev = EvidenceResult::found("wikipedia", "Rust is a language", 0.8);
        let truth = TruthResult::found("rust", SourceKind::Wikipedia, &ev);
        assert_eq!(truth.tier, SourceTier::Secondary);
        assert!(truth.is_consistent());

        let missing = TruthResult::not_found("nothing");
        assert!(missing.is_consistent());
        assert_eq!(missing.confidence, 0.0);
    }

    #[test]
    fn test_truth_json_round_trip_is_exact() {
        let ev = EvidenceResult::found("coingecko", "Bitcoin is $64,123.45 USD", 0.95)
            .with_url("https://api.coingecko.com")
            .with_meta("price_usd", 64123.45);
        let truth = TruthResult::found("bitcoin", SourceKind::Crypto, &ev)
            .with_violations(vec!["policy: dropped 1 candidate".to_string()]);
        let json = serde_json::to_string(&truth).unwrap();
        let back: TruthResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, truth);
    }

    #[test]
    fn test_last_topic() {
        let turns = vec![
            Turn::user("what is rust"),
            Turn::assistant("Rust is...", Some("rust".to_string())),
            Turn::user("thanks"),
            Turn::assistant("You're welcome", None),
        ];
        assert_eq!(last_topic(&turns), Some("rust"));
        assert_eq!(last_topic(&[]), None);
    }
}
