//! Feedback detection: is the user correcting, redirecting or critiquing?
//!
//! Evaluated through the shared rule table. Confidence is the mean weight of
//! the distinct categories that fired.

use crate::rules::{RuleSpec, RuleTable};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    CorrectionFact,
    CorrectionTool,
    CorrectionLogic,
    PreferenceStyle,
    PreferenceCapability,
    MetaSystem,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::CorrectionFact => "correction_fact",
            FeedbackKind::CorrectionTool => "correction_tool",
            FeedbackKind::CorrectionLogic => "correction_logic",
            FeedbackKind::PreferenceStyle => "preference_style",
            FeedbackKind::PreferenceCapability => "preference_capability",
            FeedbackKind::MetaSystem => "meta_system",
        }
    }

    pub fn is_correction(&self) -> bool {
        matches!(
            self,
            FeedbackKind::CorrectionFact | FeedbackKind::CorrectionTool | FeedbackKind::CorrectionLogic
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDetection {
    pub kinds: BTreeSet<FeedbackKind>,
    pub severity: Severity,
    pub confidence: f64,
    /// Value the user says is right ("actually it's 42")
    pub corrected_value: Option<String>,
    /// Adapter names the user pointed at
    pub preferred_sources: BTreeSet<String>,
    pub wants_numeric: bool,
}

impl FeedbackDetection {
    pub fn is_correction(&self) -> bool {
        self.kinds.iter().any(|k| k.is_correction())
    }
}

use FeedbackKind::*;

macro_rules! source_names {
    () => {
        r"wikipedia|wikidata|dbpedia|newsapi|news|reddit|thesportsdb|sportsdb|coingecko|open[- ]?meteo|nyt|new york times"
    };
}

const FEEDBACK_SPECS: &[RuleSpec<FeedbackKind>] = &[
    RuleSpec::new("correction_prefix", r"^\s*correction\s*:", CorrectionFact, 0.9),
    RuleSpec::new("leading_no", r"^\s*(?:no|nope)\b\s*[,.!]", CorrectionFact, 0.9),
    RuleSpec::new(
        "thats_wrong",
        r"\bthat(?:'s| is| was) (?:wrong|incorrect|not (?:right|true|correct)|false)\b",
        CorrectionFact,
        0.9,
    ),
    RuleSpec::new("you_are_wrong", r"\b(?:you're|you are) (?:wrong|mistaken)\b", CorrectionFact, 0.9),
    RuleSpec::new("incorrect", r"\b(?:incorrect|not true|outdated)\b", CorrectionFact, 0.9),
    RuleSpec::new("actually", r"^\s*actually\b", CorrectionFact, 0.9),
    RuleSpec::new("should_be", r"\b(?:it|that|the answer) should be\b", CorrectionFact, 0.9),
    RuleSpec::new(
        "use_source",
        concat!(
            r"\b(?:use|check|try|ask|search|consult|look (?:it )?up (?:on|in)|look at) (?:the )?(?P<slot>",
            source_names!(),
            r")\b"
        ),
        CorrectionTool,
        0.85,
    ),
    RuleSpec::new("next_time_use", r"\bnext time\b.*\buse\b", CorrectionTool, 0.85),
    RuleSpec::new("wrong_source", r"\bwrong (?:source|tool|api|site)\b", CorrectionTool, 0.85),
    RuleSpec::new(
        "makes_no_sense",
        r"\b(?:doesn't|does not|that doesn't|makes no) (?:make )?sense\b",
        CorrectionLogic,
        0.8,
    ),
    RuleSpec::new("contradiction", r"\b(?:contradict\w*|illogical)\b", CorrectionLogic, 0.8),
    RuleSpec::new(
        "wrong_reasoning",
        r"\bwrong (?:math|calculation|reasoning|logic)\b",
        CorrectionLogic,
        0.8,
    ),
    RuleSpec::new(
        "length_style",
        r"\b(?:too (?:long|short|verbose|wordy)|shorter|more concise|less verbose|more detail(?:ed)?|simpler)\b",
        PreferenceStyle,
        0.75,
    ),
    RuleSpec::new(
        "wants_numbers",
        r"\b(?:give|show|include|tell) (?:me )?(?:the )?(?:actual |exact )?(?:numbers?|figures?|digits|price|value)\b",
        PreferenceCapability,
        0.7,
    ),
    RuleSpec::new("with_numbers", r"\b(?:with|in) numbers\b", PreferenceCapability, 0.7),
    RuleSpec::new("you_always", r"\byou (?:always|never|keep)\b", MetaSystem, 0.6),
    RuleSpec::new("stop_doing", r"\bstop (?:doing|saying|giving)\b", MetaSystem, 0.6),
    RuleSpec::new("should_learn", r"\byou should (?:learn|remember|know)\b", MetaSystem, 0.6),
];

static FEEDBACK_RULES: LazyLock<RuleTable<FeedbackKind>> =
    LazyLock::new(|| RuleTable::compile(FEEDBACK_SPECS).unwrap());

static MAJOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:completely|totally|absolutely|terrible|awful|useless|nonsense|ridiculous|garbage)\b")
        .unwrap()
});

static CORRECTED_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^\s*correction\s*:\s*|\bactually,?\s+(?:it(?:'s| is| was)\s+|the answer is\s+)?|\bshould be\s+)(?P<value>[^.!?]+)",
    )
    .unwrap()
});

static SOURCE_MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!(r"(?i)\b(?:", source_names!(), r")\b")).unwrap());

#[derive(Debug, Clone, Default)]
pub struct FeedbackDetector;

impl FeedbackDetector {
    pub fn new() -> Self {
        Self
    }

    /// None when the text carries no feedback at all
    pub fn detect(&self, text: &str) -> Option<FeedbackDetection> {
        let matches = FEEDBACK_RULES.all_matches(text);
        if matches.is_empty() {
            return None;
        }

        let mut kinds = BTreeSet::new();
        let mut weights = Vec::new();
        for m in &matches {
            if kinds.insert(m.category) {
                weights.push(m.weight);
            }
        }
        let confidence = weights.iter().sum::<f64>() / weights.len() as f64;

        let severity = if MAJOR_RE.is_match(text) {
            Severity::Major
        } else if kinds.iter().any(|k| k.is_correction() || *k == MetaSystem) {
            Severity::Moderate
        } else {
            Severity::Minor
        };

        let corrected_value = CORRECTED_VALUE_RE
            .captures(text)
            .and_then(|c| c.name("value"))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty());

        let preferred_sources = if kinds.contains(&CorrectionTool) {
            SOURCE_MENTION_RE
                .find_iter(text)
                .map(|m| canonical_source(m.as_str()))
                .collect()
        } else {
            BTreeSet::new()
        };

        Some(FeedbackDetection {
            wants_numeric: kinds.contains(&PreferenceCapability),
            kinds,
            severity,
            confidence,
            corrected_value,
            preferred_sources,
        })
    }

    /// Whether any correction-category rule fires
    pub fn is_correction(&self, text: &str) -> bool {
        FEEDBACK_RULES
            .first_where(text, |k| k.is_correction())
            .is_some()
    }
}

/// Map a mentioned source to the adapter name it refers to
fn canonical_source(mention: &str) -> String {
    let lower = mention.to_lowercase();
    match lower.as_str() {
        "news" => "news_rss".to_string(),
        "sportsdb" => "thesportsdb".to_string(),
        "nyt" | "new york times" => "nyt_bestseller".to_string(),
        s if s.starts_with("open") => "open_meteo".to_string(),
        _ => lower,
    }
}
