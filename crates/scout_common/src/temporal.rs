//! Temporal analysis: does a piece of text refer to information that may
//! postdate the knowledge cutoff?
//!
//! Time sensitivity is a union of independent signals; any one is enough:
//! - explicit temporal keywords ("now", "today", "latest", ...)
//! - always-temporal domain vocabulary (price, weather, scores, news, bestsellers)
//! - role/identity phrasing ("who is the ...", "what is the current ...")
//! - explicit years, ISO dates or relative phrases after the cutoff
//!
//! Mentioning only years at or before the cutoff year suppresses the domain
//! vocabulary signal ("the 1990 world cup score" is history).

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const KEYWORDS: &[&str] = &[
    "right now",
    "today",
    "now",
    "currently",
    "current",
    "this year",
    "this month",
    "this week",
    "tonight",
    "yesterday",
    "tomorrow",
    "last night",
    "last week",
    "recently",
    "recent",
    "latest",
    "newest",
    "up to date",
    "up-to-date",
    "as of",
];

const DOMAIN_TERMS: &[&str] = &[
    "stock price",
    "price",
    "prices",
    "weather",
    "forecast",
    "temperature",
    "score",
    "scores",
    "standings",
    "news",
    "headline",
    "headlines",
    "breaking",
    "bestseller",
    "bestsellers",
    "best seller",
    "best sellers",
];

const ROLE_PHRASES: &[&str] = &["who is the", "who's the", "what is the current"];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

/// Result of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalSignal {
    pub is_temporal: bool,
    /// An explicit year, date or resolved relative phrase lies after the cutoff
    pub after_cutoff: bool,
    pub has_keywords: bool,
    pub has_domain: bool,
    pub has_role: bool,
    pub years: Vec<i32>,
    pub dates: Vec<NaiveDate>,
    /// Date a relative phrase ("yesterday", "last week") resolves to
    pub resolved_date: Option<NaiveDate>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TemporalAnalyzer {
    cutoff: NaiveDate,
}

impl TemporalAnalyzer {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn analyze(&self, text: &str, today: NaiveDate) -> TemporalSignal {
        let lower = text.to_lowercase();
        let mut signal = TemporalSignal::default();

        for kw in KEYWORDS {
            if contains_phrase(&lower, kw) {
                signal.has_keywords = true;
                signal.reasons.push(format!("keyword:{}", kw));
                break;
            }
        }

        signal.years = YEAR_RE
            .captures_iter(&lower)
            .filter_map(|c| c[1].parse::<i32>().ok())
            .collect();
        signal.dates = DATE_RE
            .captures_iter(&lower)
            .filter_map(|c| {
                NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)
            })
            .collect();

        let historical_only = !signal.years.is_empty()
            && signal.years.iter().all(|y| *y <= self.cutoff.year());

        if let Some(term) = DOMAIN_TERMS.iter().find(|t| contains_phrase(&lower, t)) {
            if historical_only {
                signal.reasons.push(format!("domain:{} (historical)", term));
            } else {
                signal.has_domain = true;
                signal.reasons.push(format!("domain:{}", term));
            }
        }

        if let Some(phrase) = ROLE_PHRASES.iter().find(|p| lower.contains(*p)) {
            signal.has_role = true;
            signal.reasons.push(format!("role:{}", phrase));
        }

        for year in &signal.years {
            if *year > self.cutoff.year() {
                signal.after_cutoff = true;
                signal.reasons.push(format!("year:{}", year));
            }
        }
        for date in &signal.dates {
            if *date > self.cutoff {
                signal.after_cutoff = true;
                signal.reasons.push(format!("date:{}", date));
            }
        }

        if let Some((phrase, date)) = resolve_relative(&lower, today) {
            signal.resolved_date = Some(date);
            if date > self.cutoff {
                signal.after_cutoff = true;
                signal.reasons.push(format!("relative:{}={}", phrase, date));
            }
        }

        signal.is_temporal =
            signal.has_keywords || signal.has_domain || signal.has_role || signal.after_cutoff;
        signal
    }
}

/// Word-bounded phrase test
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + phrase.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

fn resolve_relative(lower: &str, today: NaiveDate) -> Option<(&'static str, NaiveDate)> {
    const RELATIVE: &[(&str, i64)] = &[
        ("day before yesterday", -2),
        ("yesterday", -1),
        ("last night", -1),
        ("tomorrow", 1),
        ("tonight", 0),
        ("today", 0),
        ("right now", 0),
        ("now", 0),
        ("this week", 0),
        ("this month", 0),
        ("this year", 0),
        ("last week", -7),
        ("next week", 7),
    ];
    RELATIVE
        .iter()
        .find(|(p, _)| contains_phrase(lower, p))
        .map(|(p, days)| (*p, today + Duration::days(*days)))
}
