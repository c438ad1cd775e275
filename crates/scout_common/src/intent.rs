//! Intent Classifier
//!
//! Rule-based: text -> {action, domain, query_type, time_sensitive, params}.
//! Checks run in precedence order and the first hit wins:
//!
//! 1. identity questions about the assistant itself
//! 2. sports result/roster, breaking news, bestseller triggers (always time-sensitive)
//! 3. role queries: "who is the current X", "who is the coach for Y" (always time-sensitive)
//! 4. typed slots: "price of X", weather
//! 5. memory write/read
//! 6. open-domain "what is / define X": stored knowledge unless time-sensitive
//! 7. corrections, with the topic resolved against known facts or the last topic
//! 8. conversation, escalated to retrieval when the temporal scan fires
//!
//! Steps 1-6 are a single ordered rule table; table order is the precedence.

use crate::feedback::{FeedbackDetection, FeedbackDetector};
use crate::identity::IdentitySlot;
use crate::rules::{RuleMatch, RuleSpec, RuleTable};
use crate::temporal::{TemporalAnalyzer, TemporalSignal};
use crate::types::{last_topic, normalize_key, Turn};
use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

// ============================================================================
// Actions
// ============================================================================

/// Everything the engine knows how to do. Dispatch is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Identity,
    Retrieve,
    PriceQuery,
    WeatherQuery,
    MemoryWrite,
    MemoryRead,
    ReturnKnowledge,
    Correction,
    Converse,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Identity => "IDENTITY",
            Action::Retrieve => "RETRIEVE",
            Action::PriceQuery => "PRICE_QUERY",
            Action::WeatherQuery => "WEATHER_QUERY",
            Action::MemoryWrite => "MEMORY_WRITE",
            Action::MemoryRead => "MEMORY_READ",
            Action::ReturnKnowledge => "RETURN_KNOWLEDGE",
            Action::Correction => "CORRECTION",
            Action::Converse => "CONVERSE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter names used in `Intent::params`
pub mod param {
    pub const TOPIC: &str = "topic";
    pub const ASSET: &str = "asset";
    pub const LOCATION: &str = "location";
    pub const FACT: &str = "fact";
    pub const SLOT: &str = "slot";
    pub const ROLE: &str = "role";
    pub const ORG: &str = "org";
    pub const REASON: &str = "reason";
    pub const CORRECTION: &str = "correction";
}

/// Query types the orchestrator treats as identity/roster-style
pub const ROSTER_STYLE_QUERY_TYPES: &[&str] = &["roster", "office_holder"];

pub fn is_roster_style(query_type: Option<&str>) -> bool {
    query_type.is_some_and(|q| ROSTER_STYLE_QUERY_TYPES.contains(&q))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Action,
    pub domain: Option<String>,
    pub query_type: Option<String>,
    pub time_sensitive: bool,
    pub params: BTreeMap<String, String>,
    /// Label of the rule that decided the action, if any
    pub rule: Option<String>,
    /// Set for corrections
    pub feedback: Option<FeedbackDetection>,
}

impl Intent {
    fn new(action: Action) -> Self {
        Self {
            action,
            domain: None,
            query_type: None,
            time_sensitive: false,
            params: BTreeMap::new(),
            rule: None,
            feedback: None,
        }
    }

    fn domain(mut self, domain: &str, query_type: &str) -> Self {
        self.domain = Some(domain.to_string());
        self.query_type = Some(query_type.to_string());
        self
    }

    fn time_sensitive(mut self, yes: bool) -> Self {
        self.time_sensitive = yes;
        self
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    fn rule(mut self, label: &str) -> Self {
        self.rule = Some(label.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    pub fn topic(&self) -> Option<&str> {
        self.get(param::TOPIC)
    }
}

// ============================================================================
// Rule table (steps 1-6)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentRule {
    Identity(IdentitySlot),
    SportsResult,
    SportsRoster,
    BreakingNews,
    Bestseller,
    SportsRole,
    OfficeHolder,
    Price,
    Weather,
    MemoryWrite,
    MemoryRead,
    OpenDomain,
}

use IdentitySlot as Id;
use IntentRule as R;

const INTENT_SPECS: &[RuleSpec<IntentRule>] = &[
    // 1. identity
    RuleSpec::new("who_are_you", r"^\s*(?:who|what) are you\b|\bwhat(?:'s| is) your name\b|\bintroduce yourself\b", R::Identity(Id::WhoAreYou), 1.0),
    RuleSpec::new("purpose", r"\bwhat(?:'s| is) your (?:purpose|goal|job|mission)\b|\bwhy do you exist\b|\bwhat (?:are|were) you (?:made |built )?for\b", R::Identity(Id::Purpose), 1.0),
    RuleSpec::new("capabilities", r"\bwhat can you do\b|\bwhat are your (?:capabilities|abilities|skills|features)\b|\bhow can you help\b", R::Identity(Id::Capabilities), 1.0),
    RuleSpec::new("knowledge_source", r"\bwhere do you get your (?:information|knowledge|answers|data)\b|\bwhat are your sources\b|\bhow do you know (?:things|stuff|anything)\b", R::Identity(Id::KnowledgeSource), 1.0),
    RuleSpec::new("limitations", r"\bwhat are your limit(?:ation)?s\b|\bwhat can(?:'t| ?not) you do\b", R::Identity(Id::Limitations), 1.0),
    RuleSpec::new("creator", r"\bwho (?:made|created|built|developed|wrote|designed) you\b|\bwho is your (?:creator|maker|developer|author)\b", R::Identity(Id::Creator), 1.0),
    // 2. highest-specificity domain triggers
    RuleSpec::new(
        "sports_who_won",
        r"\bwho (?:won|wins|beat)\b.*\b(?:game|games|match|team|league|cup|championship|series|bowl|race|grand prix|tournament|playoffs?|finals?|nfl|nba|mlb|nhl|fifa|uefa|premier league|vs|versus)\b|\b(?:game|match|race|finals?)\b.*\bwho (?:won|wins)\b",
        R::SportsResult,
        1.0,
    ),
    RuleSpec::new("sports_score", r"\b(?:final )?score (?:of|in|for) (?:the )?(?P<slot>[^?!]+)|\b(?:game|match|race) (?:result|score)s?\b", R::SportsResult, 1.0),
    RuleSpec::new("sports_did_win", r"\bdid (?:the )?(?P<slot>[\w .'-]+?) (?:win|lose|beat)\b", R::SportsResult, 1.0),
    RuleSpec::new("sports_standings", r"\bstandings\b", R::SportsResult, 1.0),
    RuleSpec::new("sports_roster", r"\b(?:roster|lineup|line-up|squad)\b|\bwho (?:plays|is playing) for (?:the )?(?P<org>[^?!]+)", R::SportsRoster, 1.0),
    RuleSpec::new("breaking_news", r"\b(?:breaking|latest|top|current|today's) news\b|\bheadlines?\b|\bwhat(?:'s| is) (?:happening|going on) in the world\b", R::BreakingNews, 1.0),
    RuleSpec::new("bestseller", r"\bbest[- ]?sellers?\b|\btop (?:selling )?books\b", R::Bestseller, 1.0),
    // 3. role queries
    RuleSpec::new(
        "sports_role",
        r"\bwho(?:'s| is| are) the (?:current |starting )?(?P<slot>(?:head )?coach|quarterback|qb|pitcher|captain|goalkeeper|goalie|manager|point guard|striker|shortstop)e?s? (?:for|of|on|at) (?:the )?(?P<org>[\w .'&-]+?)\s*[?.!]*\s*$",
        R::SportsRole,
        1.0,
    ),
    RuleSpec::new(
        "office_holder",
        r"\bwho(?:'s| is) the (?:current )?(?P<slot>president|vice president|prime minister|chancellor|king|queen|monarch|pope|ceo|chief executive|chairman|chair|governor|mayor|speaker|secretary[\w ]*?|leader|head of state)(?: of (?:the )?(?P<org>[\w .'&-]+?))?\s*[?.!]*\s*$",
        R::OfficeHolder,
        1.0,
    ),
    RuleSpec::new(
        "current_role",
        r"\bwho(?:'s| is) the current (?P<slot>[\w ]+?)(?: (?:of|for|at) (?:the )?(?P<org>[\w .'&-]+?))?\s*[?.!]*\s*$",
        R::OfficeHolder,
        1.0,
    ),
    // 4. typed slots
    RuleSpec::new("price_of", r"\bprice of (?P<slot>[^?!]+)", R::Price, 1.0),
    RuleSpec::new("how_much_is", r"\bhow much (?:is|are|does) (?:an? |one )?(?P<slot>[\w .-]+?) (?:cost|worth|trading at|going for)\b", R::Price, 1.0),
    RuleSpec::new("asset_price", r"\b(?P<slot>bitcoin|btc|ethereum|eth|dogecoin|solana|litecoin|gold|silver) (?:price|value)\b", R::Price, 1.0),
    RuleSpec::new("weather", r"weather|\bforecast\b", R::Weather, 1.0),
    // 5. memory
    RuleSpec::new("remember", r"^\s*(?:please\s+)?remember(?:\s+that)?\s+(?P<slot>.+)$", R::MemoryWrite, 1.0),
    RuleSpec::new("about_me", r"\bwhat do you (?:know|remember) about me\b|^\s*who am i\b", R::MemoryRead, 1.0),
    // 6. open-domain lookups
    RuleSpec::new("what_is", r"^\s*(?:what|who)(?:'s|\s+is|\s+are)\s+(?:an?\s+|the\s+)?(?P<slot>[^?!]+?)\s*[?.!]*\s*$", R::OpenDomain, 1.0),
    RuleSpec::new("define", r"^\s*(?:define|definition of)\s+(?P<slot>[^?!]+?)\s*[?.!]*\s*$", R::OpenDomain, 1.0),
    RuleSpec::new("tell_me_about", r"^\s*(?:tell me about|explain)\s+(?P<slot>[^?!]+?)\s*[?.!]*\s*$", R::OpenDomain, 1.0),
    RuleSpec::new("what_does_mean", r"^\s*what does\s+(?P<slot>.+?)\s+mean\b", R::OpenDomain, 1.0),
    RuleSpec::new("who_won", r"^\s*who (?:won|wins)\s+(?P<slot>[^?!]+?)\s*[?.!]*\s*$", R::OpenDomain, 1.0),
];

static INTENT_RULES: LazyLock<RuleTable<IntentRule>> =
    LazyLock::new(|| RuleTable::compile(INTENT_SPECS).unwrap());

static WEATHER_LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|for|at)\s+(?P<loc>[a-z][\w .'-]*?)(?:\s+(?:today|tomorrow|tonight|now|right now|this week))?\s*[?.!]*\s*$")
        .unwrap()
});

const CORPORATE_ROLES: &[&str] = &["ceo", "chief executive", "chairman", "chair"];

const TRAILING_TIME_WORDS: &[&str] = &["right now", "today", "now", "currently", "at the moment"];

/// Trim punctuation, a leading article and trailing time words from a slot
pub fn clean_slot(raw: &str) -> String {
    let mut s = raw
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase();
    loop {
        let before = s.len();
        for word in TRAILING_TIME_WORDS {
            if let Some(stripped) = s.strip_suffix(word) {
                if stripped.is_empty() || stripped.ends_with(' ') {
                    s = stripped.trim_end().to_string();
                }
            }
        }
        if s.len() == before {
            break;
        }
    }
    for article in ["the ", "a ", "an "] {
        if let Some(rest) = s.strip_prefix(article) {
            s = rest.to_string();
            break;
        }
    }
    s.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

// ============================================================================
// Classifier
// ============================================================================

/// What the classifier may look at besides the text
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyContext<'a> {
    pub recent_turns: &'a [Turn],
    /// Normalized keys of facts already in the Fact Store
    pub known_topics: &'a [&'a str],
}

pub struct IntentClassifier {
    temporal: TemporalAnalyzer,
    feedback: FeedbackDetector,
    today: Option<NaiveDate>,
}

impl IntentClassifier {
    pub fn new(knowledge_cutoff: NaiveDate) -> Self {
        Self {
            temporal: TemporalAnalyzer::new(knowledge_cutoff),
            feedback: FeedbackDetector::new(),
            today: None,
        }
    }

    /// Pin "today" (for tests and replays)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn temporal_signal(&self, text: &str) -> TemporalSignal {
        self.temporal.analyze(text, self.today())
    }

    pub fn classify(&self, text: &str, ctx: &ClassifyContext<'_>) -> Intent {
        let text = text.trim();
        let signal = self.temporal_signal(text);

        let intent = if let Some(m) = INTENT_RULES.first_match(text) {
            self.from_rule(text, m, &signal, ctx)
        } else if self.feedback.is_correction(text) {
            self.correction(text, ctx)
        } else if signal.is_temporal {
            Intent::new(Action::Retrieve)
                .time_sensitive(true)
                .param(param::TOPIC, clean_slot(text))
                .param(param::REASON, signal.reasons.join(","))
                .rule("temporal_escalation")
        } else {
            Intent::new(Action::Converse)
        };

        debug!(
            action = intent.action.as_str(),
            domain = intent.domain.as_deref().unwrap_or("-"),
            time_sensitive = intent.time_sensitive,
            rule = intent.rule.as_deref().unwrap_or("-"),
            "classified"
        );
        intent
    }

    fn from_rule(
        &self,
        text: &str,
        m: RuleMatch<'_, IntentRule>,
        signal: &TemporalSignal,
        ctx: &ClassifyContext<'_>,
    ) -> Intent {
        let topic = normalize_key(text);
        let intent = match m.category {
            R::Identity(slot) => Intent::new(Action::Identity).param(param::SLOT, slot.as_str()),
            R::SportsResult => Intent::new(Action::Retrieve)
                .domain("sports", "result")
                .time_sensitive(true)
                .param(param::TOPIC, topic),
            R::SportsRoster => {
                let mut i = Intent::new(Action::Retrieve)
                    .domain("sports", "roster")
                    .time_sensitive(true)
                    .param(param::TOPIC, topic);
                if let Some(org) = m.org {
                    i = i.param(param::ORG, clean_slot(org));
                }
                i
            }
            R::BreakingNews => Intent::new(Action::Retrieve)
                .domain("news", "headlines")
                .time_sensitive(true)
                .param(param::TOPIC, topic),
            R::Bestseller => Intent::new(Action::Retrieve)
                .domain("books", "bestseller")
                .time_sensitive(true)
                .param(param::TOPIC, topic),
            R::SportsRole => self
                .role_intent(m, topic)
                .domain("sports", "roster"),
            R::OfficeHolder => {
                let corporate = m
                    .slot
                    .map(|s| CORPORATE_ROLES.contains(&s.to_lowercase().as_str()))
                    .unwrap_or(false);
                let mut i = self.role_intent(m, topic);
                if corporate {
                    i.query_type = Some("office_holder".to_string());
                } else {
                    i = i.domain("politics", "office_holder");
                }
                i
            }
            R::Price => {
                let asset = m.slot.map(clean_slot).unwrap_or_default();
                Intent::new(Action::PriceQuery)
                    .domain("finance", "price")
                    .time_sensitive(true)
                    .param(param::ASSET, asset.clone())
                    .param(param::TOPIC, asset)
            }
            R::Weather => {
                let kind = if text.to_lowercase().contains("forecast")
                    || text.to_lowercase().contains("tomorrow")
                {
                    "forecast"
                } else {
                    "current"
                };
                let mut i = Intent::new(Action::WeatherQuery)
                    .domain("weather", kind)
                    .time_sensitive(true)
                    .param(param::TOPIC, topic);
                if let Some(loc) = WEATHER_LOCATION_RE
                    .captures(text)
                    .and_then(|c| c.name("loc"))
                    .map(|l| clean_slot(l.as_str()))
                    .filter(|l| !l.is_empty())
                {
                    i = i.param(param::LOCATION, loc);
                }
                i
            }
            R::MemoryWrite => Intent::new(Action::MemoryWrite)
                .param(param::FACT, m.slot.unwrap_or_default().to_string()),
            R::MemoryRead => Intent::new(Action::MemoryRead),
            R::OpenDomain => {
                let subject = m.slot.map(clean_slot).unwrap_or_else(|| topic.clone());
                let known = ctx.known_topics.contains(&subject.as_str());
                let action = if known && !signal.is_temporal {
                    Action::ReturnKnowledge
                } else {
                    Action::Retrieve
                };
                Intent::new(action)
                    .time_sensitive(signal.is_temporal)
                    .param(param::TOPIC, subject)
            }
        };
        intent.rule(m.label)
    }

    fn role_intent(&self, m: RuleMatch<'_, IntentRule>, topic: String) -> Intent {
        let mut i = Intent::new(Action::Retrieve)
            .time_sensitive(true)
            .param(param::TOPIC, topic);
        if let Some(role) = m.slot {
            i = i.param(param::ROLE, clean_slot(role));
        }
        if let Some(org) = m.org {
            i = i.param(param::ORG, clean_slot(org));
        }
        i
    }

    fn correction(&self, text: &str, ctx: &ClassifyContext<'_>) -> Intent {
        let lower = normalize_key(text);
        let named = ctx
            .known_topics
            .iter()
            .filter(|k| !k.is_empty() && lower.contains(**k))
            .max_by_key(|k| k.len())
            .map(|k| k.to_string());
        let topic = named.or_else(|| last_topic(ctx.recent_turns).map(String::from));

        let mut intent = Intent::new(Action::Correction)
            .param(param::CORRECTION, text)
            .rule("correction");
        if let Some(t) = topic {
            intent = intent.param(param::TOPIC, t);
        }
        intent.feedback = self.feedback.detect(text);
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(NaiveDate::from_ymd_opt(2023, 6, 30).unwrap())
            .with_today(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
    }

    fn classify(text: &str) -> Intent {
        classifier().classify(text, &ClassifyContext::default())
    }

    #[test]
    fn test_current_president_is_temporal_retrieve() {
        let i = classify("who is the current president of the united states");
        assert_eq!(i.action, Action::Retrieve);
        assert!(i.time_sensitive);
        assert_eq!(i.domain.as_deref(), Some("politics"));
        assert_eq!(i.query_type.as_deref(), Some("office_holder"));
        assert_eq!(i.get(param::ROLE), Some("president"));
        assert_eq!(i.get(param::ORG), Some("united states"));
    }

    #[test]
    fn test_bitcoin_price() {
        let i = classify("what is the current price of bitcoin");
        assert_eq!(i.action, Action::PriceQuery);
        assert_eq!(i.get(param::ASSET), Some("bitcoin"));
        assert!(i.time_sensitive);
    }

    #[test]
    fn test_weather_today() {
        let i = classify("what is the weather today");
        assert_eq!(i.action, Action::WeatherQuery);
        assert!(i.time_sensitive);
        let i = classify("What's the weather in San Francisco tomorrow?");
        assert_eq!(i.get(param::LOCATION), Some("san francisco"));
        assert_eq!(i.query_type.as_deref(), Some("forecast"));
    }

    #[test]
    fn test_historical_question_is_conversation() {
        let i = classify("who was the president in 1990");
        assert_eq!(i.action, Action::Converse);
        assert!(!i.time_sensitive);
    }

    #[test]
    fn test_what_is_bitcoin() {
        let i = classify("what is bitcoin");
        assert_eq!(i.action, Action::Retrieve);
        assert!(!i.time_sensitive);
        assert_eq!(i.topic(), Some("bitcoin"));
    }

    #[test]
    fn test_joke_is_conversation() {
        assert_eq!(classify("tell me a joke").action, Action::Converse);
    }

    #[test]
    fn test_identity_beats_everything() {
        let i = classify("What can you do?");
        assert_eq!(i.action, Action::Identity);
        assert_eq!(i.get(param::SLOT), Some("capabilities"));
        assert!(!i.time_sensitive);
    }

    #[test]
    fn test_who_won_without_sports_context_is_open_domain() {
        let i = classify("who won the nobel prize in physics");
        assert_eq!(i.action, Action::Retrieve);
        assert_eq!(i.domain, None);
        assert_eq!(i.query_type, None);
        assert_eq!(i.topic(), Some("nobel prize in physics"));
        assert_eq!(i.rule.as_deref(), Some("who_won"));
    }

    #[test]
    fn test_sports_triggers_always_time_sensitive() {
        let i = classify("who won the giants game");
        assert_eq!(i.action, Action::Retrieve);
        assert_eq!(i.domain.as_deref(), Some("sports"));
        assert_eq!(i.query_type.as_deref(), Some("result"));
        assert!(i.time_sensitive);

        let i = classify("who won the nba finals");
        assert_eq!(i.domain.as_deref(), Some("sports"));

        let i = classify("who is the quarterback for the new york giants");
        assert_eq!(i.query_type.as_deref(), Some("roster"));
        assert_eq!(i.get(param::ORG), Some("new york giants"));
        assert!(i.time_sensitive);
    }

    #[test]
    fn test_news_and_books() {
        assert_eq!(classify("give me the latest news").domain.as_deref(), Some("news"));
        let i = classify("what are the new york times best sellers");
        assert_eq!(i.domain.as_deref(), Some("books"));
        assert!(i.time_sensitive);
    }

    #[test]
    fn test_known_topic_returns_knowledge() {
        let known = ["rust"];
        let ctx = ClassifyContext {
            recent_turns: &[],
            known_topics: &known,
        };
        let i = classifier().classify("What is Rust?", &ctx);
        assert_eq!(i.action, Action::ReturnKnowledge);
        assert_eq!(i.topic(), Some("rust"));
    }

    #[test]
    fn test_memory_triggers() {
        let i = classify("remember that my favorite team is the Giants");
        assert_eq!(i.action, Action::MemoryWrite);
        assert_eq!(i.get(param::FACT), Some("my favorite team is the Giants"));
        assert_eq!(classify("what do you know about me").action, Action::MemoryRead);
        assert_eq!(classify("who am I?").action, Action::MemoryRead);
    }

    #[test]
    fn test_correction_topic_resolution() {
        let known = ["rust", "rust language"];
        let turns = vec![Turn::assistant("Go is ...", Some("go".to_string()))];
        let ctx = ClassifyContext {
            recent_turns: &turns,
            known_topics: &known,
        };
        let c = classifier();

        let i = c.classify("no, the rust language is older than that", &ctx);
        assert_eq!(i.action, Action::Correction);
        assert_eq!(i.topic(), Some("rust language"));

        let i = c.classify("that's wrong", &ctx);
        assert_eq!(i.topic(), Some("go"));
        assert!(i.feedback.is_some());

        let i = c.classify("that's wrong", &ClassifyContext::default());
        assert_eq!(i.action, Action::Correction);
        assert_eq!(i.topic(), None);
    }

    #[test]
    fn test_post_cutoff_fallback_escalates() {
        let i = classify("anything interesting happen today");
        assert_eq!(i.action, Action::Retrieve);
        assert!(i.time_sensitive);
        assert_eq!(i.rule.as_deref(), Some("temporal_escalation"));
    }

    #[test]
    fn test_clean_slot() {
        assert_eq!(clean_slot(" Bitcoin today? "), "bitcoin");
        assert_eq!(clean_slot("the euro right now!"), "euro");
        assert_eq!(clean_slot("snow"), "snow");
    }

    #[test]
    fn test_every_action_reachable() {
        let actions: std::collections::HashSet<Action> = [
            "who are you",
            "who is the mayor of paris",
            "price of gold",
            "weather in oslo",
            "remember my name is Ada",
            "who am i",
            "tell me a joke",
            "that's wrong",
        ]
        .iter()
        .map(|t| classify(t).action)
        .collect();
        assert_eq!(actions.len(), 8);
    }
}
