//! Engine: one explicit state object per process.
//!
//! Created at startup from configuration and an adapter registry, it owns the
//! classifier, the orchestrator and every persisted store. Stores persist on
//! each mutation; there is no teardown step.

use crate::cache::QueryCache;
use crate::config::ScoutConfig;
use crate::correction::{apply_correction, CorrectionContext, CorrectionOutcome};
use crate::disputes::DisputeLog;
use crate::error::Result;
use crate::fact_store::{FactMetadata, FactStore};
use crate::identity::IdentitySlot;
use crate::intent::{param, Action, ClassifyContext, Intent, IntentClassifier};
use crate::orchestrator::{Scout, SearchRequest};
use crate::paths::DataPaths;
use crate::policy::{PolicyRules, PolicyStore};
use crate::profile::ProfileStore;
use crate::registry::FetchRegistry;
use crate::rewrite::{hint, LanguageModel, TemplateModel};
use crate::router::DomainRouter;
use crate::types::{normalize_key, Turn, TruthResult};
use crate::unknown_log::UnknownLog;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Conversation turns kept for topic resolution
const MAX_TURNS: usize = 20;

/// What the engine said back, with enough context for tests and the CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub action: Action,
    pub topic: Option<String>,
    pub truth: Option<TruthResult>,
}

impl Reply {
    fn new(action: Action, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action,
            topic: None,
            truth: None,
        }
    }

    fn topic(mut self, topic: Option<String>) -> Self {
        self.topic = topic;
        self
    }

    fn truth(mut self, truth: TruthResult) -> Self {
        self.truth = Some(truth);
        self
    }
}

/// Store counts reported by `scoutctl status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub data_dir: PathBuf,
    pub knowledge_cutoff: NaiveDate,
    pub facts: usize,
    pub cache_entries: usize,
    pub unknowns: usize,
    pub disputes: usize,
    pub policies: usize,
    pub profile_facts: usize,
    pub adapters: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    pub unknowns_pruned: usize,
    pub cache_pruned: usize,
}

pub struct Engine {
    config: ScoutConfig,
    paths: DataPaths,
    cutoff: NaiveDate,
    classifier: IntentClassifier,
    scout: Scout,
    facts: FactStore,
    disputes: DisputeLog,
    policies: PolicyStore,
    profile: ProfileStore,
    model: Box<dyn LanguageModel>,
    turns: Vec<Turn>,
}

impl Engine {
    /// Open every store under `paths` and wire the orchestrator.
    ///
    /// Fails if the knowledge cutoff is invalid or a durable store (facts,
    /// disputes, profile) cannot be read.
    pub fn open(config: ScoutConfig, paths: DataPaths, registry: FetchRegistry) -> Result<Self> {
        let cutoff = config.knowledge_cutoff()?;
        let scout = Scout::new(
            registry,
            DomainRouter::from_config(&config),
            QueryCache::open(&paths.cache(), config.cache.effective_max_entries()),
            UnknownLog::open(&paths.unknowns()),
            config.retrieval.clone(),
        );
        let engine = Self {
            cutoff,
            classifier: IntentClassifier::new(cutoff),
            scout,
            facts: FactStore::open(&paths.facts())?,
            disputes: DisputeLog::open(&paths.disputes())?,
            policies: PolicyStore::open(&paths.policies()),
            profile: ProfileStore::open(&paths.profile())?,
            model: Box::new(TemplateModel::new(&config.core.assistant_name)),
            turns: Vec::new(),
            config,
            paths,
        };
        info!(
            data_dir = %engine.paths.root.display(),
            adapters = engine.scout.registry().len(),
            facts = engine.facts.len(),
            "engine ready"
        );
        Ok(engine)
    }

    pub fn with_model(mut self, model: Box<dyn LanguageModel>) -> Self {
        self.model = model;
        self
    }

    /// Pin the classifier's notion of "today"
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.classifier = self.classifier.with_today(today);
        self
    }

    /// Answer one line of user input.
    ///
    /// Errors only when a durable store cannot be written.
    pub fn handle(&mut self, text: &str) -> Result<Reply> {
        let text = text.trim();
        let intent = {
            let known: Vec<&str> = self.facts.keys().collect();
            let ctx = ClassifyContext {
                recent_turns: &self.turns,
                known_topics: &known,
            };
            self.classifier.classify(text, &ctx)
        };

        let reply = match intent.action {
            Action::Identity => self.identity(&intent),
            Action::PriceQuery => self.price(text, &intent),
            Action::WeatherQuery => self.weather(text, &intent),
            Action::Retrieve => self.retrieve(text, &intent)?,
            Action::ReturnKnowledge => self.return_knowledge(text, &intent),
            Action::MemoryWrite => self.memory_write(&intent)?,
            Action::MemoryRead => self.memory_read(),
            Action::Correction => self.correction(text, &intent)?,
            Action::Converse => Reply::new(Action::Converse, self.model.generate(text)),
        };

        self.push_turn(Turn::user(text));
        self.push_turn(Turn::assistant(&reply.text, reply.topic.clone()));
        Ok(reply)
    }

    fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        if self.turns.len() > MAX_TURNS {
            let excess = self.turns.len() - MAX_TURNS;
            self.turns.drain(..excess);
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn identity(&self, intent: &Intent) -> Reply {
        let slot = intent
            .get(param::SLOT)
            .and_then(IdentitySlot::from_str_opt)
            .unwrap_or(IdentitySlot::WhoAreYou);
        Reply::new(Action::Identity, slot.answer(&self.config.core.assistant_name))
    }

    fn price(&mut self, text: &str, intent: &Intent) -> Reply {
        let Some(asset) = intent.get(param::ASSET).filter(|a| !a.is_empty()) else {
            return Reply::new(Action::PriceQuery, "Which asset do you want a price for?");
        };
        let asset = asset.to_string();
        self.live_lookup(Action::PriceQuery, text, &asset, intent, hint::PRICE)
    }

    fn weather(&mut self, text: &str, intent: &Intent) -> Reply {
        let Some(location) = intent.get(param::LOCATION).filter(|l| !l.is_empty()) else {
            return Reply::new(
                Action::WeatherQuery,
                "Which place do you want the weather for? Try \"weather in Lisbon\".",
            );
        };
        let location = location.to_string();
        self.live_lookup(Action::WeatherQuery, text, &location, intent, hint::VERBATIM)
    }

    /// Price and weather: always fresh, routed by domain
    fn live_lookup(&mut self, action: Action, text: &str, subject: &str, intent: &Intent, style: &str) -> Reply {
        let policy = self.policies.find_for(&normalize_key(subject));
        let truth = self.scout.search(
            &SearchRequest::new(subject)
                .ignore_cache(true)
                .with_policy(policy.as_ref())
                .with_domain(intent.domain.as_deref())
                .with_query_type(intent.query_type.as_deref()),
        );
        let topic = Some(normalize_key(subject));
        self.answer_from_truth(action, text, truth, style).topic(topic)
    }

    fn retrieve(&mut self, text: &str, intent: &Intent) -> Result<Reply> {
        let topic = intent
            .topic()
            .filter(|t| !t.is_empty())
            .map(String::from)
            .unwrap_or_else(|| normalize_key(text));
        let open_domain = intent.domain.is_none() && !intent.time_sensitive;
        let query = if open_domain { topic.as_str() } else { text };

        let policy = self.policies.find_for(&normalize_key(query));
        let truth = self.scout.search(
            &SearchRequest::new(query)
                .ignore_cache(intent.time_sensitive)
                .with_policy(policy.as_ref())
                .with_domain(intent.domain.as_deref())
                .with_query_type(intent.query_type.as_deref()),
        );

        if open_domain && truth.is_found() && !truth.primary_source_kind.is_live_data() {
            self.facts.put(
                &topic,
                &truth.canonical_summary,
                FactMetadata {
                    source: truth.source_name.clone(),
                    confidence: truth.confidence,
                    url: truth.url.clone(),
                    corrected: false,
                },
            )?;
            debug!(topic = %topic, "fact stored");
        }
        let style = if open_domain { hint::EXPLAIN } else { hint::VERBATIM };
        Ok(self
            .answer_from_truth(Action::Retrieve, text, truth, style)
            .topic(Some(topic)))
    }

    fn answer_from_truth(&self, action: Action, question: &str, truth: TruthResult, style: &str) -> Reply {
        let text = if truth.is_found() {
            self.model
                .rewrite(question, &truth.canonical_summary, &truth.source_name, Some(style))
        } else {
            truth.canonical_summary.clone()
        };
        Reply::new(action, text).truth(truth)
    }

    fn return_knowledge(&self, text: &str, intent: &Intent) -> Reply {
        let topic = intent.topic().map(String::from).unwrap_or_else(|| normalize_key(text));
        let Some(fact) = self.facts.get(&topic) else {
            return Reply::new(
                Action::ReturnKnowledge,
                format!("I could not find reliable information about '{}' yet.", topic),
            )
            .topic(Some(topic));
        };
        let mut answer = self
            .model
            .rewrite(text, &fact.summary, &fact.metadata.source, Some(hint::EXPLAIN));
        let related = self.facts.related(&topic, &fact.summary);
        if !related.is_empty() {
            answer.push_str(&format!("\n\nYou might also ask about: {}.", related.join(", ")));
        }
        Reply::new(Action::ReturnKnowledge, answer).topic(Some(topic))
    }

    fn memory_write(&mut self, intent: &Intent) -> Result<Reply> {
        let fact = intent.get(param::FACT).unwrap_or_default().trim();
        if fact.is_empty() {
            return Ok(Reply::new(Action::MemoryWrite, "What should I remember?"));
        }
        let fact = fact.to_string();
        let text = if self.profile.remember(&fact)? {
            format!("Got it. I'll remember that {}.", fact.trim_end_matches(['.', '!']))
        } else {
            "I already knew that.".to_string()
        };
        Ok(Reply::new(Action::MemoryWrite, text))
    }

    fn memory_read(&self) -> Reply {
        if self.profile.is_empty() {
            return Reply::new(
                Action::MemoryRead,
                "I don't know anything about you yet. Tell me with \"remember ...\".",
            );
        }
        let lines: Vec<String> = self
            .profile
            .facts()
            .iter()
            .map(|f| format!("- {}", f.text))
            .collect();
        Reply::new(
            Action::MemoryRead,
            format!("Here is what you told me:\n{}", lines.join("\n")),
        )
    }

    fn correction(&mut self, text: &str, intent: &Intent) -> Result<Reply> {
        let topic = intent.topic().map(String::from);

        if let (Some(topic), Some(feedback)) = (topic.as_deref(), intent.feedback.as_ref()) {
            let rules = PolicyRules {
                require_numeric: feedback.wants_numeric,
                preferred_sources: feedback.preferred_sources.clone(),
            };
            self.policies.teach(topic, rules);
        }
        let policy = topic
            .as_deref()
            .and_then(|t| self.policies.find_for(&normalize_key(t)));

        let correction_text = intent.get(param::CORRECTION).unwrap_or(text);
        let mut ctx = CorrectionContext {
            scout: &mut self.scout,
            facts: &mut self.facts,
            disputes: &mut self.disputes,
        };
        let outcome = apply_correction(&mut ctx, topic.as_deref(), correction_text, policy.as_ref())?;

        let reply = match outcome {
            CorrectionOutcome::NoTopic => Reply::new(
                Action::Correction,
                "I'm not sure which topic you're correcting. Could you name it?",
            ),
            CorrectionOutcome::Resolved { topic, truth, .. } => {
                let text = format!(
                    "Thanks, I re-checked '{}'. {} (source: {})",
                    topic, truth.canonical_summary, truth.source_name
                );
                Reply::new(Action::Correction, text)
                    .topic(Some(topic))
                    .truth(truth)
            }
            CorrectionOutcome::Unresolved { topic, .. } => {
                let mut text = format!(
                    "I logged your correction about '{}', but I couldn't find independent evidence yet.",
                    topic
                );
                if let Some(value) = intent.feedback.as_ref().and_then(|f| f.corrected_value.as_deref()) {
                    text.push_str(&format!(" I noted that you said: {}.", value));
                }
                Reply::new(Action::Correction, text).topic(Some(topic))
            }
        };
        Ok(reply)
    }

    // ========================================================================
    // Status and maintenance
    // ========================================================================

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            data_dir: self.paths.root.clone(),
            knowledge_cutoff: self.cutoff,
            facts: self.facts.len(),
            cache_entries: self.scout.cache().len(),
            unknowns: self.scout.unknowns().len(),
            disputes: self.disputes.len(),
            policies: self.policies.len(),
            profile_facts: self.profile.len(),
            adapters: self
                .scout
                .registry()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Drop unknown-query entries and negative cache entries older than `days`
    pub fn maintenance(&mut self, days: i64) -> Result<MaintenanceReport> {
        let now = Utc::now();
        let unknowns_pruned = self.scout.unknowns_mut().prune_older_than(days, now)?;
        let cache_pruned = self.scout.cache_mut().prune_negative_older_than(days, now);
        info!(days, unknowns_pruned, cache_pruned, "maintenance done");
        Ok(MaintenanceReport {
            unknowns_pruned,
            cache_pruned,
        })
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn scout(&self) -> &Scout {
        &self.scout
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn disputes(&self) -> &DisputeLog {
        &self.disputes
    }

    pub fn policies(&self) -> &PolicyStore {
        &self.policies
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
