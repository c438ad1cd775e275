//! Scout Configuration
//!
//! TOML configuration, by default at `$XDG_CONFIG_HOME/scout/config.toml`.
//! A missing file means defaults; every field carries a serde default so a
//! partial file is always valid.
//!
//! v0.2.0: Added [retrieval] floors and social gate settings
//! v0.3.0: Added [domains] tier tables with a built-in fallback
//! v0.4.0: Added [cache] max_entries bound

use crate::error::{Result, ScoutError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "scout";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding `[temporal] knowledge_cutoff`
pub const ENV_KNOWLEDGE_CUTOFF: &str = "KNOWLEDGE_CUTOFF_DATE";
pub const ENV_NEWSAPI_KEY: &str = "NEWSAPI_KEY";
pub const ENV_NYT_KEY: &str = "NYT_API_KEY";

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Data directory for persisted stores (None = platform default)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Name the assistant uses for itself
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
}

fn default_assistant_name() -> String {
    "Scout".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            assistant_name: default_assistant_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalConfig {
    /// Last date the built-in knowledge is trusted for (YYYY-MM-DD)
    #[serde(default = "default_knowledge_cutoff")]
    pub knowledge_cutoff: String,
}

fn default_knowledge_cutoff() -> String {
    "2023-06-30".to_string()
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            knowledge_cutoff: default_knowledge_cutoff(),
        }
    }
}

impl TemporalConfig {
    pub fn cutoff_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.knowledge_cutoff.trim(), "%Y-%m-%d").map_err(|e| {
            ScoutError::InvalidConfig(format!(
                "knowledge_cutoff '{}' is not YYYY-MM-DD: {}",
                self.knowledge_cutoff, e
            ))
        })
    }
}

/// Arbitration thresholds used by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Keyword-routed adapters consulted per generic search (valid: 1-10)
    #[serde(default = "default_max_fetchers")]
    pub max_fetchers: usize,

    /// Confidence floor for second-tier fast-path results
    #[serde(default = "default_secondary_floor")]
    pub secondary_floor: f64,

    /// Confidence floor for third-tier fast-path results
    #[serde(default = "default_tertiary_floor")]
    pub tertiary_floor: f64,

    /// Confidence floor for community results
    #[serde(default = "default_social_floor")]
    pub social_floor: f64,

    /// Significant query keywords a community summary must contain
    #[serde(default = "default_social_keyword_hits")]
    pub social_keyword_hits: usize,

    /// Bonus added to sources a policy prefers
    #[serde(default = "default_preferred_source_bonus")]
    pub preferred_source_bonus: f64,
}

fn default_max_fetchers() -> usize {
    3
}

fn default_secondary_floor() -> f64 {
    0.6
}

fn default_tertiary_floor() -> f64 {
    0.5
}

fn default_social_floor() -> f64 {
    0.7
}

fn default_social_keyword_hits() -> usize {
    2
}

fn default_preferred_source_bonus() -> f64 {
    0.1
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_fetchers: default_max_fetchers(),
            secondary_floor: default_secondary_floor(),
            tertiary_floor: default_tertiary_floor(),
            social_floor: default_social_floor(),
            social_keyword_hits: default_social_keyword_hits(),
            preferred_source_bonus: default_preferred_source_bonus(),
        }
    }
}

impl RetrievalConfig {
    pub fn effective_max_fetchers(&self) -> usize {
        self.max_fetchers.clamp(1, 10)
    }

    pub fn effective_secondary_floor(&self) -> f64 {
        clamp_unit(self.secondary_floor)
    }

    pub fn effective_tertiary_floor(&self) -> f64 {
        clamp_unit(self.tertiary_floor)
    }

    pub fn effective_social_floor(&self) -> f64 {
        clamp_unit(self.social_floor)
    }

    pub fn effective_preferred_source_bonus(&self) -> f64 {
        clamp_unit(self.preferred_source_bonus)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cached query results (valid: 10-1000000)
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

fn default_cache_max_entries() -> usize {
    5000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn effective_max_entries(&self) -> usize {
        self.max_entries.clamp(10, 1_000_000)
    }
}

/// Network settings shared by every adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Hard timeout per adapter call (seconds, valid: 1-30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory of plain-text documents searched by the local corpus adapter
    #[serde(default)]
    pub corpus_dir: Option<PathBuf>,

    #[serde(default)]
    pub newsapi_key: Option<String>,

    #[serde(default)]
    pub nyt_key: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("scout/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            corpus_dir: None,
            newsapi_key: None,
            nyt_key: None,
        }
    }
}

impl SourcesConfig {
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.clamp(1, 30)
    }

    pub fn timeout_was_clamped(&self) -> bool {
        self.timeout_secs != self.effective_timeout_secs()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive used when neither flag nor RUST_LOG is set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Ordered adapter names for one domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTiersConfig {
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default)]
    pub tertiary: Vec<String>,
}

impl DomainTiersConfig {
    fn of(primary: &[&str], secondary: &[&str], tertiary: &[&str]) -> Self {
        let own = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            primary: own(primary),
            secondary: own(secondary),
            tertiary: own(tertiary),
        }
    }
}

/// Tier table used when the config file has no `[domains]` section
pub fn builtin_domains() -> BTreeMap<String, DomainTiersConfig> {
    let mut m = BTreeMap::new();
    m.insert(
        "sports".to_string(),
        DomainTiersConfig::of(
            &["thesportsdb"],
            &["wikidata", "wikipedia"],
            &["newsapi", "news_rss", "reddit"],
        ),
    );
    m.insert(
        "news".to_string(),
        DomainTiersConfig::of(&["newsapi", "news_rss"], &["wikipedia"], &["reddit"]),
    );
    m.insert(
        "finance".to_string(),
        DomainTiersConfig::of(&["coingecko"], &["wikidata"], &["news_rss"]),
    );
    m.insert(
        "weather".to_string(),
        DomainTiersConfig::of(&["open_meteo"], &[], &[]),
    );
    m.insert(
        "books".to_string(),
        DomainTiersConfig::of(&["nyt_bestseller"], &["wikipedia"], &["news_rss"]),
    );
    m.insert(
        "politics".to_string(),
        DomainTiersConfig::of(&["wikidata"], &["wikipedia"], &["newsapi", "news_rss"]),
    );
    m.insert(
        "science".to_string(),
        DomainTiersConfig::of(&["wikidata"], &["wikipedia", "local_corpus"], &[]),
    );
    m
}

// ============================================================================
// Root config
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub temporal: TemporalConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Per-domain tier lists; empty means the built-in table
    #[serde(default)]
    pub domains: BTreeMap<String, DomainTiersConfig>,
}

impl ScoutConfig {
    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: ScoutConfig = toml::from_str(&content)?;
        config.temporal.cutoff_date()?;
        Ok(config)
    }

    /// Load from the default location, then apply environment overrides
    pub fn load_default() -> Result<Self> {
        let config = match default_config_path() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|k| std::env::var(k).ok()))
    }

    /// Apply environment overrides; `lookup` is injectable for tests
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(cutoff) = non_empty(ENV_KNOWLEDGE_CUTOFF) {
            if NaiveDate::parse_from_str(cutoff.trim(), "%Y-%m-%d").is_ok() {
                self.temporal.knowledge_cutoff = cutoff.trim().to_string();
            } else {
                tracing::warn!(value = %cutoff, "ignoring malformed {}", ENV_KNOWLEDGE_CUTOFF);
            }
        }
        if let Some(key) = non_empty(ENV_NEWSAPI_KEY) {
            self.sources.newsapi_key = Some(key);
        }
        if let Some(key) = non_empty(ENV_NYT_KEY) {
            self.sources.nyt_key = Some(key);
        }
        self
    }

    /// Configured domain table, or the built-in one when none is configured
    pub fn domain_table(&self) -> BTreeMap<String, DomainTiersConfig> {
        if self.domains.is_empty() {
            builtin_domains()
        } else {
            self.domains.clone()
        }
    }

    pub fn knowledge_cutoff(&self) -> Result<NaiveDate> {
        self.temporal.cutoff_date()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScoutError::InvalidConfig(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/scout/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::default();
        assert_eq!(config.core.assistant_name, "Scout");
        assert_eq!(config.retrieval.max_fetchers, 3);
        assert_eq!(config.retrieval.social_keyword_hits, 2);
        assert_eq!(config.cache.max_entries, 5000);
        assert_eq!(config.sources.timeout_secs, 10);
        assert_eq!(
            config.knowledge_cutoff().unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = ScoutConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[retrieval]\nmax_fetchers = 5\n\n[sources]\ntimeout_secs = 90\n",
        )
        .unwrap();
        let config = ScoutConfig::load(&path).unwrap();
        assert_eq!(config.retrieval.max_fetchers, 5);
        assert_eq!(config.retrieval.secondary_floor, 0.6);
        assert_eq!(config.sources.effective_timeout_secs(), 30);
        assert!(config.sources.timeout_was_clamped());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[retrieval\nmax_fetchers = ").unwrap();
        let err = ScoutConfig::load(&path).unwrap_err();
        assert_eq!(err.code(), "config_parse");
    }

    #[test]
    fn test_bad_cutoff_is_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[temporal]\nknowledge_cutoff = \"June 2023\"\n").unwrap();
        let err = ScoutConfig::load(&path).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    fn test_env_overrides() {
        let config = ScoutConfig::default().with_env_overrides(|k| match k {
            ENV_KNOWLEDGE_CUTOFF => Some("2024-01-15".to_string()),
            ENV_NEWSAPI_KEY => Some("abc".to_string()),
            ENV_NYT_KEY => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.temporal.knowledge_cutoff, "2024-01-15");
        assert_eq!(config.sources.newsapi_key.as_deref(), Some("abc"));
        assert_eq!(config.sources.nyt_key, None);
    }

    #[test]
    fn test_malformed_env_cutoff_ignored() {
        let config = ScoutConfig::default()
            .with_env_overrides(|k| (k == ENV_KNOWLEDGE_CUTOFF).then(|| "soon".to_string()));
        assert_eq!(config.temporal.knowledge_cutoff, "2023-06-30");
    }

    #[test]
    fn test_domain_table_fallback_and_override() {
        let config = ScoutConfig::default();
        let table = config.domain_table();
        assert_eq!(table["sports"].primary, vec!["thesportsdb"]);
        assert!(table.contains_key("weather"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[domains.sports]\nprimary = [\"espn\"]\n").unwrap();
        let config = ScoutConfig::load(&path).unwrap();
        let table = config.domain_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table["sports"].primary, vec!["espn"]);
        assert!(table["sports"].tertiary.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ScoutConfig::default();
        config.core.assistant_name = "Atlas".to_string();
        config.save(&path).unwrap();
        let back = ScoutConfig::load(&path).unwrap();
        assert_eq!(back.core.assistant_name, "Atlas");
    }
}
