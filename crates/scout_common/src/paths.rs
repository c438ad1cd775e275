//! Data directory resolution and store file names.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "SCOUT_DATA_DIR";

pub const CACHE_FILE: &str = "cache.json";
pub const UNKNOWNS_FILE: &str = "unknowns.json";
pub const FACTS_FILE: &str = "facts.json";
pub const DISPUTES_FILE: &str = "disputes.json";
pub const POLICIES_FILE: &str = "policies.json";
pub const PROFILE_FILE: &str = "profile.json";
/// Default local corpus location when `[sources] corpus_dir` is unset
pub const CORPUS_DIR: &str = "corpus";

/// Resolve the data directory.
///
/// Precedence: explicit flag, `SCOUT_DATA_DIR`, `[core] data_dir`,
/// `$XDG_DATA_HOME/scout`, then `./data`.
pub fn resolve_data_dir(
    flag: Option<&Path>,
    env_value: Option<String>,
    configured: Option<&Path>,
) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    if let Some(v) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(v.trim());
    }
    if let Some(p) = configured {
        return p.to_path_buf();
    }
    dirs::data_dir()
        .map(|d| d.join("scout"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Locations of every persisted store under one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn cache(&self) -> PathBuf {
        self.root.join(CACHE_FILE)
    }

    pub fn unknowns(&self) -> PathBuf {
        self.root.join(UNKNOWNS_FILE)
    }

    pub fn facts(&self) -> PathBuf {
        self.root.join(FACTS_FILE)
    }

    pub fn disputes(&self) -> PathBuf {
        self.root.join(DISPUTES_FILE)
    }

    pub fn policies(&self) -> PathBuf {
        self.root.join(POLICIES_FILE)
    }

    pub fn profile(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    pub fn corpus(&self) -> PathBuf {
        self.root.join(CORPUS_DIR)
    }
}
