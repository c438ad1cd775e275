//! Error types for Scout.
//!
//! Business-logic outcomes (nothing found, adapter failure) are never errors;
//! they travel as `EvidenceStatus` / `TruthStatus`. What remains here is local
//! storage and configuration trouble.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Storage error at {path}: {reason}")]
    Storage { path: PathBuf, reason: String },

    #[error("Store '{store}' has schema version {found}, newest supported is {supported}")]
    SchemaVersion {
        store: &'static str,
        found: u32,
        supported: u32,
    },
}

impl ScoutError {
    pub fn storage(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScoutError::Storage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short stable code used in log lines and the status command
    pub fn code(&self) -> &'static str {
        match self {
            ScoutError::Io(_) => "io",
            ScoutError::Json(_) => "json",
            ScoutError::ConfigParse(_) => "config_parse",
            ScoutError::InvalidConfig(_) => "invalid_config",
            ScoutError::Storage { .. } => "storage",
            ScoutError::SchemaVersion { .. } => "schema_version",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
