//! Core of the Scout research assistant.
//!
//! Intent classification, tiered evidence retrieval with arbitration, the
//! fact store and the correction loop. Concrete network adapters live in
//! `scout_sources`; the command line in `scoutctl`.
//!
//! v0.3.0: Versioned stores with advisory locking and atomic rename.
//! v0.4.0: Rule tables for intents and feedback; learned search policies.

pub mod cache;
pub mod config;
pub mod correction;
pub mod disputes;
pub mod engine;
pub mod error;
pub mod fact_store;
pub mod feedback;
pub mod identity;
pub mod intent;
pub mod orchestrator;
pub mod paths;
pub mod policy;
pub mod profile;
pub mod registry;
pub mod rewrite;
pub mod router;
pub mod rules;
pub mod semantic;
pub mod store;
pub mod temporal;
pub mod types;
pub mod unknown_log;

pub use config::ScoutConfig;
pub use engine::{Engine, EngineStatus, MaintenanceReport, Reply};
pub use error::{Result, ScoutError};
pub use intent::{Action, Intent, IntentClassifier};
pub use orchestrator::{Scout, SearchRequest};
pub use paths::DataPaths;
pub use registry::{Adapter, FetchRegistry};
pub use types::{
    EvidenceResult, EvidenceStatus, SourceKind, SourceTier, TruthResult, TruthStatus,
};

/// Crate version, shared by every workspace member
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
