//! tracing-subscriber setup.
//!
//! Logs go to stderr so stdout carries only the conversation.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Used when no flag, `RUST_LOG` or config level is set
pub const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter directive: flag, then `RUST_LOG`, then config, then `warn`
pub fn filter_directive(flag: Option<&str>, rust_log: Option<String>, configured: &str) -> String {
    let non_empty = |s: &str| !s.trim().is_empty();
    if let Some(f) = flag.filter(|f| non_empty(f)) {
        return f.trim().to_string();
    }
    if let Some(env) = rust_log.filter(|e| non_empty(e)) {
        return env.trim().to_string();
    }
    if non_empty(configured) {
        return configured.trim().to_string();
    }
    DEFAULT_LEVEL.to_string()
}

pub fn init_logging(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter '{}'", directive))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
