//! Adapter-internal failures. Nothing here crosses the adapter boundary:
//! every variant becomes an `EvidenceResult` with confidence 0.

use scout_common::EvidenceResult;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited by upstream")]
    RateLimited,

    #[error("HTTP {0}")]
    Http(u16),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("{0} is not configured")]
    MissingCredential(&'static str),
}

impl FetchError {
    /// Convert into the uniform adapter result for `source`
    pub fn into_evidence(self, source: &str) -> EvidenceResult {
        debug!(adapter = source, error = %self, "adapter call failed");
        match self {
            FetchError::RateLimited => EvidenceResult::rate_limited(source),
            FetchError::MissingCredential(key) => EvidenceResult::needs_credential(source, key),
            FetchError::Http(404) => EvidenceResult::not_found(source),
            other => EvidenceResult::error(source, other.to_string()),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

impl From<quick_xml::Error> for FetchError {
    fn from(e: quick_xml::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
