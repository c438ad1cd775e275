//! Shared blocking HTTP client.
//!
//! One hard timeout for every call, no retries: a failed call falls over to
//! the next tier in the orchestrator instead.

use crate::error::{FetchError, FetchResult};
use reqwest::blocking::{Client, Response};
use scout_common::config::SourcesConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(config: &SourcesConfig) -> FetchResult<Self> {
        if config.timeout_was_clamped() {
            warn!(
                configured = config.timeout_secs,
                effective = config.effective_timeout_secs(),
                "sources.timeout_secs out of range, clamped"
            );
        }
        let inner = Client::builder()
            .timeout(Duration::from_secs(config.effective_timeout_secs()))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { inner })
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<T> {
        self.get_json_with_headers(url, query, &[])
    }

    pub fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> FetchResult<T> {
        let body = self.send(url, query, headers)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn get_text(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<String> {
        Ok(self.send(url, query, &[])?.text()?)
    }

    fn send(&self, url: &str, query: &[(&str, &str)], headers: &[(&str, &str)]) -> FetchResult<Response> {
        let mut request = self.inner.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        debug!(url, "GET");
        let response = request.send()?;
        check_status(response.status().as_u16())?;
        Ok(response)
    }
}

/// 2xx passes; 429 is rate limiting; anything else is an HTTP failure
pub fn check_status(status: u16) -> FetchResult<()> {
    match status {
        200..=299 => Ok(()),
        429 => Err(FetchError::RateLimited),
        other => Err(FetchError::Http(other)),
    }
}
