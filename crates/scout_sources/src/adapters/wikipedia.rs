//! Wikipedia search + intro extract (encyclopedic, SECONDARY).

use crate::error::FetchResult;
use crate::http::HttpClient;
use crate::text::{subject_of, truncate};
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const NAME: &str = "wikipedia";
const API_URL: &str = "https://en.wikipedia.org/w/api.php";
const MAX_SUMMARY: usize = 600;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    extract: Option<String>,
}

pub struct WikipediaAdapter {
    http: HttpClient,
}

impl WikipediaAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let subject = subject_of(query);
        if subject.is_empty() {
            return Ok(EvidenceResult::not_found(NAME));
        }
        let search: serde_json::Value = self.http.get_json(
            API_URL,
            &[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", subject.as_str()),
                ("srlimit", "1"),
                ("format", "json"),
            ],
        )?;
        let Some(title) = parse_title(search)? else {
            return Ok(EvidenceResult::not_found(NAME));
        };
        let extract: serde_json::Value = self.http.get_json(
            API_URL,
            &[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("titles", title.as_str()),
                ("format", "json"),
            ],
        )?;
        let Some(text) = parse_extract(extract)? else {
            return Ok(EvidenceResult::not_found(NAME));
        };
        Ok(evidence(&subject, &title, &text))
    }
}

impl Adapter for WikipediaAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Wikipedia
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

pub fn parse_title(body: serde_json::Value) -> FetchResult<Option<String>> {
    let response: SearchResponse = serde_json::from_value(body)?;
    Ok(response
        .query
        .and_then(|q| q.search.into_iter().next())
        .map(|hit| hit.title))
}

pub fn parse_extract(body: serde_json::Value) -> FetchResult<Option<String>> {
    let response: ExtractResponse = serde_json::from_value(body)?;
    Ok(response
        .query
        .and_then(|q| q.pages.into_values().next())
        .and_then(|p| p.extract)
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty()))
}

/// Base 0.75, -0.1 for a stub extract, +0.05 when the subject is in the title;
/// clamped to [0.5, 0.9]
pub fn evidence(subject: &str, title: &str, extract: &str) -> EvidenceResult {
    let mut confidence: f64 = 0.75;
    if extract.chars().count() < 200 {
        confidence -= 0.1;
    }
    if title.to_lowercase().contains(&subject.to_lowercase()) {
        confidence += 0.05;
    }
    let confidence = confidence.clamp(0.5, 0.9);
    let url = format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_"));
    EvidenceResult::found(NAME, truncate(extract, MAX_SUMMARY), confidence)
        .with_url(url)
        .with_meta("title", title)
}
