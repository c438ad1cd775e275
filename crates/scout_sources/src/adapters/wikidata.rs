//! Wikidata entity search (structured, PRIMARY).

use crate::error::FetchResult;
use crate::http::HttpClient;
use crate::text::subject_of;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;

pub const NAME: &str = "wikidata";
const API_URL: &str = "https://www.wikidata.org/w/api.php";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    concepturi: Option<String>,
}

pub struct WikidataAdapter {
    http: HttpClient,
}

impl WikidataAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let subject = subject_of(query);
        if subject.is_empty() {
            return Ok(EvidenceResult::not_found(NAME));
        }
        let body: serde_json::Value = self.http.get_json(
            API_URL,
            &[
                ("action", "wbsearchentities"),
                ("search", subject.as_str()),
                ("language", "en"),
                ("format", "json"),
                ("limit", "1"),
            ],
        )?;
        parse_search(&subject, body)
    }
}

impl Adapter for WikidataAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Wikidata
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// First described entity; an exact label match scores higher
pub fn parse_search(subject: &str, body: serde_json::Value) -> FetchResult<EvidenceResult> {
    let response: SearchResponse = serde_json::from_value(body)?;
    let Some(entity) = response
        .search
        .into_iter()
        .find(|e| e.description.as_deref().is_some_and(|d| !d.trim().is_empty()))
    else {
        return Ok(EvidenceResult::not_found(NAME));
    };

    let label = entity.label.clone().unwrap_or_else(|| entity.id.clone());
    let description = entity.description.unwrap_or_default();
    let confidence = if label.eq_ignore_ascii_case(subject.trim()) { 0.85 } else { 0.8 };
    let url = entity
        .concepturi
        .unwrap_or_else(|| format!("https://www.wikidata.org/wiki/{}", entity.id));

    Ok(EvidenceResult::found(NAME, format!("{}: {}", label, description.trim()), confidence)
        .with_url(url)
        .with_meta("entity_id", entity.id))
}
