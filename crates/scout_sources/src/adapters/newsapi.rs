//! NewsAPI article search (news, TERTIARY). Requires `NEWSAPI_KEY`.

use crate::error::{FetchError, FetchResult};
use crate::http::HttpClient;
use crate::text::{content_terms, truncate};
use scout_common::config::ENV_NEWSAPI_KEY;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;

pub const NAME: &str = "newsapi";
const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";
const TOP_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";

#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

pub struct NewsApiAdapter {
    http: HttpClient,
    api_key: Option<String>,
}

impl NewsApiAdapter {
    pub fn new(http: HttpClient, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingCredential(ENV_NEWSAPI_KEY))?;
        let terms: Vec<String> = content_terms(query)
            .into_iter()
            .filter(|t| !matches!(t.as_str(), "news" | "headlines" | "headline" | "breaking"))
            .collect();

        let body: serde_json::Value = if terms.is_empty() {
            self.http.get_json_with_headers(
                TOP_HEADLINES_URL,
                &[("country", "us"), ("pageSize", "5")],
                &[("X-Api-Key", key)],
            )?
        } else {
            let q = terms.join(" ");
            self.http.get_json_with_headers(
                EVERYTHING_URL,
                &[
                    ("q", q.as_str()),
                    ("language", "en"),
                    ("sortBy", "publishedAt"),
                    ("pageSize", "5"),
                ],
                &[("X-Api-Key", key)],
            )?
        };
        parse_articles(body)
    }
}

impl Adapter for NewsApiAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::NewsRss
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

pub fn parse_articles(body: serde_json::Value) -> FetchResult<EvidenceResult> {
    let response: Response = serde_json::from_value(body)?;
    if response.status != "ok" {
        return Err(FetchError::Parse(
            response.message.unwrap_or_else(|| format!("status {}", response.status)),
        ));
    }
    let Some(article) = response
        .articles
        .into_iter()
        .find(|a| a.title.as_deref().is_some_and(|t| !t.trim().is_empty() && t != "[Removed]"))
    else {
        return Ok(EvidenceResult::not_found(NAME));
    };

    let title = article.title.unwrap_or_default();
    let outlet = article
        .source
        .and_then(|s| s.name)
        .unwrap_or_else(|| "NewsAPI".to_string());
    let summary = match article.description.filter(|d| !d.trim().is_empty()) {
        Some(d) => format!("{} ({}): {}", title.trim(), outlet, truncate(&d, 300)),
        None => format!("{} ({})", title.trim(), outlet),
    };
    let mut ev = EvidenceResult::found(NAME, summary, 0.7).with_meta("outlet", outlet);
    if let Some(url) = article.url {
        ev = ev.with_url(url);
    }
    Ok(ev)
}
