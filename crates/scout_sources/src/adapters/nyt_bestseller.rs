//! New York Times bestseller lists (open data, PRIMARY). Requires `NYT_API_KEY`.

use crate::error::{FetchError, FetchResult};
use crate::http::HttpClient;
use scout_common::config::ENV_NYT_KEY;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;

pub const NAME: &str = "nyt_bestseller";
const LISTS_URL: &str = "https://api.nytimes.com/svc/books/v3/lists/current";
const TOP_N: usize = 5;

pub const FICTION_LIST: &str = "combined-print-and-e-book-fiction";
pub const NONFICTION_LIST: &str = "combined-print-and-e-book-nonfiction";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Option<ListResults>,
}

#[derive(Debug, Deserialize)]
struct ListResults {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
struct Book {
    #[serde(default)]
    rank: Option<u32>,
    title: String,
    #[serde(default)]
    author: Option<String>,
}

pub struct NytBestsellerAdapter {
    http: HttpClient,
    api_key: Option<String>,
}

impl NytBestsellerAdapter {
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
            .ok_or(FetchError::MissingCredential(ENV_NYT_KEY))?;
        let list = list_for(query);
        let body: serde_json::Value = self
            .http
            .get_json(&format!("{}/{}.json", LISTS_URL, list), &[("api-key", key)])?;
        parse_list(list, body)
    }
}

impl Adapter for NytBestsellerAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::OpenData
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// Nonfiction when asked for, fiction otherwise
pub fn list_for(query: &str) -> &'static str {
    let lower = query.to_lowercase();
    if lower.contains("nonfiction") || lower.contains("non-fiction") || lower.contains("non fiction") {
        NONFICTION_LIST
    } else {
        FICTION_LIST
    }
}

pub fn parse_list(list: &str, body: serde_json::Value) -> FetchResult<EvidenceResult> {
    let response: Response = serde_json::from_value(body)?;
    let Some(results) = response.results.filter(|r| !r.books.is_empty()) else {
        return Ok(EvidenceResult::not_found(NAME));
    };

    let title = results.display_name.as_deref().unwrap_or(list);
    let mut summary = match results.published_date.as_deref() {
        Some(date) => format!("NYT Bestseller List ({}, {}):", title, date),
        None => format!("NYT Bestseller List ({}):", title),
    };
    for (i, book) in results.books.iter().take(TOP_N).enumerate() {
        let rank = book.rank.unwrap_or(i as u32 + 1);
        match book.author.as_deref().filter(|a| !a.is_empty()) {
            Some(author) => summary.push_str(&format!("\n{}. {} by {}", rank, book.title, author)),
            None => summary.push_str(&format!("\n{}. {}", rank, book.title)),
        }
    }
    Ok(EvidenceResult::found(NAME, summary, 0.9)
        .with_url(format!("https://www.nytimes.com/books/best-sellers/{}/", list))
        .with_meta("list", list))
}
