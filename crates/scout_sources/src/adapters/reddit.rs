//! Reddit search (community, TERTIARY). Results only count after the
//! orchestrator's relevance gate.

use crate::error::FetchResult;
use crate::http::HttpClient;
use crate::text::content_terms;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;

pub const NAME: &str = "reddit";
const SEARCH_URL: &str = "https://www.reddit.com/search.json";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    over_18: bool,
}

pub struct RedditAdapter {
    http: HttpClient,
}

impl RedditAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let q = content_terms(query).join(" ");
        if q.is_empty() {
            return Ok(EvidenceResult::not_found(NAME));
        }
        let body: serde_json::Value = self.http.get_json(
            SEARCH_URL,
            &[("q", q.as_str()), ("sort", "relevance"), ("limit", "5")],
        )?;
        parse_listing(body)
    }
}

impl Adapter for RedditAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Community
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// Top safe-for-work post, summarized with its engagement
pub fn parse_listing(body: serde_json::Value) -> FetchResult<EvidenceResult> {
    let listing: Listing = serde_json::from_value(body)?;
    let Some(post) = listing
        .data
        .children
        .into_iter()
        .map(|c| c.data)
        .find(|p| !p.over_18)
    else {
        return Ok(EvidenceResult::not_found(NAME));
    };
    let summary = format!(
        "r/{}: {} ({} upvotes, {} comments)",
        post.subreddit, post.title, post.score, post.num_comments
    );
    let mut ev = EvidenceResult::found(NAME, summary, 0.75).with_meta("subreddit", post.subreddit);
    if !post.permalink.is_empty() {
        ev = ev.with_url(format!("https://www.reddit.com{}", post.permalink));
    }
    Ok(ev)
}
