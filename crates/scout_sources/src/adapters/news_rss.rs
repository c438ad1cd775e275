//! Curated RSS headline feeds (news, TERTIARY).
//!
//! Items are scored against the query's content words: a title hit counts 1,
//! a description hit 0.5. Generic "latest news" requests take the first
//! headlines of the first feed that answers.

use crate::error::{FetchError, FetchResult};
use crate::http::HttpClient;
use crate::text::{content_terms, strip_tags, truncate};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use tracing::debug;

pub const NAME: &str = "news_rss";

pub const DEFAULT_FEEDS: &[&str] = &[
    "https://feeds.bbci.co.uk/news/world/rss.xml",
    "https://feeds.npr.org/1001/rss.xml",
    "https://news.ycombinator.com/rss",
];

/// Items considered per feed
const ITEMS_PER_FEED: usize = 15;
const HEADLINES: usize = 5;

/// Words that make a query a plain headlines request
const HEADLINE_WORDS: &[&str] = &[
    "news", "headline", "headlines", "breaking", "world", "happening", "going", "top", "give",
    "show", "whats", "what", "s",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
}

pub struct NewsRssAdapter {
    http: HttpClient,
    feeds: Vec<String>,
}

impl NewsRssAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self::with_feeds(http, DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_feeds(http: HttpClient, feeds: Vec<String>) -> Self {
        Self { http, feeds }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let terms: Vec<String> = content_terms(query)
            .into_iter()
            .filter(|t| !HEADLINE_WORDS.contains(&t.as_str()))
            .collect();

        let mut items = Vec::new();
        let mut last_error = None;
        for feed in &self.feeds {
            match self.http.get_text(feed, &[]).and_then(|xml| parse_feed(&xml)) {
                Ok(mut parsed) => {
                    parsed.truncate(ITEMS_PER_FEED);
                    if terms.is_empty() && !parsed.is_empty() {
                        return Ok(headlines(&parsed));
                    }
                    items.extend(parsed);
                }
                Err(e) => {
                    debug!(feed = %feed, error = %e, "feed unavailable");
                    last_error = Some(e);
                }
            }
        }
        if items.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }
        Ok(best_match(&items, &terms))
    }
}

impl Adapter for NewsRssAdapter {
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

#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    Title,
    Description,
    Link,
}

/// Items of an RSS 2.0 channel
pub fn parse_feed(xml: &str) -> FetchResult<Vec<FeedItem>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut field = Field::None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" | b"entry" => current = Some(FeedItem::default()),
                b"title" => field = Field::Title,
                b"description" | b"summary" => field = Field::Description,
                b"link" => field = Field::Link,
                _ => {}
            },
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| FetchError::Parse(e.to_string()))?
                    .into_owned();
                push_text(current.as_mut(), field, &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                push_text(current.as_mut(), field, &text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"item" | b"entry" => {
                    if let Some(item) = current.take().filter(|i| !i.title.trim().is_empty()) {
                        items.push(item);
                    }
                    field = Field::None;
                }
                b"title" | b"description" | b"summary" | b"link" => field = Field::None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(items)
}

fn push_text(item: Option<&mut FeedItem>, field: Field, text: &str) {
    let Some(item) = item else { return };
    let target = match field {
        Field::Title => &mut item.title,
        Field::Description => &mut item.description,
        Field::Link => &mut item.link,
        Field::None => return,
    };
    target.push_str(text);
}

fn headlines(items: &[FeedItem]) -> EvidenceResult {
    let lines: Vec<String> = items
        .iter()
        .take(HEADLINES)
        .map(|i| format!("- {}", i.title.trim()))
        .collect();
    let mut ev = EvidenceResult::found(NAME, format!("Top headlines:\n{}", lines.join("\n")), 0.6);
    if let Some(first) = items.first().filter(|i| !i.link.is_empty()) {
        ev = ev.with_url(first.link.clone());
    }
    ev
}

/// Highest scoring item; confidence min(0.6 + 0.1 * score, 0.9)
pub fn best_match(items: &[FeedItem], terms: &[String]) -> EvidenceResult {
    let mut best: Option<(f64, &FeedItem)> = None;
    for item in items {
        let title = item.title.to_lowercase();
        let description = item.description.to_lowercase();
        let score: f64 = terms
            .iter()
            .map(|t| {
                let mut s = 0.0;
                if title.contains(t.as_str()) {
                    s += 1.0;
                }
                if description.contains(t.as_str()) {
                    s += 0.5;
                }
                s
            })
            .sum();
        if score > 0.0 && best.map_or(true, |(b, _)| score > b) {
            best = Some((score, item));
        }
    }
    let Some((score, item)) = best else {
        return EvidenceResult::not_found(NAME);
    };
    let description = truncate(&strip_tags(&item.description), 300);
    let summary = if description.is_empty() {
        item.title.trim().to_string()
    } else {
        format!("{}: {}", item.title.trim(), description)
    };
    let mut ev = EvidenceResult::found(NAME, summary, (0.6 + score * 0.1).min(0.9))
        .with_meta("score", score);
    if !item.link.is_empty() {
        ev = ev.with_url(item.link.trim());
    }
    ev
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_common::EvidenceStatus;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>World News</title>
    <link>https://example.com</link>
    <item>
      <title>Markets rally as inflation cools</title>
      <description><![CDATA[<p>Stocks rose on <b>Tuesday</b>.</p>]]></description>
      <link>https://example.com/markets</link>
    </item>
    <item>
      <title>Giants sign new quarterback</title>
      <description>The team announced the signing &amp; a new contract.</description>
      <link>https://example.com/giants</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_items() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Markets rally as inflation cools");
        assert_eq!(items[0].link, "https://example.com/markets");
        assert_eq!(items[1].description, "The team announced the signing & a new contract.");
    }

    #[test]
    fn test_best_match_scores_title_and_description() {
        let items = parse_feed(FEED).unwrap();
        let ev = best_match(&items, &["giants".to_string(), "contract".to_string()]);
        assert_eq!(ev.status, EvidenceStatus::Found);
        assert!(ev.summary.starts_with("Giants sign new quarterback: The team"));
        assert!((ev.confidence - 0.75).abs() < 1e-9);
        assert_eq!(ev.url.as_deref(), Some("https://example.com/giants"));
    }

    #[test]
    fn test_no_match_and_headlines() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(best_match(&items, &["volcano".to_string()]).status, EvidenceStatus::NotFound);

        let ev = headlines(&items);
        assert_eq!(ev.confidence, 0.6);
        assert!(ev.summary.contains("- Giants sign new quarterback"));
    }

    #[test]
    fn test_strips_html_in_description() {
        let items = parse_feed(FEED).unwrap();
        let ev = best_match(&items, &["inflation".to_string()]);
        assert_eq!(ev.summary, "Markets rally as inflation cools: Stocks rose on Tuesday.");
    }

    #[test]
    fn test_malformed_feed_is_an_error() {
        assert!(parse_feed("<rss><channel><item><title>x</item></rss>").is_err());
    }
}
