//! CoinGecko spot prices in USD (crypto, PRIMARY).

use crate::error::FetchResult;
use crate::http::HttpClient;
use crate::text::{format_usd, subject_of};
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const NAME: &str = "coingecko";
const PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Common names and tickers -> CoinGecko ids
const ASSET_IDS: &[(&str, &str)] = &[
    ("bitcoin", "bitcoin"),
    ("btc", "bitcoin"),
    ("ethereum", "ethereum"),
    ("eth", "ethereum"),
    ("ether", "ethereum"),
    ("cardano", "cardano"),
    ("ada", "cardano"),
    ("solana", "solana"),
    ("sol", "solana"),
    ("dogecoin", "dogecoin"),
    ("doge", "dogecoin"),
    ("polkadot", "polkadot"),
    ("dot", "polkadot"),
    ("litecoin", "litecoin"),
    ("ltc", "litecoin"),
    ("ripple", "ripple"),
    ("xrp", "ripple"),
];

/// Words dropped from a price question before resolving the asset
const FILLER: &[&str] = &["price", "of", "the", "current", "value", "today", "now", "usd", "in"];

#[derive(Debug, Deserialize)]
struct Quote {
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
}

pub struct CoinGeckoAdapter {
    http: HttpClient,
}

impl CoinGeckoAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let Some(id) = asset_id(query) else {
            return Ok(EvidenceResult::not_found(NAME));
        };
        let body: serde_json::Value = self.http.get_json(
            PRICE_URL,
            &[
                ("ids", id.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
            ],
        )?;
        parse_price(&id, body)
    }
}

impl Adapter for CoinGeckoAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Crypto
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// CoinGecko id for a free-form asset mention; unknown names are hyphenated
pub fn asset_id(query: &str) -> Option<String> {
    let lower = subject_of(query).to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty() && !FILLER.contains(w))
        .collect();
    if words.is_empty() {
        return None;
    }
    for word in &words {
        if let Some((_, id)) = ASSET_IDS.iter().find(|(name, _)| name == word) {
            return Some(id.to_string());
        }
    }
    Some(words.join("-"))
}

pub fn parse_price(id: &str, body: serde_json::Value) -> FetchResult<EvidenceResult> {
    let quotes: BTreeMap<String, Quote> = serde_json::from_value(body)?;
    let Some(quote) = quotes.get(id) else {
        return Ok(EvidenceResult::not_found(NAME));
    };
    let Some(usd) = quote.usd else {
        return Ok(EvidenceResult::not_found(NAME));
    };

    let mut summary = match ticker(id) {
        Some(t) => format!("{} ({}): {} USD", display_name(id), t, format_usd(usd)),
        None => format!("{}: {} USD", display_name(id), format_usd(usd)),
    };
    if let Some(change) = quote.usd_24h_change {
        summary.push_str(&format!(" ({:+.2}% over 24h)", change));
    }
    Ok(EvidenceResult::found(NAME, summary, 0.95)
        .with_url(format!("https://www.coingecko.com/en/coins/{}", id))
        .with_meta("price_usd", usd)
        .with_meta("currency", "USD"))
}

/// Upper-case ticker for a known id ("bitcoin" -> "BTC")
fn ticker(id: &str) -> Option<String> {
    ASSET_IDS
        .iter()
        .find(|(name, asset)| *asset == id && name.len() <= 4)
        .map(|(name, _)| name.to_uppercase())
}

fn display_name(id: &str) -> String {
    id.split('-')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_common::EvidenceStatus;
    use serde_json::json;

    #[test]
    fn test_asset_id() {
        assert_eq!(asset_id("bitcoin").as_deref(), Some("bitcoin"));
        assert_eq!(asset_id("BTC price").as_deref(), Some("bitcoin"));
        assert_eq!(asset_id("the price of eth today").as_deref(), Some("ethereum"));
        assert_eq!(asset_id("shiba inu").as_deref(), Some("shiba-inu"));
        assert_eq!(asset_id("price"), None);
    }

    #[test]
    fn test_parse_price() {
        let body = json!({"bitcoin": {"usd": 64250.12, "usd_24h_change": -1.234}});
        let ev = parse_price("bitcoin", body).unwrap();
        assert_eq!(ev.status, EvidenceStatus::Found);
        assert_eq!(ev.summary, "Bitcoin (BTC): $64,250.12 USD (-1.23% over 24h)");
        assert_eq!(ev.metadata["price_usd"], json!(64250.12));
        assert!(ev.summary.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_parse_price_without_ticker() {
        let body = json!({"shiba-inu": {"usd": 0.000021}});
        let ev = parse_price("shiba-inu", body).unwrap();
        assert_eq!(ev.summary, "Shiba Inu: $0.00 USD");
    }

    #[test]
    fn test_parse_unknown_asset() {
        assert_eq!(parse_price("nope", json!({})).unwrap().status, EvidenceStatus::NotFound);
        let no_usd = json!({"bitcoin": {"eur": 1.0}});
        assert_eq!(parse_price("bitcoin", no_usd).unwrap().status, EvidenceStatus::NotFound);
    }
}
