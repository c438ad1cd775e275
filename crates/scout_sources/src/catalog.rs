//! Default adapter catalog.
//!
//! Builds the `FetchRegistry` used by `scoutctl`: every shipped adapter,
//! sharing one HTTP client, registered with the keywords that route generic
//! queries to it.

use crate::adapters::{
    coingecko, local_corpus, news_rss, newsapi, nyt_bestseller, open_meteo, reddit, thesportsdb,
    wikidata, wikipedia, CoinGeckoAdapter, LocalCorpusAdapter, NewsApiAdapter, NewsRssAdapter,
    NytBestsellerAdapter, OpenMeteoAdapter, RedditAdapter, TheSportsDbAdapter, WikidataAdapter,
    WikipediaAdapter,
};
use crate::error::FetchResult;
use crate::http::HttpClient;
use scout_common::config::ScoutConfig;
use scout_common::{DataPaths, FetchRegistry};
use tracing::info;

const WIKIDATA_KEYWORDS: &[&str] = &[
    "who", "what", "capital", "population", "president", "born", "founded", "ceo", "leader",
];
const WIKIPEDIA_KEYWORDS: &[&str] = &["history", "explain", "define", "meaning", "biography"];
const NEWS_KEYWORDS: &[&str] = &["news", "headlines", "breaking", "latest"];
const REDDIT_KEYWORDS: &[&str] = &["reddit", "opinion", "discussion", "community"];
const SPORTS_KEYWORDS: &[&str] = &[
    "team", "league", "game", "match", "score", "won", "nfl", "nba", "mlb", "nhl", "soccer",
    "football",
];
/// Price words only: a bare asset name ("what is bitcoin") is an encyclopedic question
const CRYPTO_KEYWORDS: &[&str] = &["crypto", "cryptocurrency", "price", "coin", "usd"];
const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "forecast", "rain"];
const BOOK_KEYWORDS: &[&str] = &["bestseller", "bestsellers", "books", "novel"];
const CORPUS_KEYWORDS: &[&str] = &["notes", "corpus"];

/// Registry with every shipped adapter
pub fn default_registry(config: &ScoutConfig, paths: &DataPaths) -> FetchResult<FetchRegistry> {
    let http = HttpClient::new(&config.sources)?;
    let sources = &config.sources;
    let corpus_dir = sources.corpus_dir.clone().unwrap_or_else(|| paths.corpus());

    let mut registry = FetchRegistry::new();
    registry.register(Box::new(WikidataAdapter::new(http.clone())), WIKIDATA_KEYWORDS);
    registry.register(Box::new(WikipediaAdapter::new(http.clone())), WIKIPEDIA_KEYWORDS);
    registry.register(Box::new(NewsRssAdapter::new(http.clone())), NEWS_KEYWORDS);
    registry.register(
        Box::new(NewsApiAdapter::new(http.clone(), sources.newsapi_key.clone())),
        NEWS_KEYWORDS,
    );
    registry.register(Box::new(RedditAdapter::new(http.clone())), REDDIT_KEYWORDS);
    registry.register(Box::new(TheSportsDbAdapter::new(http.clone())), SPORTS_KEYWORDS);
    registry.register(Box::new(CoinGeckoAdapter::new(http.clone())), CRYPTO_KEYWORDS);
    registry.register(Box::new(OpenMeteoAdapter::new(http.clone())), WEATHER_KEYWORDS);
    registry.register(
        Box::new(NytBestsellerAdapter::new(http, sources.nyt_key.clone())),
        BOOK_KEYWORDS,
    );
    registry.register(Box::new(LocalCorpusAdapter::new(corpus_dir)), CORPUS_KEYWORDS);

    info!(
        adapters = registry.len(),
        newsapi = sources.newsapi_key.is_some(),
        nyt = sources.nyt_key.is_some(),
        "adapter catalog ready"
    );
    Ok(registry)
}

/// Names of every adapter `default_registry` registers
pub const ADAPTER_NAMES: &[&str] = &[
    wikidata::NAME,
    wikipedia::NAME,
    news_rss::NAME,
    newsapi::NAME,
    reddit::NAME,
    thesportsdb::NAME,
    coingecko::NAME,
    open_meteo::NAME,
    nyt_bestseller::NAME,
    local_corpus::NAME,
];
