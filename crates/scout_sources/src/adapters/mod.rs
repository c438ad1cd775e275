//! Concrete adapters, one per upstream source.
//!
//! Every adapter keeps its response parsing in pure `parse_*` functions so
//! the shapes can be checked against fixtures without network access.

pub mod coingecko;
pub mod local_corpus;
pub mod news_rss;
pub mod newsapi;
pub mod nyt_bestseller;
pub mod open_meteo;
pub mod reddit;
pub mod thesportsdb;
pub mod wikidata;
pub mod wikipedia;

pub use coingecko::CoinGeckoAdapter;
pub use local_corpus::LocalCorpusAdapter;
pub use news_rss::NewsRssAdapter;
pub use newsapi::NewsApiAdapter;
pub use nyt_bestseller::NytBestsellerAdapter;
pub use open_meteo::OpenMeteoAdapter;
pub use reddit::RedditAdapter;
pub use thesportsdb::TheSportsDbAdapter;
pub use wikidata::WikidataAdapter;
pub use wikipedia::WikipediaAdapter;
