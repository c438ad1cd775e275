//! Evidence adapters for Scout.
//!
//! Each adapter wraps one upstream source behind the uniform
//! `scout_common::Adapter` contract: it never panics and never returns an
//! error, only an `EvidenceResult` whose status says what happened.
//! `catalog::default_registry` wires them all into a `FetchRegistry`.
//!
//! v0.4.0: Shared blocking client with one hard timeout; RSS via quick-xml.

pub mod adapters;
pub mod catalog;
pub mod error;
pub mod http;
pub mod text;

pub use catalog::{default_registry, ADAPTER_NAMES};
pub use error::{FetchError, FetchResult};
pub use http::HttpClient;
