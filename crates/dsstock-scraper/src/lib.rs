//! Stock extraction pipeline for national DS storefronts.
//!
//! Fetches each registered site once, routes it to structured (embedded
//! payload) or heuristic (pattern) extraction, and returns flat
//! [`StockRecord`](dsstock_core::StockRecord)s tagged with a confidence tier.

pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod heuristic;
pub mod payload;
pub mod scan;
pub mod structured;

pub use dispatch::{dispatch_site, extract_site, OverrideTable, ScanOptions};
pub use error::{ExtractError, FetchError};
pub use fetch::{CachedFetcher, Fetch, FetchSettings, HttpFetcher};
pub use heuristic::HeuristicSettings;
pub use payload::ModelRef;
pub use scan::run_scan;
pub use structured::{extract_structured, StructuredTarget};
