//! Content retrieval: one GET per call, no retry.

mod cache;
mod http;

use std::future::Future;

pub use cache::CachedFetcher;
pub use http::{FetchSettings, HttpFetcher, BROWSER_ACCEPT};

use crate::error::FetchError;

/// Retrieve the decoded body at `url`.
///
/// Implementations perform a single attempt and report every transport
/// problem as a [`FetchError`]; callers decide how to degrade.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;
}
