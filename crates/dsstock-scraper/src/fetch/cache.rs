use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::Fetch;
use crate::error::FetchError;

struct CacheEntry {
    fetched_at: Instant,
    body: String,
}

/// Memoises successful bodies per URL for a bounded window so repeated scans
/// in quick succession do not re-hit the storefronts. Failures are never
/// cached. A zero TTL disables caching entirely.
pub struct CachedFetcher<F> {
    inner: F,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<F: Fetch> CachedFetcher<F> {
    #[must_use]
    pub fn new(inner: F, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn lookup(&self, url: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(url) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(url);
                None
            }
            None => None,
        }
    }

    fn store(&self, url: &str, body: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            url.to_owned(),
            CacheEntry {
                fetched_at: Instant::now(),
                body: body.to_owned(),
            },
        );
    }
}

impl<F: Fetch> Fetch for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if self.ttl.is_zero() {
            return self.inner.fetch(url).await;
        }
        if let Some(body) = self.lookup(url) {
            tracing::debug!(url, "fetch cache hit");
            return Ok(body);
        }
        let body = self.inner.fetch(url).await?;
        self.store(url, &body);
        Ok(body)
    }
}
