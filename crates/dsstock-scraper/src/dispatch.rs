//! Per-site routing: override table first, then the declared strategy.

use std::collections::HashMap;

use dsstock_core::{HeuristicOverride, SiteEntry, SiteStrategy, StockRecord};

use crate::error::ExtractError;
use crate::fetch::Fetch;
use crate::heuristic::{
    extract_attribute_tags, extract_generic, extract_price_proximity, HeuristicSettings,
};
use crate::structured::{extract_structured, StructuredTarget};

/// Country key → extraction variant, consulted before generic dispatch.
///
/// Keys are compared case-insensitively. An override declared on the site
/// entry itself wins over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideTable {
    entries: HashMap<String, HeuristicOverride>,
}

impl OverrideTable {
    /// No overrides at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Germany renders one tagged element per car; Portugal only exposes
    /// model names next to prices.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty()
            .with("ALLEMAGNE", HeuristicOverride::AttributeTag)
            .with("PORTUGAL", HeuristicOverride::PriceProximity)
    }

    #[must_use]
    pub fn with(mut self, country: &str, kind: HeuristicOverride) -> Self {
        self.entries.insert(country.trim().to_uppercase(), kind);
        self
    }

    #[must_use]
    pub fn lookup(&self, country: &str) -> Option<HeuristicOverride> {
        self.entries.get(&country.trim().to_uppercase()).copied()
    }

    /// Effective override for `site`, if any.
    #[must_use]
    pub fn resolve(&self, site: &SiteEntry) -> Option<HeuristicOverride> {
        site.declared_override()
            .or_else(|| self.lookup(&site.country))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OverrideTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Everything a scan needs besides the fetcher and the registry.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub overrides: OverrideTable,
    pub heuristics: HeuristicSettings,
}

/// Run the strategy selected for `site` and return its records.
///
/// # Errors
///
/// Returns the [`ExtractError`] of the selected strategy; nothing is retried
/// and no other strategy is consulted.
pub async fn extract_site<F: Fetch>(
    fetcher: &F,
    site: &SiteEntry,
    options: &ScanOptions,
) -> Result<Vec<StockRecord>, ExtractError> {
    let country = site.country.as_str();
    let settings = &options.heuristics;

    if let Some(kind) = options.overrides.resolve(site) {
        tracing::debug!(country, override_kind = %kind, "country override selected");
        let html = fetcher.fetch(site.page_url()).await?;
        let window = match &site.strategy {
            SiteStrategy::Heuristic {
                proximity_window, ..
            } => *proximity_window,
            SiteStrategy::Structured { .. } => None,
        };
        return match kind {
            HeuristicOverride::AttributeTag => extract_attribute_tags(&html, country, settings),
            HeuristicOverride::PriceProximity => {
                extract_price_proximity(&html, country, settings, window)
            }
        };
    }

    match &site.strategy {
        SiteStrategy::Structured {
            base_url,
            latitude,
            longitude,
            landing_path,
        } => {
            let target = StructuredTarget {
                country,
                base_url,
                latitude: *latitude,
                longitude: *longitude,
                landing_path: landing_path.as_deref(),
            };
            extract_structured(fetcher, &target).await
        }
        SiteStrategy::Heuristic {
            url,
            proximity_window,
            ..
        } => {
            let html = fetcher.fetch(url).await?;
            extract_generic(&html, country, settings, *proximity_window)
        }
    }
}

/// Like [`extract_site`], but never empty: any failure or empty result
/// becomes a single `unavailable` sentinel so the site stays visible.
pub async fn dispatch_site<F: Fetch>(
    fetcher: &F,
    site: &SiteEntry,
    options: &ScanOptions,
) -> Vec<StockRecord> {
    match extract_site(fetcher, site, options).await {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => {
            tracing::warn!(country = %site.country, "no records extracted; emitting sentinel");
            vec![StockRecord::unavailable(site.country.as_str())]
        }
        Err(err) => {
            tracing::warn!(
                country = %site.country,
                url = site.page_url(),
                error = %err,
                "extraction failed; emitting sentinel"
            );
            vec![StockRecord::unavailable(site.country.as_str())]
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
