//! Scan orchestration over the whole registry.

use dsstock_core::{ScanProgress, SiteRegistry, StockRecord};

use crate::dispatch::{dispatch_site, ScanOptions};
use crate::fetch::Fetch;

/// Scan every site in registry order, one at a time.
///
/// `on_progress` is called synchronously after each site completes. The
/// result holds at least one record per site (a sentinel when nothing was
/// recoverable); an empty registry yields an empty sequence.
pub async fn run_scan<F, P>(
    fetcher: &F,
    registry: &SiteRegistry,
    options: &ScanOptions,
    mut on_progress: P,
) -> Vec<StockRecord>
where
    F: Fetch,
    P: FnMut(&ScanProgress),
{
    let sites_total = registry.len();
    let mut records = Vec::new();

    for (i, site) in registry.iter().enumerate() {
        tracing::info!(country = %site.country, url = site.page_url(), "scanning site");
        let site_records = dispatch_site(fetcher, site, options).await;
        tracing::info!(
            country = %site.country,
            records = site_records.len(),
            stock = site_records.iter().map(|r| u64::from(r.stock)).sum::<u64>(),
            "site complete"
        );
        records.extend(site_records);

        on_progress(&ScanProgress {
            sites_done: i + 1,
            sites_total,
            site_label: site.country.clone(),
        });
    }

    records
}
