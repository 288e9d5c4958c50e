//! `scan` and `sites` command handlers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use dsstock_core::{AppConfig, ScanSummary, SiteRegistry, SiteStrategy, StockRecord};
use dsstock_scraper::{
    CachedFetcher, FetchSettings, HeuristicSettings, HttpFetcher, OverrideTable, ScanOptions,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::export;

pub(crate) struct ScanArgs {
    pub sites: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub no_export: bool,
    pub countries: Vec<String>,
}

/// Scan the registry, print the results, and export them unless disabled.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded, a `--country` filter
/// names an unknown site, the HTTP client cannot be built, or the export
/// files cannot be written. Individual site failures are not errors.
pub(crate) async fn run_scan_command(config: &AppConfig, args: ScanArgs) -> anyhow::Result<()> {
    let registry = load_sites(config, args.sites.as_deref())?;
    let registry = select_sites(registry, &args.countries)?;

    let fetcher = CachedFetcher::new(
        HttpFetcher::new(&FetchSettings::from_app_config(config))?,
        Duration::from_secs(config.cache_ttl_secs),
    );
    let options = ScanOptions {
        overrides: OverrideTable::builtin(),
        heuristics: HeuristicSettings::default().with_text_window(config.proximity_window),
    };

    tracing::info!(sites = registry.len(), "starting scan");
    let pb = make_progress_bar(registry.len());
    let records = dsstock_scraper::run_scan(&fetcher, &registry, &options, |progress| {
        pb.set_position(u64::try_from(progress.sites_done).unwrap_or(u64::MAX));
        pb.set_message(progress.site_label.clone());
    })
    .await;
    pb.finish_and_clear();

    if records.is_empty() {
        println!("no data found");
        return Ok(());
    }

    print_records(&records);
    println!();
    print_summary(&ScanSummary::from_records(&records));

    if args.no_export {
        return Ok(());
    }
    let dir = args
        .out
        .unwrap_or_else(|| export::default_out_dir(Local::now().date_naive()));
    let written = export::write_export(&dir, &records)?;
    println!();
    println!("exported {} files to {}", written.len(), dir.display());

    Ok(())
}

/// Print the registered storefronts.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or fails validation.
pub(crate) fn run_list_sites(config: &AppConfig, sites: Option<&Path>) -> anyhow::Result<()> {
    let registry = load_sites(config, sites)?;
    if registry.is_empty() {
        println!("no sites registered");
        return Ok(());
    }

    println!("{:<14}{:<12}{:<18}URL", "COUNTRY", "STRATEGY", "OVERRIDE");
    let overrides = OverrideTable::builtin();
    for site in registry.iter() {
        let strategy = match site.strategy {
            SiteStrategy::Structured { .. } => "structured",
            SiteStrategy::Heuristic { .. } => "heuristic",
        };
        let override_kind = overrides
            .resolve(site)
            .map_or_else(|| "-".to_string(), |k| k.to_string());
        println!(
            "{:<14}{:<12}{:<18}{}",
            site.country,
            strategy,
            override_kind,
            site.page_url()
        );
    }
    Ok(())
}

fn load_sites(config: &AppConfig, sites: Option<&Path>) -> anyhow::Result<SiteRegistry> {
    let path = sites.unwrap_or(&config.sites_path);
    let registry = dsstock_core::load_registry(path)?;
    tracing::debug!(path = %path.display(), sites = registry.len(), "site registry loaded");
    Ok(registry)
}

/// Keep only the requested countries, in registry order. An empty filter
/// keeps everything.
fn select_sites(registry: SiteRegistry, countries: &[String]) -> anyhow::Result<SiteRegistry> {
    if countries.is_empty() {
        return Ok(registry);
    }
    for country in countries {
        if registry.get(country).is_none() {
            anyhow::bail!("country '{country}' is not in the site registry");
        }
    }
    let sites = registry
        .sites
        .into_iter()
        .filter(|s| {
            countries
                .iter()
                .any(|c| s.country.trim().eq_ignore_ascii_case(c.trim()))
        })
        .collect();
    Ok(SiteRegistry::new(sites))
}

fn make_progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {pos}/{len} sites {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn print_records(records: &[StockRecord]) {
    println!(
        "{:<14}{:<14}{:>7}  {:<16}DETAILS",
        "COUNTRY", "MODEL", "STOCK", "CONFIDENCE"
    );
    for r in records {
        println!(
            "{:<14}{:<14}{:>7}  {:<16}{}",
            r.country,
            r.model,
            r.stock,
            r.confidence.as_str(),
            r.details
        );
    }
}

fn print_summary(summary: &ScanSummary) {
    println!("Total stock: {}", summary.total_stock);
    println!(
        "Top country: {}",
        summary.top_country.as_deref().unwrap_or("\u{2014}")
    );
    println!("Countries: {}", summary.countries);
}
