//! Domain types and configuration for the DS stock monitor.
//!
//! Holds the site registry, the `StockRecord` output shape, progress events,
//! environment-driven `AppConfig`, and the report helpers the exporter uses.

pub mod app_config;
pub mod config;
pub mod error;
pub mod records;
pub mod registry;
pub mod report;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use records::{Confidence, ScanProgress, StockRecord};
pub use registry::{
    load_registry, parse_registry, HeuristicOverride, SiteEntry, SiteRegistry, SiteStrategy,
};
pub use report::{country_totals, section_names, ScanSummary, SECTION_NAME_MAX_CHARS};
