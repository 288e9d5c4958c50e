use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Country-specific extraction variant that replaces generic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicOverride {
    /// One tagged element per stock unit; count attribute occurrences.
    AttributeTag,
    /// Model names near price tokens, with a heading fallback.
    PriceProximity,
}

impl std::fmt::Display for HeuristicOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeuristicOverride::AttributeTag => write!(f, "attribute_tag"),
            HeuristicOverride::PriceProximity => write!(f, "price_proximity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum SiteStrategy {
    /// Storefront with an embedded JSON payload and per-model stock pages.
    Structured {
        base_url: String,
        latitude: f64,
        longitude: f64,
        /// Path tried before `base_url` itself, e.g. `/configurable`.
        #[serde(default)]
        landing_path: Option<String>,
    },
    /// Storefront whose markup is mined with patterns.
    Heuristic {
        url: String,
        #[serde(default, rename = "override")]
        override_kind: Option<HeuristicOverride>,
        #[serde(default)]
        proximity_window: Option<usize>,
    },
}

/// One national storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub country: String,
    #[serde(flatten)]
    pub strategy: SiteStrategy,
}

impl SiteEntry {
    /// The page fetched first for this site.
    #[must_use]
    pub fn page_url(&self) -> &str {
        match &self.strategy {
            SiteStrategy::Structured { base_url, .. } => base_url,
            SiteStrategy::Heuristic { url, .. } => url,
        }
    }

    /// Override declared on the entry itself, if any.
    #[must_use]
    pub fn declared_override(&self) -> Option<HeuristicOverride> {
        match &self.strategy {
            SiteStrategy::Heuristic { override_kind, .. } => *override_kind,
            SiteStrategy::Structured { .. } => None,
        }
    }
}

/// Ordered set of storefronts keyed by country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteRegistry {
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
}

impl SiteRegistry {
    #[must_use]
    pub fn new(sites: Vec<SiteEntry>) -> Self {
        Self { sites }
    }

    #[must_use]
    pub fn get(&self, country: &str) -> Option<&SiteEntry> {
        self.sites
            .iter()
            .find(|s| s.country.trim().eq_ignore_ascii_case(country.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteEntry> {
        self.sites.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Load and validate the site registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_registry(path: &Path) -> Result<SiteRegistry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RegistryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_registry(&content)
}

/// Parse and validate a registry from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_registry(yaml: &str) -> Result<SiteRegistry, ConfigError> {
    let registry: SiteRegistry = serde_yaml::from_str(yaml)?;
    validate_registry(&registry)?;
    Ok(registry)
}

fn validate_registry(registry: &SiteRegistry) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for site in &registry.sites {
        if site.country.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site country must be non-empty".to_string(),
            ));
        }

        if !seen.insert(site.country.trim().to_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site country: '{}'",
                site.country
            )));
        }

        let url = site.page_url();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "site '{}' has non-http url '{url}'",
                site.country
            )));
        }

        match &site.strategy {
            SiteStrategy::Structured {
                latitude,
                longitude,
                landing_path,
                ..
            } => {
                if !(-90.0..=90.0).contains(latitude) {
                    return Err(ConfigError::Validation(format!(
                        "site '{}' has latitude {latitude} outside [-90, 90]",
                        site.country
                    )));
                }
                if !(-180.0..=180.0).contains(longitude) {
                    return Err(ConfigError::Validation(format!(
                        "site '{}' has longitude {longitude} outside [-180, 180]",
                        site.country
                    )));
                }
                if landing_path.as_deref().is_some_and(|p| !p.starts_with('/')) {
                    return Err(ConfigError::Validation(format!(
                        "site '{}' landing_path must start with '/'",
                        site.country
                    )));
                }
            }
            SiteStrategy::Heuristic {
                proximity_window, ..
            } => {
                if *proximity_window == Some(0) {
                    return Err(ConfigError::Validation(format!(
                        "site '{}' proximity_window must be positive",
                        site.country
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
