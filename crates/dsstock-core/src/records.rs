//! Output records and progress events produced by a scan.

use serde::{Deserialize, Serialize};

/// Model label used when a JSON-LD offer catalog gives a site-wide count.
pub const MODEL_GLOBAL: &str = "Global";
/// Model label used when a pagination counter gives a site-wide count.
pub const MODEL_TOTAL_SITE: &str = "TOTAL SITE";
/// Model label of the sentinel emitted when a site yields nothing.
pub const MODEL_UNAVAILABLE: &str = "Unavailable";

/// How directly a stock count was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    /// Offer count read from the storefront's embedded data payload.
    ExactApi,
    /// One tagged element per stock unit in the rendered markup.
    ExactHtmlTag,
    /// Site-wide total from a pagination counter or SEO catalog.
    GlobalEstimate,
    /// Co-occurrence of a model name with domain keywords.
    TextEstimate,
    Unavailable,
}

impl Confidence {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::ExactApi => "exact-api",
            Confidence::ExactHtmlTag => "exact-html-tag",
            Confidence::GlobalEstimate => "global-estimate",
            Confidence::TextEstimate => "text-estimate",
            Confidence::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed stock fact for a (country, model) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub country: String,
    pub model: String,
    pub stock: u32,
    pub confidence: Confidence,
    /// Free-text breakdown such as `"Essence (3), Electrique (2)"`; empty when absent.
    pub details: String,
}

impl StockRecord {
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        model: impl Into<String>,
        stock: u32,
        confidence: Confidence,
    ) -> Self {
        Self {
            country: country.into(),
            model: model.into(),
            stock,
            confidence,
            details: String::new(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Placeholder marking "extraction attempted, nothing recoverable".
    #[must_use]
    pub fn unavailable(country: impl Into<String>) -> Self {
        Self::new(country, MODEL_UNAVAILABLE, 0, Confidence::Unavailable)
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.confidence == Confidence::Unavailable
    }
}

/// Progress event emitted after each site completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    pub sites_done: usize,
    pub sites_total: usize,
    pub site_label: String,
}
