//! Heuristic extraction over raw storefront markup.
//!
//! Generic sites try, in order, a pagination/result counter, a JSON-LD offer
//! catalog, and model/engine-keyword proximity; the first strategy with a
//! signal supplies all of the site's records. Two country variants bypass
//! that chain: attribute-tag counting and price proximity.

mod attribute;
mod jsonld;
mod pagination;
mod proximity;

pub use attribute::count_attribute_tags;
pub use jsonld::offer_catalog_count;
pub use pagination::{site_total, SITE_TOTAL_UPPER_BOUND};
pub use proximity::{count_in_headings, count_near_keywords};

use dsstock_core::records::{MODEL_GLOBAL, MODEL_TOTAL_SITE};
use dsstock_core::{Confidence, StockRecord};

use crate::error::ExtractError;

/// Tunables for heuristic extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicSettings {
    /// Model names searched for on heuristic sites.
    pub candidate_models: Vec<String>,
    /// Attribute binding an element to a model on attribute-tag sites.
    pub tag_attribute: String,
    /// Fuel/engine/trim keywords for generic proximity.
    pub text_keywords: Vec<String>,
    pub text_window: usize,
    /// Currency/price tokens for the price-proximity variant.
    pub price_keywords: Vec<String>,
    pub price_window: usize,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            candidate_models: owned(&["DS 3", "DS 4", "DS 7", "DS 9"]),
            tag_attribute: "data-model-text".to_string(),
            text_keywords: owned(&["PureTech", "BlueHDi", "E-TENSE", "Hybrid", "Electric"]),
            text_window: 50,
            price_keywords: owned(&["€", "EUR", "Preço"]),
            price_window: 300,
        }
    }
}

impl HeuristicSettings {
    #[must_use]
    pub fn with_text_window(mut self, window: usize) -> Self {
        self.text_window = window;
        self
    }
}

/// Attribute-tag strategy: one stock unit per tagged element.
///
/// # Errors
///
/// Returns [`ExtractError::NoSignal`] when no candidate model is tagged.
pub fn extract_attribute_tags(
    html: &str,
    country: &str,
    settings: &HeuristicSettings,
) -> Result<Vec<StockRecord>, ExtractError> {
    let records = per_model(settings, |model| {
        count_attribute_tags(html, &settings.tag_attribute, model)
    })
    .map(|(model, n)| StockRecord::new(country, model, n, Confidence::ExactHtmlTag))
    .collect::<Vec<_>>();
    non_empty(records)
}

/// Price-proximity variant: model names near currency tokens, falling back
/// to heading mentions for models with no price match.
///
/// # Errors
///
/// Returns [`ExtractError::NoSignal`] when no candidate model is found.
pub fn extract_price_proximity(
    html: &str,
    country: &str,
    settings: &HeuristicSettings,
    window: Option<usize>,
) -> Result<Vec<StockRecord>, ExtractError> {
    let window = window.unwrap_or(settings.price_window);
    let records = per_model(settings, |model| {
        match count_near_keywords(html, model, &settings.price_keywords, window) {
            0 => count_in_headings(html, model),
            n => n,
        }
    })
    .map(|(model, n)| StockRecord::new(country, model, n, Confidence::TextEstimate))
    .collect::<Vec<_>>();
    non_empty(records)
}

/// Generic chain: pagination total, then JSON-LD catalog, then engine-keyword
/// proximity. Exactly one strategy contributes.
///
/// # Errors
///
/// Returns [`ExtractError::NoSignal`] when every strategy comes up empty.
pub fn extract_generic(
    html: &str,
    country: &str,
    settings: &HeuristicSettings,
    window: Option<usize>,
) -> Result<Vec<StockRecord>, ExtractError> {
    if let Some(total) = site_total(html) {
        tracing::debug!(country, total, "pagination counter matched");
        return Ok(vec![StockRecord::new(
            country,
            MODEL_TOTAL_SITE,
            total,
            Confidence::GlobalEstimate,
        )]);
    }

    if let Some(count) = offer_catalog_count(html) {
        tracing::debug!(country, count, "JSON-LD offer catalog matched");
        return Ok(vec![StockRecord::new(
            country,
            MODEL_GLOBAL,
            count,
            Confidence::GlobalEstimate,
        )]);
    }

    let window = window.unwrap_or(settings.text_window);
    let records = per_model(settings, |model| {
        count_near_keywords(html, model, &settings.text_keywords, window)
    })
    .map(|(model, n)| StockRecord::new(country, model, n, Confidence::TextEstimate))
    .collect::<Vec<_>>();
    if !records.is_empty() {
        tracing::debug!(country, models = records.len(), "text proximity matched");
    }
    non_empty(records)
}

/// Candidate models paired with their positive counts.
fn per_model<'a, C>(
    settings: &'a HeuristicSettings,
    mut count: C,
) -> impl Iterator<Item = (&'a str, u32)> + 'a
where
    C: FnMut(&str) -> usize + 'a,
{
    settings.candidate_models.iter().filter_map(move |model| {
        let n = count(model);
        (n > 0).then(|| (model.as_str(), u32::try_from(n).unwrap_or(u32::MAX)))
    })
}

fn non_empty(records: Vec<StockRecord>) -> Result<Vec<StockRecord>, ExtractError> {
    if records.is_empty() {
        Err(ExtractError::NoSignal)
    } else {
        Ok(records)
    }
}

#[cfg(test)]
#[path = "heuristic_test.rs"]
mod tests;
