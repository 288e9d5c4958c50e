//! Structured extraction: embedded payload on the landing page, then one
//! stock page per discovered model/body-style pair.

use dsstock_core::{Confidence, StockRecord};
use serde_json::Value;

use crate::error::ExtractError;
use crate::fetch::Fetch;
use crate::payload::{
    collect_model_refs, extract_embedded_payload, parse_stock_payload, unique_model_refs,
    ModelRef, StockSummary,
};

/// Sales channel marker for consumer stock.
const CHANNEL_B2C: &str = "b2c";

/// Parameters of a structured storefront.
#[derive(Debug, Clone, Copy)]
pub struct StructuredTarget<'a> {
    pub country: &'a str,
    pub base_url: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub landing_path: Option<&'a str>,
}

/// Discover models on the landing page and query each one's stock.
///
/// Stock queries run one after another. A failed query skips that model
/// only; the returned records cover every model whose stock page parsed.
///
/// # Errors
///
/// Returns an [`ExtractError`] when the landing payload cannot be fetched or
/// parsed, or [`ExtractError::NoSignal`] when it lists no titled models.
pub async fn extract_structured<F: Fetch>(
    fetcher: &F,
    target: &StructuredTarget<'_>,
) -> Result<Vec<StockRecord>, ExtractError> {
    let models = landing_models(fetcher, target).await?;
    tracing::debug!(
        country = target.country,
        models = models.len(),
        "discovered models in landing payload"
    );

    let mut records = Vec::with_capacity(models.len());
    for model in &models {
        let Some(url) = stock_url(target.base_url, model, target.latitude, target.longitude)
        else {
            tracing::warn!(
                country = target.country,
                base_url = target.base_url,
                "cannot build stock url; skipping model"
            );
            continue;
        };

        match fetch_stock(fetcher, &url).await {
            Ok(summary) => {
                tracing::debug!(
                    country = target.country,
                    model = %model.name,
                    count = summary.count,
                    "stock page parsed"
                );
                records.push(
                    StockRecord::new(
                        target.country,
                        model.name.as_str(),
                        summary.count,
                        Confidence::ExactApi,
                    )
                    .with_details(summary.details),
                );
            }
            Err(err) => {
                tracing::warn!(
                    country = target.country,
                    model = %model.name,
                    url = %url,
                    error = %err,
                    "stock query failed; skipping model"
                );
            }
        }
    }

    Ok(records)
}

/// Models listed on the landing page. The secondary path is tried first; an
/// error or an empty model list there falls back to the base URL.
async fn landing_models<F: Fetch>(
    fetcher: &F,
    target: &StructuredTarget<'_>,
) -> Result<Vec<ModelRef>, ExtractError> {
    if let Some(path) = target.landing_path {
        let url = format!("{}{path}", target.base_url.trim_end_matches('/'));
        match fetch_models(fetcher, &url).await {
            Ok(models) if !models.is_empty() => return Ok(models),
            Ok(_) => tracing::debug!(
                country = target.country,
                url = %url,
                "landing path lists no models; falling back to base url"
            ),
            Err(err) => tracing::debug!(
                country = target.country,
                url = %url,
                error = %err,
                "landing path unusable; falling back to base url"
            ),
        }
    }

    let models = fetch_models(fetcher, target.base_url).await?;
    if models.is_empty() {
        return Err(ExtractError::NoSignal);
    }
    Ok(models)
}

async fn fetch_models<F: Fetch>(fetcher: &F, url: &str) -> Result<Vec<ModelRef>, ExtractError> {
    let payload = fetch_payload(fetcher, url).await?;
    Ok(unique_model_refs(collect_model_refs(&payload)))
}

async fn fetch_payload<F: Fetch>(fetcher: &F, url: &str) -> Result<Value, ExtractError> {
    let html = fetcher.fetch(url).await?;
    extract_embedded_payload(&html, url)
}

async fn fetch_stock<F: Fetch>(fetcher: &F, url: &str) -> Result<StockSummary, ExtractError> {
    let payload = fetch_payload(fetcher, url).await?;
    Ok(parse_stock_payload(&payload))
}

/// Build `{base}/stock/{model}/{body}?channel=b2c&latitude=..&longitude=..`.
///
/// Returns `None` if `base_url` is not an absolute URL that can carry a path.
#[must_use]
pub fn stock_url(base_url: &str, model: &ModelRef, latitude: f64, longitude: f64) -> Option<String> {
    let mut url = reqwest::Url::parse(base_url).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push("stock")
        .push(&model.model_id)
        .push(&model.body_style_id);
    url.query_pairs_mut()
        .append_pair("channel", CHANNEL_B2C)
        .append_pair("latitude", &latitude.to_string())
        .append_pair("longitude", &longitude.to_string());
    Some(url.to_string())
}
