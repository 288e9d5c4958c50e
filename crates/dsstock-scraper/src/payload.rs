//! Embedded `__NEXT_DATA__` payload location and mining.
//!
//! Storefront payload shapes vary by deployment, so nothing here assumes a
//! schema beyond the two leaf shapes we look for: `{model, bodyStyle}` pairs
//! on landing pages and `props.pageProps.offers` on stock pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ExtractError;

static NEXT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*\bid\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// Nesting bound for the payload walk. Parsed JSON is a tree, so this only
/// guards against pathological depth.
pub(crate) const MAX_WALK_DEPTH: usize = 128;

/// A vehicle configuration discovered in a landing-page payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub model_id: String,
    pub body_style_id: String,
    pub name: String,
}

/// Per-model stock read from a stock-page payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StockSummary {
    pub count: u32,
    /// `"title (count)"` pairs joined by `", "`; empty when no breakdown.
    pub details: String,
}

/// Locate and parse the embedded JSON payload of a storefront page.
///
/// # Errors
///
/// - [`ExtractError::MissingPayload`] when the marker script is absent.
/// - [`ExtractError::MalformedPayload`] when its body is not JSON.
pub fn extract_embedded_payload(html: &str, url: &str) -> Result<Value, ExtractError> {
    let body = NEXT_DATA_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| ExtractError::MissingPayload {
            url: url.to_owned(),
        })?;

    serde_json::from_str(body).map_err(|source| ExtractError::MalformedPayload {
        url: url.to_owned(),
        source,
    })
}

/// Collect every `{model: {...}, bodyStyle: {...}}` pair anywhere in `payload`,
/// in document order, duplicates included.
#[must_use]
pub fn collect_model_refs(payload: &Value) -> Vec<ModelRef> {
    let mut out = Vec::new();
    walk(payload, 0, &mut out);
    out
}

fn walk(value: &Value, depth: usize, out: &mut Vec<ModelRef>) {
    if depth > MAX_WALK_DEPTH {
        tracing::debug!(depth, "payload walk depth bound reached");
        return;
    }
    match value {
        Value::Object(map) => {
            if let (Some(Value::Object(model)), Some(Value::Object(body))) =
                (map.get("model"), map.get("bodyStyle"))
            {
                if let (Some(model_id), Some(body_style_id)) = (
                    model.get("id").and_then(id_string),
                    body.get("id").and_then(id_string),
                ) {
                    out.push(ModelRef {
                        model_id,
                        body_style_id,
                        name: model
                            .get("title")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .trim()
                            .to_string(),
                    });
                }
            }
            for child in map.values() {
                walk(child, depth + 1, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                walk(child, depth + 1, out);
            }
        }
        _ => {}
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Drop untitled entries and collapse duplicates of each
/// `(model_id, body_style_id)` pair. A pair keeps the position of its first
/// occurrence and the title of its last.
#[must_use]
pub fn unique_model_refs(refs: Vec<ModelRef>) -> Vec<ModelRef> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut out: Vec<ModelRef> = Vec::new();
    for r in refs.into_iter().filter(|r| !r.name.is_empty()) {
        let key = (r.model_id.clone(), r.body_style_id.clone());
        match index.get(&key) {
            Some(&i) => out[i].name = r.name,
            None => {
                index.insert(key, out.len());
                out.push(r);
            }
        }
    }
    out
}

/// Read the offer count and fuel-type breakdown from a stock-page payload.
///
/// `offers` may be an object with a `count` field or a plain list of offers.
/// Anything else counts as zero.
#[must_use]
pub fn parse_stock_payload(payload: &Value) -> StockSummary {
    let Some(offers) = payload.pointer("/props/pageProps/offers") else {
        return StockSummary::default();
    };

    let count = match offers {
        Value::Object(map) => map.get("count").and_then(count_value).unwrap_or(0),
        Value::Array(items) => u32::try_from(items.len()).unwrap_or(u32::MAX),
        _ => 0,
    };

    let details = if count > 0 {
        offers
            .pointer("/filters/fuelTypes")
            .and_then(Value::as_array)
            .map(|energies| {
                energies
                    .iter()
                    .filter_map(|e| {
                        let title = e.get("title").and_then(Value::as_str)?;
                        let n = e.get("count").and_then(count_value)?;
                        Some(format!("{title} ({n})"))
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    } else {
        String::new()
    };

    StockSummary { count, details }
}

fn count_value(value: &Value) -> Option<u32> {
    let n = value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))?;
    Some(u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
