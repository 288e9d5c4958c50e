//! schema.org offer catalogs published for SEO.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSONLD_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// Item count of the first non-empty `hasOfferCatalog.itemListElement` found
/// in the page's JSON-LD blocks. Unparsable blocks are skipped.
#[must_use]
pub fn offer_catalog_count(html: &str) -> Option<u32> {
    for cap in JSONLD_SCRIPT_RE.captures_iter(html) {
        let Some(json_text) = cap.get(1) else {
            continue;
        };
        let value: Value = match serde_json::from_str(json_text.as_str().trim()) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unparsable JSON-LD block");
                continue;
            }
        };

        // Accept top-level object, array, or @graph container.
        let mut candidates: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        let graph: Vec<&Value> = candidates
            .iter()
            .filter_map(|item| item.get("@graph").and_then(Value::as_array))
            .flatten()
            .collect();
        candidates.extend(graph);

        for item in candidates {
            let count = item
                .get("hasOfferCatalog")
                .and_then(|catalog| catalog.get("itemListElement"))
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            if count > 0 {
                return Some(u32::try_from(count).unwrap_or(u32::MAX));
            }
        }
    }
    None
}
