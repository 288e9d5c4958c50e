//! Tag-attribute counting for storefronts that render one tagged element per
//! vehicle in stock.

use regex::Regex;

/// Count case-insensitive occurrences of `attribute="model"` (either quote).
#[must_use]
pub fn count_attribute_tags(html: &str, attribute: &str, model: &str) -> usize {
    let pattern = format!(
        r#"(?i){}\s*=\s*['"]{}['"]"#,
        regex::escape(attribute),
        regex::escape(model)
    );
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(html).count(),
        Err(err) => {
            tracing::warn!(attribute, model, error = %err, "attribute pattern rejected");
            0
        }
    }
}
