//! Text-proximity counting: a model name followed, within a bounded window on
//! the same line, by a domain keyword.

use regex::Regex;

/// Count non-overlapping matches of `model .{0,window} (kw1|kw2|…)`,
/// case-insensitively.
#[must_use]
pub fn count_near_keywords(html: &str, model: &str, keywords: &[String], window: usize) -> usize {
    if keywords.is_empty() {
        return 0;
    }
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i){}.{{0,{window}}}(?:{alternation})", regex::escape(model));
    count_matches(html, &pattern, model)
}

/// Count headings (`<h1>`..`<h6>`) whose text mentions `model`.
#[must_use]
pub fn count_in_headings(html: &str, model: &str) -> usize {
    let pattern = format!(
        r"(?i)<h([1-6])\b[^>]*>[^<]*{}[^<]*</h[1-6]>",
        regex::escape(model)
    );
    count_matches(html, &pattern, model)
}

fn count_matches(html: &str, pattern: &str, model: &str) -> usize {
    match Regex::new(pattern) {
        Ok(re) => re.find_iter(html).count(),
        Err(err) => {
            tracing::warn!(model, error = %err, "proximity pattern rejected");
            0
        }
    }
}
