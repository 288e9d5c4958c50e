//! Site-wide totals from pagination and result counters.

use std::sync::LazyLock;

use regex::Regex;

/// Captured totals at or above this are treated as mis-captures (years,
/// prices, phone fragments) and ignored.
pub const SITE_TOTAL_UPPER_BOUND: u32 = 5000;

/// Nouns that follow a result or vehicle count.
const COUNT_NOUNS: &str = r"results?|r[ée]sultats?|voertuigen|fahrzeugen?|v[ée]hicules|veicoli|veh[íi]culos|ve[íi]culos|samochod(?:y|[óo]w)";

/// Tried in order; the first pattern producing an in-bound total wins.
///
/// A bare "<n> di <m>" is too loose ("7 di 2024"), so the connective form
/// needs a leading `1`, a range, or a trailing count noun.
static PAGINATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "1 sur 23", "1-12 of 240", "13 - 24 von 57", "1 di 30", "1 van 12"
        r"(?i)\b(?:1|\d+\s*[-–]\s*\d+)\s*(?:sur|of|von|di|van)\s+(\d+)\b".to_string(),
        // "12 di 57 veicoli", "13 sur 40 véhicules"
        format!(r"(?i)\b\d+\s+(?:sur|of|von|di|van)\s+(\d+)\s+(?:{COUNT_NOUNS})\b"),
        // "23 résultats", "240 results", "12 voertuigen", "57 Fahrzeuge"
        format!(r"(?i)\b(\d+)\s+(?:{COUNT_NOUNS})\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Largest in-bound total captured by the first productive pattern.
#[must_use]
pub fn site_total(html: &str) -> Option<u32> {
    PAGINATION_PATTERNS.iter().find_map(|re| {
        re.captures_iter(html)
            .filter_map(|cap| cap.get(1)?.as_str().parse::<u32>().ok())
            .filter(|n| *n < SITE_TOTAL_UPPER_BOUND)
            .max()
    })
}
