//! Shaping helpers for exporters: per-country aggregates, headline metrics,
//! and section names that fit spreadsheet limits.

use std::collections::HashSet;

use crate::records::StockRecord;

/// Longest section (sheet) name most spreadsheet formats accept.
pub const SECTION_NAME_MAX_CHARS: usize = 31;

/// Characters spreadsheet formats refuse in sheet names.
const FORBIDDEN_SECTION_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Sum of stock per country, in the order countries first appear.
#[must_use]
pub fn country_totals(records: &[StockRecord]) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    for record in records {
        match totals.iter_mut().find(|(c, _)| *c == record.country) {
            Some((_, sum)) => *sum += u64::from(record.stock),
            None => totals.push((record.country.clone(), u64::from(record.stock))),
        }
    }
    totals
}

/// Headline metrics over a full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub total_stock: u64,
    /// Country with the largest summed stock; ties go to the first seen.
    pub top_country: Option<String>,
    pub countries: usize,
}

impl ScanSummary {
    #[must_use]
    pub fn from_records(records: &[StockRecord]) -> Self {
        let totals = country_totals(records);
        let total_stock = totals.iter().map(|(_, n)| n).sum();

        let mut top: Option<&(String, u64)> = None;
        for entry in &totals {
            if top.is_none_or(|best| entry.1 > best.1) {
                top = Some(entry);
            }
        }

        Self {
            total_stock,
            top_country: top.map(|(c, _)| c.clone()),
            countries: totals.len(),
        }
    }
}

/// Derive one section name per input country.
///
/// Names are sanitised, truncated to [`SECTION_NAME_MAX_CHARS`] characters,
/// and made unique (case-insensitively) by replacing the tail with `~2`,
/// `~3`, and so on when truncation makes two countries collide.
#[must_use]
pub fn section_names<'a, I>(countries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for country in countries {
        let base: String = country
            .trim()
            .chars()
            .map(|c| {
                if FORBIDDEN_SECTION_CHARS.contains(&c) {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        let base = if base.is_empty() {
            "Sheet".to_string()
        } else {
            base
        };

        let mut candidate = truncate_chars(&base, SECTION_NAME_MAX_CHARS);
        let mut n = 2usize;
        while used.contains(&candidate.to_lowercase()) {
            let suffix = format!("~{n}");
            let keep = SECTION_NAME_MAX_CHARS.saturating_sub(suffix.chars().count());
            candidate = format!("{}{suffix}", truncate_chars(&base, keep));
            n += 1;
        }

        used.insert(candidate.to_lowercase());
        names.push(candidate);
    }

    names
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
