//! Tab-separated and JSON export of a finished scan.
//!
//! Layout of an export directory:
//!
//! - `stocks.tsv`: every record, one row each
//! - `totals.tsv`: summed stock per country
//! - `countries/<section>.tsv`: the records of one country
//! - `scan.json`: the full record sequence

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dsstock_core::{country_totals, section_names, StockRecord};

const RECORD_HEADERS: [&str; 5] = ["country", "model", "stock", "confidence", "details"];
const TOTAL_HEADERS: [&str; 2] = ["country", "stock"];

/// `DS_Stocks_Europe_YYYY-MM-DD` for the given day.
pub(crate) fn default_out_dir(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("DS_Stocks_Europe_{}", date.format("%Y-%m-%d")))
}

/// Write every export file into `dir`, creating it if needed.
///
/// Returns the paths written, in write order.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or a file cannot be
/// written.
pub(crate) fn write_export(dir: &Path, records: &[StockRecord]) -> anyhow::Result<Vec<PathBuf>> {
    let countries_dir = dir.join("countries");
    std::fs::create_dir_all(&countries_dir)?;

    let mut written = Vec::new();
    let mut write = |path: PathBuf, contents: String| -> anyhow::Result<()> {
        std::fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), "export file written");
        written.push(path);
        Ok(())
    };

    write(dir.join("stocks.tsv"), render_records(records))?;

    let totals = country_totals(records);
    write(dir.join("totals.tsv"), render_totals(&totals))?;

    let names = section_names(totals.iter().map(|(c, _)| c.as_str()));
    for ((country, _), name) in totals.iter().zip(names) {
        let rows: Vec<StockRecord> = records
            .iter()
            .filter(|r| &r.country == country)
            .cloned()
            .collect();
        write(countries_dir.join(format!("{name}.tsv")), render_records(&rows))?;
    }

    write(dir.join("scan.json"), serde_json::to_string_pretty(records)?)?;

    Ok(written)
}

pub(crate) fn render_records(records: &[StockRecord]) -> String {
    let rows = records.iter().map(|r| {
        vec![
            r.country.clone(),
            r.model.clone(),
            r.stock.to_string(),
            r.confidence.as_str().to_string(),
            r.details.clone(),
        ]
    });
    to_tsv(&RECORD_HEADERS, rows)
}

pub(crate) fn render_totals(totals: &[(String, u64)]) -> String {
    let rows = totals
        .iter()
        .map(|(country, stock)| vec![country.clone(), stock.to_string()]);
    to_tsv(&TOTAL_HEADERS, rows)
}

fn to_tsv<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = headers.join("\t");
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row.iter().map(|f| clean_field(f)).collect();
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

/// Tabs and line breaks would split a field; flatten them to spaces.
fn clean_field(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}
