//! CSV transfer of ledger entries.
//!
//! Columns: `date,income,expense,category,description`. Files that only carry
//! the first three columns are read as well; missing cells come through as
//! absent fields and are coerced at the ingestion boundary.

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use fintrack_domain::{LedgerEntry, RawEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoreError, LedgerAggregator};

pub const CSV_HEADER: [&str; 5] = ["date", "income", "expense", "category", "description"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    income: Option<String>,
    #[serde(default)]
    expense: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<CsvRow> for RawEntry {
    fn from(row: CsvRow) -> Self {
        RawEntry {
            date: row.date,
            income: row.income.map(Value::String),
            expense: row.expense.map(Value::String),
            category: row.category,
            description: row.description,
        }
    }
}

#[derive(Serialize)]
struct CsvOutRow<'a> {
    date: String,
    income: f64,
    expense: f64,
    category: &'a str,
    description: &'a str,
}

/// Reads every data row as a raw record. Rows are not validated here.
///
/// Header names match case-insensitively.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<RawEntry>, CoreError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers: StringRecord = rdr
        .headers()?
        .iter()
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();
    rdr.set_headers(headers);
    let mut rows = Vec::new();
    for record in rdr.deserialize::<CsvRow>() {
        rows.push(RawEntry::from(record?));
    }
    Ok(rows)
}

/// Writes entries in chronological order under the full header.
pub fn write_entries<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<usize, CoreError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    let ordered = LedgerAggregator::sort_chronological(entries);
    for entry in &ordered {
        wtr.serialize(CsvOutRow {
            date: entry.date.format("%Y-%m-%d").to_string(),
            income: entry.income,
            expense: entry.expense,
            category: entry.category.value(),
            description: entry.description.as_deref().unwrap_or(""),
        })?;
    }
    wtr.flush()?;
    Ok(ordered.len())
}

/// Writes the header row only, for users to fill in by hand.
pub fn write_template<W: Write>(writer: W) -> Result<(), CoreError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    wtr.flush()?;
    Ok(())
}
