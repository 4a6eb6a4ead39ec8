//! Loose record shape accepted from imports and the typed conversion into
//! [`LedgerEntry`].
//!
//! This is the only place where absent or malformed fields are coerced:
//! amounts fall back to `0`, categories to [`Category::Other`], and records
//! whose date cannot be read are skipped and reported instead of ordered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{category::Category, entry::LedgerEntry};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Record as it arrives from an external source, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub income: Option<Value>,
    #[serde(default)]
    pub expense: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RawEntry {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    pub fn with_amounts(mut self, income: impl Into<Value>, expense: impl Into<Value>) -> Self {
        self.income = Some(income.into());
        self.expense = Some(expense.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Converts the record into a typed entry.
    ///
    /// Amount and category problems are coerced and described in the returned
    /// notes; an unreadable date rejects the record.
    pub fn into_entry(self, stamp: DateTime<Utc>) -> Result<Coerced, SkipReason> {
        let mut notes = Vec::new();
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => return Err(SkipReason::MissingDate),
            Some(text) => parse_date(text).ok_or_else(|| SkipReason::InvalidDate(text.into()))?,
        };

        let income = coerce_amount("income", self.income.as_ref(), &mut notes);
        let expense = coerce_amount("expense", self.expense.as_ref(), &mut notes);

        let category = match self.category.as_deref() {
            None => Category::Other,
            Some(text) => Category::parse(text).unwrap_or_else(|| {
                if !text.trim().is_empty() {
                    notes.push(format!("unknown category `{}` stored as Other", text.trim()));
                }
                Category::Other
            }),
        };

        let mut entry = LedgerEntry::new(date, income, expense, category).with_timestamps(stamp);
        entry.set_description(self.description);
        Ok(Coerced { entry, notes })
    }
}

/// Entry produced from a raw record together with any coercion notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub entry: LedgerEntry,
    pub notes: Vec<String>,
}

/// Why a raw record could not become an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingDate,
    InvalidDate(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingDate => f.write_str("missing date"),
            SkipReason::InvalidDate(value) => write!(f, "unreadable date `{value}`"),
        }
    }
}

/// A rejected record and its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of converting a batch of raw records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub entries: Vec<LedgerEntry>,
    pub skipped: Vec<SkippedRecord>,
    pub notes: Vec<String>,
}

impl IngestReport {
    /// Converts every record, keeping input order for accepted entries.
    pub fn from_raw(raws: Vec<RawEntry>, stamp: DateTime<Utc>) -> Self {
        let mut report = IngestReport::default();
        for (index, raw) in raws.into_iter().enumerate() {
            match raw.into_entry(stamp) {
                Ok(Coerced { entry, notes }) => {
                    report
                        .notes
                        .extend(notes.into_iter().map(|note| format!("record {index}: {note}")));
                    report.entries.push(entry);
                }
                Err(reason) => report.skipped.push(SkippedRecord { index, reason }),
            }
        }
        report
    }

    pub fn accepted(&self) -> usize {
        self.entries.len()
    }
}

/// Reads `YYYY-MM-DD`, also accepting timestamps that start with one
/// (`2024-01-05T00:00:00.000Z`, `2024-01-05 10:00:00`).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    let prefix = text.get(..10)?;
    match text.as_bytes().get(10) {
        Some(b'T') | Some(b't') | Some(b' ') => NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok(),
        _ => None,
    }
}

/// Numeric coercion for amount fields: numbers and numeric strings are read,
/// anything else is `0`. Negative or non-finite values become `0`.
pub fn coerce_amount(field: &str, value: Option<&Value>, notes: &mut Vec<String>) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return 0.0;
            }
            trimmed.parse::<f64>().ok()
        }
        Some(_) => None,
    };
    match parsed {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        Some(amount) if amount.is_finite() => {
            notes.push(format!("negative {field} {amount} stored as 0"));
            0.0
        }
        _ => {
            notes.push(format!("non-numeric {field} stored as 0"));
            0.0
        }
    }
}
