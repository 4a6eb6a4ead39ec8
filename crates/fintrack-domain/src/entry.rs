//! Domain model for a single income/expense ledger entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::*};

/// One recorded financial event.
///
/// Amounts are unsigned; direction is carried by which field is populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expense: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(date: NaiveDate, income: f64, expense: f64, category: Category) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            date,
            income,
            expense,
            category,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(Some(description.into()));
        self
    }

    pub fn with_timestamps(mut self, stamp: DateTime<Utc>) -> Self {
        self.created_at = stamp;
        self.updated_at = stamp;
        self
    }

    /// Stores the description, collapsing blank text to `None`.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
    }

    /// Description text or the `-` placeholder.
    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or("-")
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    /// Copies the editable fields of a validated draft onto this entry.
    pub fn apply(&mut self, draft: &ValidDraft, stamp: DateTime<Utc>) {
        self.date = draft.date;
        self.income = draft.income;
        self.expense = draft.expense;
        self.category = draft.category;
        self.set_description(draft.description.clone());
        self.updated_at = stamp;
    }
}

impl Identifiable for LedgerEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for LedgerEntry {
    fn income(&self) -> f64 {
        self.income
    }

    fn expense(&self) -> f64 {
        self.expense
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        format!("entry:{} [{} {}]", self.id, self.date, self.category)
    }
}

/// User-supplied values for creating or editing an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub date: Option<NaiveDate>,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
}

impl EntryDraft {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn income(mut self, amount: f64) -> Self {
        self.income = Some(amount);
        self
    }

    pub fn expense(mut self, amount: f64) -> Self {
        self.expense = Some(amount);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Pre-fills a draft from an existing entry, used by edit flows.
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        Self {
            date: Some(entry.date),
            income: Some(entry.income),
            expense: Some(entry.expense),
            category: Some(entry.category),
            description: entry.description.clone(),
        }
    }

    /// Checks required fields and fills defaults.
    pub fn validate(&self) -> Result<ValidDraft, DraftError> {
        let date = self.date.ok_or(DraftError::MissingDate)?;
        let income = checked_amount("income", self.income.unwrap_or(0.0))?;
        let expense = checked_amount("expense", self.expense.unwrap_or(0.0))?;
        Ok(ValidDraft {
            date,
            income,
            expense,
            category: self.category.unwrap_or_default(),
            description: self.description.clone(),
        })
    }
}

/// Draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
    pub category: Category,
    pub description: Option<String>,
}

impl ValidDraft {
    pub fn into_entry(self, stamp: DateTime<Utc>) -> LedgerEntry {
        let mut entry =
            LedgerEntry::new(self.date, self.income, self.expense, self.category)
                .with_timestamps(stamp);
        entry.set_description(self.description);
        entry
    }
}

/// Reasons a draft is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftError {
    MissingDate,
    InvalidAmount { field: &'static str, value: f64 },
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::MissingDate => f.write_str("date is required"),
            DraftError::InvalidAmount { field, value } => {
                write!(f, "{field} must be a non-negative number (got {value})")
            }
        }
    }
}

impl std::error::Error for DraftError {}

fn checked_amount(field: &'static str, value: f64) -> Result<f64, DraftError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DraftError::InvalidAmount { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn draft_requires_date() {
        let err = EntryDraft::default().income(10.0).validate().unwrap_err();
        assert_eq!(err, DraftError::MissingDate);
        assert_eq!(err.to_string(), "date is required");
    }

    #[test]
    fn draft_defaults_amounts_and_category() {
        let valid = EntryDraft::on(date(2024, 3, 1)).validate().unwrap();
        assert_eq!(valid.income, 0.0);
        assert_eq!(valid.expense, 0.0);
        assert_eq!(valid.category, Category::Other);
    }

    #[test]
    fn draft_rejects_negative_amounts() {
        let err = EntryDraft::on(date(2024, 3, 1))
            .expense(-5.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, DraftError::InvalidAmount { field: "expense", .. }));
    }

    #[test]
    fn blank_description_becomes_none() {
        let entry = LedgerEntry::new(date(2024, 1, 1), 0.0, 5.0, Category::Food)
            .with_description("   ");
        assert!(entry.description.is_none());
        assert_eq!(entry.description_or_placeholder(), "-");
    }
}
