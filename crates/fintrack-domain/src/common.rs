//! Shared traits and calendar helpers for ledger primitives.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in an entry book.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies the income/expense pair carried by ledger records.
pub trait Amounted {
    fn income(&self) -> f64;
    fn expense(&self) -> f64;

    /// Signed contribution to a running balance.
    fn net(&self) -> f64 {
        self.income() - self.expense()
    }
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month bucket used for grouping, independent of locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Full month name, e.g. `January`.
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Three letter month abbreviation, e.g. `Jan`.
    pub fn short_name(&self) -> &'static str {
        short_month_name(self.month)
    }

    /// Long label such as `January 2024`.
    pub fn long_label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Compact label such as `Jan 2024`.
    pub fn short_label(&self) -> String {
        format!("{} {}", self.short_name(), self.year)
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        MonthKey::from_date(date)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Displayable for MonthKey {
    fn display_label(&self) -> String {
        self.long_label()
    }
}

/// Returns the English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    let idx = month.clamp(1, 12) as usize - 1;
    MONTH_NAMES[idx]
}

/// Returns the three letter abbreviation for a 1-based month number.
pub fn short_month_name(month: u32) -> &'static str {
    &month_name(month)[..3]
}

/// Short day label such as `Jan 5`.
pub fn short_day_label(date: NaiveDate) -> String {
    format!("{} {}", short_month_name(date.month()), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_formats_as_year_month() {
        let key = MonthKey::from_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(key.to_string(), "2024-02");
        assert_eq!(key.long_label(), "February 2024");
        assert_eq!(key.short_label(), "Feb 2024");
    }

    #[test]
    fn month_keys_order_chronologically() {
        let dec = MonthKey::new(2023, 12);
        let jan = MonthKey::new(2024, 1);
        assert!(dec < jan);
    }

    #[test]
    fn short_day_label_drops_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(short_day_label(date), "Jan 5");
    }
}
