//! Read-only projections derived from an entry collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    category::{Category, CategoryFilter},
    common::{Amounted, MonthKey},
    entry::LedgerEntry,
};

/// An entry paired with the running balance after applying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedEntry {
    pub entry: LedgerEntry,
    pub balance: f64,
}

/// Income and expense sums for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub income: f64,
    pub expense: f64,
}

impl CategoryTotals {
    pub fn add<T: Amounted>(&mut self, item: &T) {
        self.income += item.income();
        self.expense += item.expense();
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Entries of one calendar month, each keeping its global running balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGroup {
    pub month: MonthKey,
    pub entries: Vec<BalancedEntry>,
}

impl MonthGroup {
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            entries: Vec::new(),
        }
    }

    pub fn totals(&self) -> CategoryTotals {
        let mut totals = CategoryTotals::default();
        for row in &self.entries {
            totals.add(&row.entry);
        }
        totals
    }

    /// Balance after the last entry of the month.
    pub fn closing_balance(&self) -> Option<f64> {
        self.entries.last().map(|row| row.balance)
    }
}

/// Global totals for an entry set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub count: usize,
}

/// Everything the presentation layer renders for one state of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    pub filter: CategoryFilter,
    pub ordered_entries: Vec<BalancedEntry>,
    pub monthly_groups: Vec<MonthGroup>,
    pub category_totals: BTreeMap<Category, CategoryTotals>,
    pub summary: LedgerSummary,
}

impl DerivedView {
    pub fn is_empty(&self) -> bool {
        self.ordered_entries.is_empty()
    }

    pub fn balances(&self) -> Vec<f64> {
        self.ordered_entries.iter().map(|row| row.balance).collect()
    }

    pub fn group(&self, month: MonthKey) -> Option<&MonthGroup> {
        self.monthly_groups.iter().find(|group| group.month == month)
    }
}

/// Per-month totals as reported by the monthly summary listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummaryRow {
    pub month: MonthKey,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
}
