//! Derivation of the dashboard views from a flat entry collection.
//!
//! Every function here is pure: inputs are borrowed, never mutated, and the
//! same input always yields the same output. Views are rebuilt from scratch
//! whenever the collection changes.

use std::collections::BTreeMap;

use fintrack_domain::{
    Amounted, BalancedEntry, Category, CategoryFilter, CategoryTotals, DerivedView, LedgerEntry,
    LedgerSummary, MonthGroup, MonthKey,
};
use tracing::debug;

/// Stateless aggregation over ledger entries.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Returns the entries ordered by ascending date.
    ///
    /// The sort is stable: entries sharing a date keep their input order.
    pub fn sort_chronological(entries: &[LedgerEntry]) -> Vec<LedgerEntry> {
        let mut ordered = entries.to_vec();
        ordered.sort_by_key(|entry| entry.date);
        ordered
    }

    /// Pairs each entry with the cumulative `income - expense` up to and including it.
    pub fn compute_running_balance(ordered: &[LedgerEntry]) -> Vec<BalancedEntry> {
        let mut balance = 0.0;
        ordered
            .iter()
            .map(|entry| {
                balance += entry.net();
                BalancedEntry {
                    entry: entry.clone(),
                    balance,
                }
            })
            .collect()
    }

    /// Splits balanced rows into calendar months, in first-appearance order.
    ///
    /// Rows keep the balance computed over the whole sequence; it does not
    /// restart at month boundaries.
    pub fn group_by_month(balanced: &[BalancedEntry]) -> Vec<MonthGroup> {
        let mut groups: Vec<MonthGroup> = Vec::new();
        for row in balanced {
            let key = MonthKey::from_date(row.entry.date);
            let idx = match groups.iter().position(|group| group.month == key) {
                Some(idx) => idx,
                None => {
                    groups.push(MonthGroup::new(key));
                    groups.len() - 1
                }
            };
            groups[idx].entries.push(row.clone());
        }
        groups
    }

    /// Sums income and expense per category.
    pub fn aggregate_by_category(entries: &[LedgerEntry]) -> BTreeMap<Category, CategoryTotals> {
        let mut totals: BTreeMap<Category, CategoryTotals> = BTreeMap::new();
        for entry in entries {
            totals.entry(entry.category).or_default().add(entry);
        }
        totals
    }

    /// Keeps entries matching the selector; `All` returns the input unchanged.
    pub fn filter_by_category(entries: &[LedgerEntry], filter: CategoryFilter) -> Vec<LedgerEntry> {
        match filter {
            CategoryFilter::All => entries.to_vec(),
            CategoryFilter::Only(_) => entries
                .iter()
                .filter(|entry| filter.matches(entry.category))
                .cloned()
                .collect(),
        }
    }

    pub fn compute_summary(entries: &[LedgerEntry]) -> LedgerSummary {
        let mut totals = CategoryTotals::default();
        for entry in entries {
            totals.add(entry);
        }
        LedgerSummary {
            total_income: totals.income,
            total_expense: totals.expense,
            balance: totals.net(),
            count: entries.len(),
        }
    }

    /// Builds the complete view for an optional category selection.
    ///
    /// An active filter is applied first, so running balances, month groups,
    /// category totals and the summary all describe the filtered subset.
    pub fn derive(entries: &[LedgerEntry], filter: CategoryFilter) -> DerivedView {
        let selected = Self::filter_by_category(entries, filter);
        let ordered = Self::sort_chronological(&selected);
        let balanced = Self::compute_running_balance(&ordered);
        let monthly_groups = Self::group_by_month(&balanced);
        let category_totals = Self::aggregate_by_category(&selected);
        let summary = Self::compute_summary(&selected);
        debug!(
            filter = %filter,
            entries = entries.len(),
            selected = summary.count,
            months = monthly_groups.len(),
            "derived ledger view"
        );
        DerivedView {
            filter,
            ordered_entries: balanced,
            monthly_groups,
            category_totals,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn entry(date: &str, income: f64, expense: f64, category: Category) -> LedgerEntry {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        LedgerEntry::new(date, income, expense, category)
    }

    fn scenario() -> Vec<LedgerEntry> {
        vec![
            entry("2024-01-05", 0.0, 50.0, Category::Food),
            entry("2024-01-20", 1000.0, 0.0, Category::Salary),
            entry("2024-02-01", 0.0, 200.0, Category::Bills),
        ]
    }

    #[test]
    fn scenario_balances_groups_and_totals() {
        let entries = scenario();
        let view = LedgerAggregator::derive(&entries, CategoryFilter::All);

        let ids: Vec<_> = view.ordered_entries.iter().map(|row| row.entry.id).collect();
        let expected: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(view.balances(), vec![-50.0, 950.0, 750.0]);

        assert_eq!(view.monthly_groups.len(), 2);
        let january = &view.monthly_groups[0];
        assert_eq!(january.month.to_string(), "2024-01");
        assert_eq!(january.entries.len(), 2);
        assert_eq!(january.entries[1].balance, 950.0);
        let february = &view.monthly_groups[1];
        assert_eq!(february.month.to_string(), "2024-02");
        assert_eq!(february.entries[0].balance, 750.0);

        assert_eq!(
            view.category_totals[&Category::Food],
            CategoryTotals {
                income: 0.0,
                expense: 50.0
            }
        );
        assert_eq!(view.category_totals[&Category::Salary].income, 1000.0);
        assert_eq!(view.category_totals[&Category::Bills].expense, 200.0);
        assert_eq!(view.category_totals.len(), 3);

        assert_eq!(
            view.summary,
            LedgerSummary {
                total_income: 1000.0,
                total_expense: 250.0,
                balance: 750.0,
                count: 3
            }
        );
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let first = entry("2024-03-10", 10.0, 0.0, Category::Other);
        let second = entry("2024-03-10", 0.0, 4.0, Category::Food);
        let earlier = entry("2024-03-01", 1.0, 0.0, Category::Other);
        let ordered = LedgerAggregator::sort_chronological(&[
            first.clone(),
            second.clone(),
            earlier.clone(),
        ]);
        assert_eq!(ordered[0].id, earlier.id);
        assert_eq!(ordered[1].id, first.id);
        assert_eq!(ordered[2].id, second.id);
    }

    #[test]
    fn balance_carries_across_months() {
        let entries = vec![
            entry("2024-01-31", 100.0, 0.0, Category::Salary),
            entry("2024-02-01", 0.0, 30.0, Category::Food),
        ];
        let view = LedgerAggregator::derive(&entries, CategoryFilter::All);
        assert_eq!(view.monthly_groups[1].entries[0].balance, 70.0);
        assert_eq!(view.monthly_groups[0].closing_balance(), Some(100.0));
    }

    #[test]
    fn groups_follow_chronology_not_input_order() {
        let entries = vec![
            entry("2024-03-02", 0.0, 1.0, Category::Other),
            entry("2023-12-24", 0.0, 2.0, Category::Other),
            entry("2024-03-01", 0.0, 3.0, Category::Other),
        ];
        let view = LedgerAggregator::derive(&entries, CategoryFilter::All);
        let months: Vec<String> = view
            .monthly_groups
            .iter()
            .map(|group| group.month.to_string())
            .collect();
        assert_eq!(months, vec!["2023-12", "2024-03"]);
    }

    #[test]
    fn active_filter_recomputes_balance_over_subset() {
        let entries = scenario();
        let view = LedgerAggregator::derive(&entries, CategoryFilter::Only(Category::Bills));
        assert_eq!(view.balances(), vec![-200.0]);
        assert_eq!(view.summary.count, 1);
        assert_eq!(view.summary.balance, -200.0);
        assert_eq!(view.category_totals.len(), 1);
        assert_eq!(view.monthly_groups.len(), 1);
    }

    #[test]
    fn filter_all_is_identity() {
        let entries = scenario();
        let filtered = LedgerAggregator::filter_by_category(&entries, CategoryFilter::All);
        assert_eq!(filtered, entries);
    }

    #[test]
    fn empty_input_yields_empty_view() {
        let view = LedgerAggregator::derive(&[], CategoryFilter::All);
        assert!(view.is_empty());
        assert!(view.monthly_groups.is_empty());
        assert!(view.category_totals.is_empty());
        assert_eq!(view.summary, LedgerSummary::default());
    }

    #[test]
    fn derive_is_idempotent() {
        let entries = scenario();
        let first = LedgerAggregator::derive(&entries, CategoryFilter::All);
        let second = LedgerAggregator::derive(&entries, CategoryFilter::All);
        assert_eq!(first, second);
    }

    #[test]
    fn running_balance_leaves_input_untouched() {
        let entries = scenario();
        let snapshot = entries.clone();
        let _ = LedgerAggregator::compute_running_balance(&entries);
        assert_eq!(entries, snapshot);
    }
}
