use std::collections::BTreeMap;

use fintrack_domain::{CategoryTotals, LedgerEntry, MonthKey, MonthlySummaryRow};

pub struct ReportService;

impl ReportService {
    /// Per-month income, expense and net, most recent month first.
    pub fn monthly_summary(entries: &[LedgerEntry]) -> Vec<MonthlySummaryRow> {
        let mut months: BTreeMap<MonthKey, CategoryTotals> = BTreeMap::new();
        for entry in entries {
            months.entry(entry.month()).or_default().add(entry);
        }
        months
            .into_iter()
            .rev()
            .map(|(month, totals)| MonthlySummaryRow {
                month,
                total_income: totals.income,
                total_expense: totals.expense,
                net_balance: totals.net(),
            })
            .collect()
    }
}
