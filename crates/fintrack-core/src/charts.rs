//! Chart datasets (labels plus numeric series) built from a derived view.
//!
//! Rendering is left to whatever charting front end consumes these values.

use fintrack_domain::{short_day_label, short_month_name, Amounted, Category, DerivedView, Displayable};
use chrono::Datelike;
use serde::Serialize;

pub const INCOME_COLOR: &str = "#11998e";
pub const EXPENSE_COLOR: &str = "#eb3349";

/// Colours assigned to categorical slices, reused in order.
pub const PALETTE: [&str; 10] = [
    "#667eea", "#764ba2", "#11998e", "#eb3349", "#f45c43", "#4facfe", "#fa709a", "#fee140",
    "#38ef7d", "#00f2fe",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub colors: Vec<String>,
}

impl Dataset {
    fn series(label: &str, data: Vec<f64>, color: &str) -> Self {
        Self {
            label: label.to_string(),
            data,
            colors: vec![color.to_string()],
        }
    }

    fn slices(label: &str, data: Vec<f64>) -> Self {
        let colors = (0..data.len())
            .map(|idx| PALETTE[idx % PALETTE.len()].to_string())
            .collect();
        Self {
            label: label.to_string(),
            data,
            colors,
        }
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|set| set.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub struct ChartService;

impl ChartService {
    /// Income and expense per entry, in chronological order.
    pub fn trend(view: &DerivedView) -> ChartData {
        let rows = &view.ordered_entries;
        ChartData {
            kind: ChartKind::Line,
            title: "Income vs Expense Trend".into(),
            labels: rows.iter().map(|row| short_day_label(row.entry.date)).collect(),
            datasets: vec![
                Dataset::series(
                    "Income",
                    rows.iter().map(|row| row.entry.income()).collect(),
                    INCOME_COLOR,
                ),
                Dataset::series(
                    "Expense",
                    rows.iter().map(|row| row.entry.expense()).collect(),
                    EXPENSE_COLOR,
                ),
            ],
        }
    }

    /// Monthly income and expense sums, one bar pair per month group.
    pub fn monthly_comparison(view: &DerivedView) -> ChartData {
        let totals: Vec<_> = view.monthly_groups.iter().map(|group| group.totals()).collect();
        ChartData {
            kind: ChartKind::Bar,
            title: "Monthly Comparison".into(),
            labels: view
                .monthly_groups
                .iter()
                .map(|group| group.month.short_label())
                .collect(),
            datasets: vec![
                Dataset::series(
                    "Income",
                    totals.iter().map(|t| t.income).collect(),
                    INCOME_COLOR,
                ),
                Dataset::series(
                    "Expense",
                    totals.iter().map(|t| t.expense).collect(),
                    EXPENSE_COLOR,
                ),
            ],
        }
    }

    /// Expense share per category; categories without spending are left out.
    pub fn expense_breakdown(view: &DerivedView) -> ChartData {
        let slices: Vec<(Category, f64)> = view
            .category_totals
            .iter()
            .filter(|(_, totals)| totals.expense > 0.0)
            .map(|(category, totals)| (*category, totals.expense))
            .collect();
        Self::categorical(ChartKind::Doughnut, "Expense Breakdown", slices)
    }

    /// Combined income + expense volume per category.
    pub fn category_distribution(view: &DerivedView) -> ChartData {
        let slices: Vec<(Category, f64)> = view
            .category_totals
            .iter()
            .map(|(category, totals)| (*category, totals.income + totals.expense))
            .collect();
        Self::categorical(ChartKind::Pie, "Category Distribution", slices)
    }

    /// Twelve fixed month bins (Jan..Dec); entries from different years share a bin.
    pub fn calendar_months(view: &DerivedView) -> ChartData {
        let mut income = vec![0.0; 12];
        let mut expense = vec![0.0; 12];
        for row in &view.ordered_entries {
            let idx = row.entry.date.month0() as usize;
            income[idx] += row.entry.income();
            expense[idx] += row.entry.expense();
        }
        ChartData {
            kind: ChartKind::Bar,
            title: "Income and Expenses by Month".into(),
            labels: (1..=12).map(|m| short_month_name(m).to_string()).collect(),
            datasets: vec![
                Dataset::series("Income", income, INCOME_COLOR),
                Dataset::series("Expense", expense, EXPENSE_COLOR),
            ],
        }
    }

    fn categorical(kind: ChartKind, title: &str, slices: Vec<(Category, f64)>) -> ChartData {
        let labels = slices
            .iter()
            .map(|(category, _)| category.display_label())
            .collect();
        let data = slices.into_iter().map(|(_, value)| value).collect();
        ChartData {
            kind,
            title: title.into(),
            labels,
            datasets: vec![Dataset::slices(title, data)],
        }
    }
}
