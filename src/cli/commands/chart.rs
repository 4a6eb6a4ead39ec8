use crossterm::terminal;
use fintrack_core::{ChartData, ChartKind, ChartService, CurrencyFormatter};

use crate::cli::commands::subcommand;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::CliFormatters;
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

const USAGE: &str = "chart <trend|monthly|expenses|distribution|calendar> [--json]";
const FALLBACK_COLUMNS: u16 = 80;
const GLYPHS: [char; 2] = ['█', '░'];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "chart",
        "Chart datasets rendered as text bars",
        USAGE,
        cmd_chart,
    )
    .with_subcommands(&["trend", "monthly", "expenses", "distribution", "calendar"])]
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = subcommand(args, USAGE)?;
    let view = context.manager.view(context.filter)?;
    let chart = match kind.as_str() {
        "trend" => ChartService::trend(&view),
        "monthly" => ChartService::monthly_comparison(&view),
        "expenses" | "breakdown" => ChartService::expense_breakdown(&view),
        "distribution" => ChartService::category_distribution(&view),
        "calendar" => ChartService::calendar_months(&view),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown chart `{other}`"
            )))
        }
    };
    if args.get(1).is_some_and(|flag| flag.eq_ignore_ascii_case("--json")) {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }
    if chart.is_empty() {
        io::print_info("Nothing to chart yet.");
        return Ok(());
    }
    let table = chart_table(&chart, &context.formatters(), bar_width());
    TableRenderer::render(&table);
    Ok(())
}

/// Space left for bars once labels and amounts are printed.
fn bar_width() -> usize {
    let columns = terminal::size()
        .map(|(columns, _)| columns)
        .unwrap_or(FALLBACK_COLUMNS);
    (columns as usize).saturating_sub(48).clamp(10, 60)
}

fn chart_table(chart: &ChartData, formatters: &CliFormatters, bar_width: usize) -> Table {
    let sliced = matches!(chart.kind, ChartKind::Pie | ChartKind::Doughnut);
    let mut columns = vec![TableColumn::left("")];
    for dataset in &chart.datasets {
        columns.push(TableColumn::right(dataset.label.clone()));
    }
    if sliced {
        columns.push(TableColumn::right("Share"));
    }
    columns.push(TableColumn::left(""));
    let mut table = Table::new(Some(chart.title.as_str()), columns);

    let peak = chart
        .datasets
        .iter()
        .flat_map(|dataset| dataset.data.iter().copied())
        .fold(0.0_f64, f64::max);
    let total = chart.datasets.first().map(|dataset| dataset.total()).unwrap_or(0.0);

    for (idx, label) in chart.labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        let mut bars = Vec::new();
        for (set_idx, dataset) in chart.datasets.iter().enumerate() {
            let value = dataset.data.get(idx).copied().unwrap_or(0.0);
            row.push(formatters.format_amount(value));
            let glyph = GLYPHS[set_idx % GLYPHS.len()];
            bars.push(bar(value, peak, bar_width, glyph));
        }
        if sliced {
            let value = chart.datasets.first().and_then(|set| set.data.get(idx)).copied();
            row.push(share(value.unwrap_or(0.0), total));
        }
        row.push(bars.join(" "));
        table.add_row(row);
    }
    table
}

fn bar(value: f64, peak: f64, width: usize, glyph: char) -> String {
    if peak <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / peak) * width as f64).round().max(1.0) as usize;
    std::iter::repeat(glyph).take(cells.min(width)).collect()
}

fn share(value: f64, total: f64) -> String {
    if total <= 0.0 {
        return "-".to_string();
    }
    format!("{:.1}%", value / total * 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fintrack_core::LedgerAggregator;
    use fintrack_domain::{Category, CategoryFilter, LedgerEntry};

    use super::*;

    fn sample() -> Vec<LedgerEntry> {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        vec![
            LedgerEntry::new(d(1, 5), 0.0, 50.0, Category::Food),
            LedgerEntry::new(d(1, 20), 1000.0, 0.0, Category::Salary),
            LedgerEntry::new(d(2, 1), 0.0, 200.0, Category::Bills),
        ]
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        assert_eq!(bar(1000.0, 1000.0, 20, '█').chars().count(), 20);
        assert_eq!(bar(50.0, 1000.0, 20, '█').chars().count(), 1);
        assert_eq!(bar(0.0, 1000.0, 20, '█'), "");
        assert_eq!(bar(10.0, 0.0, 20, '█'), "");
    }

    #[test]
    fn expense_breakdown_shows_shares() {
        let view = LedgerAggregator::derive(&sample(), CategoryFilter::All);
        let chart = ChartService::expense_breakdown(&view);
        let table = chart_table(&chart, &CliFormatters::default(), 20);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "₹50.00");
        assert_eq!(table.rows[0][2], "20.0%");
        assert_eq!(table.rows[1][2], "80.0%");
    }

    #[test]
    fn monthly_comparison_has_two_series() {
        let view = LedgerAggregator::derive(&sample(), CategoryFilter::All);
        let chart = ChartService::monthly_comparison(&view);
        let table = chart_table(&chart, &CliFormatters::default(), 10);
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.rows[0][0], "Jan 2024");
        assert_eq!(table.rows[0][1], "₹1,000.00");
        assert_eq!(table.rows[1][2], "₹200.00");
    }
}
