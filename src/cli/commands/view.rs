//! Read-only dashboard commands. Every command derives a fresh view of the
//! open book through the aggregator with the shell's current filter.

use fintrack_core::{CurrencyFormatter, DateFormatter, LedgerAggregator, ReportService};
use fintrack_domain::{CategoryFilter, DerivedView, Displayable, LedgerSummary};

use crate::cli::commands::{joined, subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::CliFormatters;
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "filter",
            "Show or set the category filter applied to every view",
            "filter [All|<category>]",
            cmd_filter,
        )
        .with_subcommands(&[
            "All",
            "Food",
            "Transportation",
            "Entertainment",
            "Bills",
            "Healthcare",
            "Shopping",
            "Education",
            "Salary",
            "Investment",
            "Other",
        ]),
        CommandEntry::new(
            "view",
            "Entries grouped by month with the running balance",
            "view",
            cmd_view,
        ),
        CommandEntry::new(
            "summary",
            "Total income, expense and balance",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "Income and expense per category",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "report",
            "Tabular reports",
            "report monthly",
            cmd_report,
        )
        .with_subcommands(&["monthly"]),
    ]
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(selection) = joined(args) else {
        io::print_info(format!("Category filter: {}", context.filter));
        return Ok(());
    };
    let filter = CategoryFilter::parse(&selection).ok_or_else(|| {
        CommandError::InvalidArguments(format!("unknown category `{selection}`"))
    })?;
    context.filter = filter;
    context.last_listing.clear();
    match filter {
        CategoryFilter::All => io::print_success("Showing all categories."),
        CategoryFilter::Only(category) => {
            io::print_success(format!("Showing only {}.", category.display_label()))
        }
    }
    Ok(())
}

fn cmd_view(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.manager.view(context.filter)?;
    let formatters = context.formatters();
    if view.is_empty() {
        io::print_info(empty_message(&view));
        return Ok(());
    }
    for group in &view.monthly_groups {
        let title = group.month.long_label();
        let mut table = Table::new(
            Some(title.as_str()),
            vec![
                TableColumn::left("Date"),
                TableColumn::left("Category"),
                TableColumn::left("Description"),
                TableColumn::right("Income"),
                TableColumn::right("Expense"),
                TableColumn::right("Balance"),
            ],
        );
        for row in &group.entries {
            let entry = &row.entry;
            table.add_row(vec![
                formatters.format_date(entry.date),
                entry.category.value().to_string(),
                entry.description_or_placeholder().to_string(),
                formatters.format_optional(entry.income),
                formatters.format_optional(entry.expense),
                formatters.format_amount(row.balance),
            ]);
        }
        let totals = group.totals();
        table.add_row(vec![
            String::new(),
            String::new(),
            "Month total".to_string(),
            formatters.format_amount(totals.income),
            formatters.format_amount(totals.expense),
            formatters.format_amount(totals.net()),
        ]);
        TableRenderer::render(&table);
    }
    print_summary(&formatters, view.filter, &view.summary);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.manager.view(context.filter)?;
    print_summary(&context.formatters(), view.filter, &view.summary);
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.manager.view(context.filter)?;
    if view.category_totals.is_empty() {
        io::print_info(empty_message(&view));
        return Ok(());
    }
    let formatters = context.formatters();
    let mut table = Table::new(
        Some("Category totals"),
        vec![
            TableColumn::left("Category"),
            TableColumn::right("Income"),
            TableColumn::right("Expense"),
            TableColumn::right("Net"),
        ],
    );
    for (category, totals) in &view.category_totals {
        table.add_row(vec![
            category.display_label(),
            formatters.format_optional(totals.income),
            formatters.format_optional(totals.expense),
            formatters.format_amount(totals.net()),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, "report monthly")?.as_str() {
        "monthly" => monthly_report(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown report `{other}`"
        ))),
    }
}

fn monthly_report(context: &ShellContext) -> CommandResult {
    let book = context.manager.book()?;
    let selected = LedgerAggregator::filter_by_category(&book.entries, context.filter);
    let rows = ReportService::monthly_summary(&selected);
    if rows.is_empty() {
        io::print_info("No entries to report.");
        return Ok(());
    }
    let formatters = context.formatters();
    let mut table = Table::new(
        Some("Monthly summary"),
        vec![
            TableColumn::left("Month"),
            TableColumn::right("Income"),
            TableColumn::right("Expense"),
            TableColumn::right("Net"),
        ],
    );
    for row in rows {
        table.add_row(vec![
            row.month.short_label(),
            formatters.format_amount(row.total_income),
            formatters.format_amount(row.total_expense),
            formatters.format_amount(row.net_balance),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn print_summary(formatters: &CliFormatters, filter: CategoryFilter, summary: &LedgerSummary) {
    let title = match filter {
        CategoryFilter::All => "Summary".to_string(),
        CategoryFilter::Only(category) => format!("Summary ({})", category.label()),
    };
    output::section(title);
    let mut table = Table::new(None, vec![TableColumn::left("Total"), TableColumn::right("Amount")]);
    table.add_row(vec![
        "Income".to_string(),
        formatters.format_amount(summary.total_income),
    ]);
    table.add_row(vec![
        "Expense".to_string(),
        formatters.format_amount(summary.total_expense),
    ]);
    table.add_row(vec![
        "Balance".to_string(),
        formatters.format_amount(summary.balance),
    ]);
    table.add_row(vec!["Entries".to_string(), summary.count.to_string()]);
    TableRenderer::render(&table);
}

fn empty_message(view: &DerivedView) -> String {
    match view.filter {
        CategoryFilter::All => "No entries yet. Use `entry add` or `csv import`.".to_string(),
        CategoryFilter::Only(category) => format!("No {} entries.", category.label()),
    }
}
