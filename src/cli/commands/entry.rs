use fintrack_core::{CurrencyFormatter, DateFormatter};
use fintrack_domain::{parse_date, Category, EntryDraft, LedgerEntry};

use crate::cli::commands::{joined, subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::CliMode;
use crate::cli::table::{Table, TableColumn, TableRenderer};

const USAGE: &str = "entry <add|edit|remove|show|list> ...";
const ADD_USAGE: &str =
    "entry add <YYYY-MM-DD> [--income N] [--expense N] [--category C] [--description text]";
const EDIT_USAGE: &str =
    "entry edit <#row|id> [--date D] [--income N] [--expense N] [--category C] [--description text]";
const DEFAULT_LIST_LIMIT: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "entry",
        "Add, edit, remove and list ledger entries",
        USAGE,
        cmd_entry,
    )
    .with_subcommands(&["add", "edit", "remove", "show", "list"])]
}

fn cmd_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let rest = args.get(1..).unwrap_or(&[]);
    match subcommand(args, USAGE)?.as_str() {
        "add" => add_entry(context, rest),
        "edit" => edit_entry(context, rest),
        "remove" | "rm" => remove_entry(context, rest),
        "show" => show_entry(context, rest),
        "list" | "ls" => list_entries(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown entry action `{other}`"
        ))),
    }
}

fn add_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.manager.book()?;
    let draft = if args.is_empty() {
        if context.mode == CliMode::Script {
            return Err(CommandError::usage(ADD_USAGE));
        }
        prompt_draft(context, EntryDraft::on(context.clock.today()))?
    } else {
        let (positional, flags) = split_flags(args)?;
        let date_text = positional
            .first()
            .ok_or_else(|| CommandError::usage(ADD_USAGE))?;
        let mut draft = EntryDraft::on(parse_date_arg(date_text)?);
        apply_flags(&mut draft, &flags)?;
        draft
    };
    let id = context.manager.add(&draft)?;
    context.last_listing.clear();
    io::print_success(format!("Entry {} added.", short_id(&id)));
    Ok(())
}

fn edit_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(args)?;
    let token = positional
        .first()
        .ok_or_else(|| CommandError::usage(EDIT_USAGE))?;
    let id = context.resolve_entry(token)?;
    let current = EntryDraft::from_entry(context.manager.entry(id)?);
    let draft = if flags.is_empty() {
        if context.mode == CliMode::Script {
            return Err(CommandError::usage(EDIT_USAGE));
        }
        prompt_draft(context, current)?
    } else {
        let mut draft = current;
        apply_flags(&mut draft, &flags)?;
        draft
    };
    context.manager.update(id, &draft)?;
    io::print_success(format!("Entry {} updated.", short_id(&id)));
    Ok(())
}

fn remove_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::usage("entry remove <#row|id>"))?;
    let id = context.resolve_entry(token)?;
    let summary = {
        let entry = context.manager.entry(id)?;
        describe(context, entry)
    };
    if !context.confirm(&format!("Remove {summary}?"))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.manager.remove(id)?;
    context.last_listing.retain(|listed| *listed != id);
    io::print_success(format!("Removed {summary}."));
    Ok(())
}

fn show_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::usage("entry show <#row|id>"))?;
    let id = context.resolve_entry(token)?;
    let entry = context.manager.entry(id)?;
    let formatters = context.formatters();

    output::section("Entry");
    let mut table = Table::new(None, vec![TableColumn::left("Field"), TableColumn::left("Value")]);
    table.add_row(vec!["Id".to_string(), entry.id.to_string()]);
    table.add_row(vec!["Date".to_string(), formatters.format_date(entry.date)]);
    table.add_row(vec!["Income".to_string(), formatters.format_optional(entry.income)]);
    table.add_row(vec!["Expense".to_string(), formatters.format_optional(entry.expense)]);
    table.add_row(vec!["Category".to_string(), entry.category.label().to_string()]);
    table.add_row(vec![
        "Description".to_string(),
        entry.description_or_placeholder().to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        entry.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ]);
    TableRenderer::render(&table);
    Ok(())
}

fn list_entries(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(value) => value.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{value}` is not a row count"))
        })?,
        None => DEFAULT_LIST_LIMIT,
    };
    let formatters = context.formatters();
    let mut shown = context.visible_entries()?;
    shown.truncate(limit);

    if shown.is_empty() {
        io::print_info("No entries to show.");
        context.last_listing.clear();
        return Ok(());
    }

    let mut table = Table::new(
        Some("Recent entries"),
        vec![
            TableColumn::right("#"),
            TableColumn::left("Date"),
            TableColumn::left("Category"),
            TableColumn::right("Income"),
            TableColumn::right("Expense"),
            TableColumn::left("Description"),
            TableColumn::left("Id"),
        ],
    );
    for (idx, entry) in shown.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            formatters.format_date(entry.date),
            entry.category.value().to_string(),
            formatters.format_optional(entry.income),
            formatters.format_optional(entry.expense),
            entry.description_or_placeholder().to_string(),
            short_id(&entry.id),
        ]);
    }
    let ids = shown.iter().map(|entry| entry.id).collect();
    TableRenderer::render(&table);
    context.last_listing = ids;
    Ok(())
}

/// Positional arguments and `--flag value` pairs.
fn split_flags<'a>(args: &[&'a str]) -> Result<(Vec<&'a str>, Vec<(String, String)>), CommandError> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.strip_prefix("--") {
            Some(name) => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`--{name}` needs a value"))
                })?;
                flags.push((name.to_lowercase(), value.to_string()));
            }
            None => positional.push(*arg),
        }
    }
    Ok((positional, flags))
}

fn apply_flags(draft: &mut EntryDraft, flags: &[(String, String)]) -> Result<(), CommandError> {
    for (name, value) in flags {
        match name.as_str() {
            "date" => draft.date = Some(parse_date_arg(value)?),
            "income" => draft.income = Some(parse_amount(value)?),
            "expense" => draft.expense = Some(parse_amount(value)?),
            "category" => draft.category = Some(parse_category(value)?),
            "description" | "note" => draft.description = joined(&[value.as_str()]),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `--{other}`"
                )))
            }
        }
    }
    Ok(())
}

fn parse_date_arg(value: &str) -> Result<chrono::NaiveDate, CommandError> {
    parse_date(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{value}` is not a date (expected YYYY-MM-DD)"))
    })
}

fn parse_amount(value: &str) -> Result<f64, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{value}` is not a non-negative amount"
        ))),
    }
}

fn parse_category(value: &str) -> Result<Category, CommandError> {
    Category::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|category| category.value()).collect();
        CommandError::InvalidArguments(format!(
            "unknown category `{value}` (one of {})",
            known.join(", ")
        ))
    })
}

fn prompt_draft(context: &ShellContext, seed: EntryDraft) -> Result<EntryDraft, CommandError> {
    let theme = &context.theme;
    let date_default = seed.date.unwrap_or_else(|| context.clock.today());
    let date = loop {
        let text = io::prompt_with_default(theme, "Date", &date_default.format("%Y-%m-%d").to_string())?;
        match parse_date_arg(&text) {
            Ok(date) => break date,
            Err(err) => io::print_warning(err),
        }
    };
    let income = prompt_amount(context, "Income", seed.income.unwrap_or(0.0))?;
    let expense = prompt_amount(context, "Expense", seed.expense.unwrap_or(0.0))?;

    let labels: Vec<String> = Category::ALL
        .iter()
        .map(|category| category.label().to_string())
        .collect();
    let current = seed.category.unwrap_or_default();
    let default_idx = Category::ALL
        .iter()
        .position(|category| *category == current)
        .unwrap_or(0);
    let category = Category::ALL[io::select_index(theme, "Category", &labels, default_idx)?];

    let description = io::prompt_with_default(
        theme,
        "Description",
        seed.description.as_deref().unwrap_or(""),
    )?;

    let mut draft = EntryDraft::on(date)
        .income(income)
        .expense(expense)
        .category(category);
    draft.description = joined(&[description.as_str()]);
    Ok(draft)
}

fn prompt_amount(context: &ShellContext, label: &str, default: f64) -> Result<f64, CommandError> {
    loop {
        let text = io::prompt_with_default(&context.theme, label, &default.to_string())?;
        match parse_amount(&text) {
            Ok(amount) => return Ok(amount),
            Err(err) => io::print_warning(err),
        }
    }
}

fn describe(context: &ShellContext, entry: &LedgerEntry) -> String {
    let formatters = context.formatters();
    let amount = if entry.income > 0.0 && entry.expense == 0.0 {
        format!("+{}", formatters.format_amount(entry.income))
    } else if entry.income == 0.0 {
        format!("-{}", formatters.format_amount(entry.expense))
    } else {
        format!(
            "+{} / -{}",
            formatters.format_amount(entry.income),
            formatters.format_amount(entry.expense)
        )
    };
    format!(
        "{} {} {}",
        formatters.format_date(entry.date),
        entry.category.value(),
        amount
    )
}

fn short_id(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
