use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use fintrack_core::{csv_format, LedgerAggregator};
use fintrack_domain::CategoryFilter;

use crate::cli::commands::{joined, subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "csv <import|export|template> <path>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "csv",
        "Import or export entries as CSV",
        USAGE,
        cmd_csv,
    )
    .with_subcommands(&["import", "export", "template"])]
}

fn cmd_csv(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = subcommand(args, USAGE)?;
    let path = joined(args.get(1..).unwrap_or(&[]))
        .map(|raw| expand_path(&raw))
        .ok_or_else(|| CommandError::usage(USAGE))?;
    match action.as_str() {
        "import" => import_csv(context, &path),
        "export" => export_csv(context, &path),
        "template" => write_template(context, &path),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown csv action `{other}`"
        ))),
    }
}

fn import_csv(context: &mut ShellContext, path: &Path) -> CommandResult {
    context.manager.book()?;
    let file = File::open(path).map_err(|err| {
        CommandError::Message(format!("cannot read {}: {err}", path.display()))
    })?;
    let raws = csv_format::read_entries(BufReader::new(file))?;
    let report = context.manager.import(raws)?;
    context.last_listing.clear();

    io::print_success(format!(
        "Imported {} entries from {}.",
        report.accepted(),
        path.display()
    ));
    for note in &report.notes {
        io::print_warning(note);
    }
    for skipped in &report.skipped {
        io::print_warning(format!("record {} skipped: {}", skipped.index, skipped.reason));
    }
    Ok(())
}

fn export_csv(context: &mut ShellContext, path: &Path) -> CommandResult {
    let book = context.manager.book()?;
    let selected = LedgerAggregator::filter_by_category(&book.entries, context.filter);
    if !confirm_overwrite(context, path)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let file = File::create(path)?;
    let written = csv_format::write_entries(BufWriter::new(file), &selected)?;
    match context.filter {
        CategoryFilter::All => io::print_success(format!(
            "Exported {written} entries to {}.",
            path.display()
        )),
        CategoryFilter::Only(category) => io::print_success(format!(
            "Exported {written} {} entries to {}.",
            category.value(),
            path.display()
        )),
    }
    Ok(())
}

fn write_template(context: &mut ShellContext, path: &Path) -> CommandResult {
    if !confirm_overwrite(context, path)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    csv_format::write_template(BufWriter::new(File::create(path)?))?;
    io::print_success(format!("Template written to {}.", path.display()));
    Ok(())
}

fn confirm_overwrite(context: &ShellContext, path: &Path) -> Result<bool, CommandError> {
    if !path.exists() {
        return Ok(true);
    }
    context.confirm(&format!("{} exists. Overwrite?", path.display()))
}

/// Expands a leading `~` to the home directory.
fn expand_path(raw: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (raw.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(raw),
    }
}
