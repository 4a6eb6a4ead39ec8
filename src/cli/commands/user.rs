use fintrack_core::CurrencyFormatter;
use fintrack_domain::CategoryFilter;

use crate::cli::commands::subcommand;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

const USAGE: &str = "user <open <name>|list|delete <name>|close>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "user",
        "Open, list or delete per-user entry books",
        USAGE,
        cmd_user,
    )
    .with_subcommands(&["open", "list", "delete", "close"])]
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args, USAGE)?.as_str() {
        "open" => {
            let name = args.get(1).ok_or_else(|| CommandError::usage("user open <name>"))?;
            open_user(context, name)
        }
        "list" => list_users(context),
        "delete" => {
            let name = args
                .get(1)
                .ok_or_else(|| CommandError::usage("user delete <name>"))?;
            delete_user(context, name)
        }
        "close" => {
            context.manager.close();
            context.filter = CategoryFilter::All;
            context.last_listing.clear();
            io::print_info("Entry book closed.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown user action `{other}`"
        ))),
    }
}

fn open_user(context: &mut ShellContext, name: &str) -> CommandResult {
    let report = context.manager.open(name)?;
    context.filter = CategoryFilter::All;
    context.last_listing.clear();

    let mut config = context.config.clone();
    config.active_user = Some(report.user.clone());
    context.config_manager.save(&config)?;
    context.config = config;

    if report.created {
        io::print_success(format!("Created a new book for `{}`.", report.user));
    } else {
        io::print_success(format!(
            "Opened `{}` ({} entries).",
            report.user, report.entries
        ));
    }
    for warning in &report.warnings {
        io::print_warning(warning);
    }
    Ok(())
}

fn list_users(context: &ShellContext) -> CommandResult {
    let books = context.storage.list_book_metadata()?;
    if books.is_empty() {
        io::print_info("No entry books yet. Use `user open <name>` to create one.");
        return Ok(());
    }
    let formatters = context.formatters();
    let active = context.manager.current_user();
    let mut table = Table::new(
        Some("Entry books"),
        vec![
            TableColumn::left(""),
            TableColumn::left("User"),
            TableColumn::right("Entries"),
            TableColumn::right("Balance"),
            TableColumn::left("Updated"),
        ],
    );
    for book in books {
        let marker = if active.is_some_and(|user| user.eq_ignore_ascii_case(&book.owner)) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            book.owner,
            book.entry_count.to_string(),
            formatters.format_amount(book.balance),
            book.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn delete_user(context: &mut ShellContext, name: &str) -> CommandResult {
    if !context.confirm(&format!("Delete the book for `{name}` and all its entries?"))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let was_open = context
        .manager
        .current_user()
        .is_some_and(|user| user.eq_ignore_ascii_case(name.trim()));
    context.manager.delete_user(name)?;

    if was_open {
        context.filter = CategoryFilter::All;
        context.last_listing.clear();
    }
    let forget = context
        .config
        .active_user
        .as_deref()
        .is_some_and(|user| user.eq_ignore_ascii_case(name.trim()));
    if forget {
        context.config.active_user = None;
        context.persist_config()?;
    }
    io::print_success(format!("Deleted the book for `{name}`."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::cli::shell_context::process_script;

    #[test]
    fn delete_closes_the_open_book() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &["user open maya", "user open dev", "user delete dev"],
        )
        .unwrap();
        assert!(!context.manager.is_open());
        assert_eq!(context.config.active_user, None);
        assert_eq!(context.manager.list_users().unwrap(), vec!["maya".to_string()]);
    }

    #[test]
    fn deleting_an_unknown_user_fails() {
        let dir = tempdir().unwrap();
        let result = process_script(dir.path().to_path_buf(), &["user delete ghost"]);
        assert!(result.is_err());
    }
}
