use fintrack_domain::CategoryFilter;

use crate::cli::commands::{joined, subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::CliMode;
use crate::cli::table::{Table, TableColumn, TableRenderer};
use crate::core::AppError;

const USAGE: &str = "backup <create [note]|list|restore <#|name>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backup",
        "Snapshot and restore the open book",
        USAGE,
        cmd_backup,
    )
    .with_subcommands(&["create", "list", "restore"])]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let rest = args.get(1..).unwrap_or(&[]);
    match subcommand(args, USAGE)?.as_str() {
        "create" => {
            let note = joined(rest);
            let info = context.manager.backup(note.as_deref())?;
            io::print_success(format!("Backup `{}` created.", info.id));
            Ok(())
        }
        "list" => list_backups(context),
        "restore" => restore_backup(context, rest.first().copied()),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown backup action `{other}`"
        ))),
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let user = context.manager.current_user().ok_or(AppError::BookNotOpen)?;
    let backups = context.storage.list_backup_metadata(user)?;
    if backups.is_empty() {
        io::print_warning("No backups found.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Backups"),
        vec![
            TableColumn::right("#"),
            TableColumn::left("Name"),
            TableColumn::left("Created"),
            TableColumn::right("Size"),
        ],
    );
    for (idx, backup) in backups.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            backup.name.clone(),
            backup
                .created_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
            format_size(backup.size_bytes),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn restore_backup(context: &mut ShellContext, reference: Option<&str>) -> CommandResult {
    let reference = match reference {
        Some(reference) => reference.to_string(),
        None if context.mode == CliMode::Interactive => {
            let backups = context.manager.list_backups()?;
            if backups.is_empty() {
                io::print_warning("No backups found.");
                return Ok(());
            }
            let names: Vec<String> = backups.iter().map(|info| info.id.clone()).collect();
            let idx = io::select_index(&context.theme, "Select backup", &names, 0)?;
            (idx + 1).to_string()
        }
        None => return Err(CommandError::usage("backup restore <#|name>")),
    };
    if !context.confirm("Replace the open book with this backup?")? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let info = context.manager.restore(&reference)?;
    context.filter = CategoryFilter::All;
    context.last_listing.clear();
    io::print_success(format!("Restored `{}`.", info.id));
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KIB {
        format!("{bytes} B")
    } else if size < KIB * KIB {
        format!("{:.1} KiB", size / KIB)
    } else {
        format!("{:.1} MiB", size / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::cli::shell_context::process_script;

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn restore_brings_back_removed_entries() {
        let dir = tempdir().unwrap();
        let mut context = process_script(
            dir.path().to_path_buf(),
            &[
                "user open noor",
                "entry add 2024-01-05 --expense 50 --category Food",
                "backup create before cleanup",
                "entry remove #1",
            ],
        )
        .unwrap();
        assert!(context.manager.book().unwrap().is_empty());

        let named = context.manager.list_backups().unwrap();
        let ours = named
            .iter()
            .position(|info| info.id.contains("before-cleanup"))
            .unwrap();
        context
            .process_line(&format!("backup restore {}", ours + 1))
            .unwrap();
        assert_eq!(context.manager.book().unwrap().len(), 1);
    }
}
