use crate::cli::commands::{joined, subcommand};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::CliMode;
use crate::cli::table::{Table, TableColumn, TableRenderer};
use crate::config::ConfigKey;

const USAGE: &str = "config [show|set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        USAGE,
        cmd_config,
    )
    .with_subcommands(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show_config(context);
    }
    match subcommand(args, USAGE)?.as_str() {
        "show" => show_config(context),
        "set" => {
            let key = args.get(1).ok_or_else(|| CommandError::usage(USAGE))?;
            let value = joined(&args[2..]).ok_or_else(|| CommandError::usage(USAGE))?;
            set_config_value(context, key, &value)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let mut table = Table::new(
        Some("Configuration"),
        vec![TableColumn::left("Key"), TableColumn::left("Value")],
    );
    for key in ConfigKey::ALL {
        table.add_row(vec![key.as_str().to_string(), context.config.get(key)]);
    }
    TableRenderer::render(&table);
    io::print_hint(format!(
        "Stored at {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = ConfigKey::parse(key)?;
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;

    if key == ConfigKey::Color {
        output::set_preferences(OutputPreferences {
            color_enabled: context.config.ui_color_enabled && context.mode == CliMode::Interactive,
        });
    }
    if matches!(key, ConfigKey::BookRoot | ConfigKey::BackupRoot) {
        io::print_hint("Storage roots take effect the next time fintrack starts.");
    }
    io::print_success(format!("{} set to `{}`.", key, context.config.get(key)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::cli::shell_context::process_script;
    use crate::config::Theme;

    #[test]
    fn set_persists_and_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let mut context = process_script(
            dir.path().to_path_buf(),
            &["config set theme dark", "config set symbol Rs."],
        )
        .unwrap();
        assert_eq!(context.config.theme, Theme::Dark);
        let stored = context.config_manager.load().unwrap();
        assert_eq!(stored.currency_symbol, "Rs.");

        assert!(context.process_line("config set precision 9").is_err());
        assert!(context.process_line("config set colour off").is_err());
        assert_eq!(context.config.precision, 2);
    }
}
