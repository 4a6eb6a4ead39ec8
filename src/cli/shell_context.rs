//! Runtime state shared by the shell loop and command handlers.

use std::{path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use fintrack_core::{Clock, MIN_ID_PREFIX};
use fintrack_domain::{CategoryFilter, LedgerEntry};
use fintrack_storage_json::{JsonEntryStorage, StoragePaths};
use strsim::levenshtein;
use uuid::Uuid;

use crate::cli::{
    commands,
    core::{CliError, CommandError, CommandResult, LoopControl},
    formatters::CliFormatters,
    io as cli_io,
    output::{self, OutputPreferences},
    registry::{CommandEntry, CommandRegistry},
    system_clock::SystemClock,
};
use crate::config::{self, Config, ConfigManager};
use crate::core::{AppError, BookManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BookManager,
    pub storage: JsonEntryStorage,
    pub clock: Arc<dyn Clock>,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Category selection applied to every derived view.
    pub filter: CategoryFilter,
    /// Entry ids in the order of the last `entry list`, for `#N` references.
    pub last_listing: Vec<Uuid>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, config::default_manager()?)
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        Self::with_config_manager(mode, config::manager_with_base(base)?)
    }

    fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let base = config_manager.base_dir().to_path_buf();
        let storage = JsonEntryStorage::new(StoragePaths {
            book_root: config.resolve_book_root(&base),
            backup_root: config.resolve_backup_root(&base),
        })?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let manager = BookManager::new(Box::new(storage.clone()), Arc::clone(&clock));

        let mut context = ShellContext {
            mode,
            registry,
            manager,
            storage,
            clock,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            filter: CategoryFilter::All,
            last_listing: Vec::new(),
            running: true,
        };
        context.auto_open_last()?;
        Ok(context)
    }

    fn auto_open_last(&mut self) -> Result<(), CliError> {
        if self.mode != CliMode::Interactive {
            return Ok(());
        }
        let Some(user) = self.config.active_user.clone() else {
            return Ok(());
        };
        if let Ok(report) = self.manager.open(&user) {
            cli_io::print_info(format!(
                "Opened `{}` ({} entries).",
                report.user, report.entries
            ));
        }
        Ok(())
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        match (self.manager.current_user(), self.filter) {
            (None, _) => "fintrack> ".into(),
            (Some(user), CategoryFilter::All) => format!("fintrack[{user}]> "),
            (Some(user), filter) => format!("fintrack[{user}|{filter}]> "),
        }
    }

    pub fn formatters(&self) -> CliFormatters {
        CliFormatters::from_config(&self.config)
    }

    pub fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Asks for confirmation in interactive mode; scripts always proceed.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    /// Entries of the open book under the active filter, newest first.
    pub fn visible_entries(&self) -> Result<Vec<&LedgerEntry>, CommandError> {
        let filter = self.filter;
        Ok(self
            .manager
            .recent()?
            .into_iter()
            .filter(|entry| filter.matches(entry.category))
            .collect())
    }

    /// Resolves `#N` (or a bare number shorter than an id prefix) against the
    /// last listing, anything else as an entry id prefix.
    pub fn resolve_entry(&self, token: &str) -> Result<Uuid, CommandError> {
        let trimmed = token.trim();
        let row = trimmed.strip_prefix('#').or_else(|| {
            (trimmed.len() < MIN_ID_PREFIX && trimmed.chars().all(|c| c.is_ascii_digit()))
                .then_some(trimmed)
        });
        let Some(row) = row else {
            return Ok(self.manager.resolve(trimmed)?);
        };
        let position: usize = row
            .parse()
            .map_err(|_| CommandError::InvalidArguments(format!("`{token}` is not a row number")))?;
        let listing: Vec<Uuid> = if self.last_listing.is_empty() {
            self.visible_entries()?.iter().map(|entry| entry.id).collect()
        } else {
            self.last_listing.clone()
        };
        position
            .checked_sub(1)
            .and_then(|idx| listing.get(idx).copied())
            .ok_or_else(|| CommandError::InvalidArguments(format!("no entry at row {position}")))
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit fintrack?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::App(AppError::BookNotOpen) => {
                cli_io::print_error("No entry book is open.");
                cli_io::print_hint("Try `user open <name>` to get started.");
            }
            other => cli_io::print_error(other),
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => return Err(CommandError::InvalidArguments(err.to_string())),
        };
        let Some(first) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }
}

/// Runs script lines against a context rooted at `base`, failing on the
/// first command error.
#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        if context.process_line(line)? == LoopControl::Exit {
            break;
        }
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use fintrack_domain::Category;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn script_builds_and_filters_a_book() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &[
                "user open asha",
                "entry add 2024-01-05 --expense 50 --category Food",
                "entry add 2024-01-20 --income 1000 --category Salary",
                "entry add 2024-02-01 --expense 200 --category \"Bills & Utilities\"",
                "filter bills",
            ],
        )
        .unwrap();

        assert_eq!(context.filter, CategoryFilter::Only(Category::Bills));
        assert_eq!(context.prompt(), "fintrack[asha|Bills]> ");
        let all = context.manager.view(CategoryFilter::All).unwrap();
        assert_eq!(all.balances(), vec![-50.0, 950.0, 750.0]);
        let filtered = context.manager.view(context.filter).unwrap();
        assert_eq!(filtered.summary.balance, -200.0);
        assert_eq!(context.config.active_user.as_deref(), Some("asha"));
    }

    #[test]
    fn rows_resolve_against_last_listing() {
        let dir = tempdir().unwrap();
        let mut context = process_script(
            dir.path().to_path_buf(),
            &[
                "user open ravi",
                "entry add 2024-03-01 --expense 10",
                "entry add 2024-03-02 --expense 20",
                "entry list",
            ],
        )
        .unwrap();
        let newest = context.resolve_entry("#1").unwrap();
        assert_eq!(context.manager.entry(newest).unwrap().expense, 20.0);
        assert_eq!(context.resolve_entry("2").unwrap(), context.last_listing[1]);
        assert!(context.resolve_entry("#3").is_err());

        context.process_line("entry remove #1").unwrap();
        assert_eq!(context.manager.book().unwrap().len(), 1);
    }

    #[test]
    fn rows_follow_the_filter_without_a_listing() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &[
                "user open ravi",
                "entry add 2024-03-01 --expense 10 --category Food",
                "entry add 2024-03-05 --expense 200 --category Bills",
                "entry add 2024-03-09 --expense 30 --category Food",
                "filter food",
            ],
        )
        .unwrap();
        assert!(context.last_listing.is_empty());
        let first = context.resolve_entry("#1").unwrap();
        assert_eq!(context.manager.entry(first).unwrap().expense, 30.0);
        let second = context.resolve_entry("#2").unwrap();
        assert_eq!(context.manager.entry(second).unwrap().expense, 10.0);
        assert!(context.resolve_entry("#3").is_err());
    }

    #[test]
    fn unknown_commands_do_not_fail_the_script() {
        let dir = tempdir().unwrap();
        let mut context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        assert_eq!(context.process_line("sumary").unwrap(), LoopControl::Continue);
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn commands_require_an_open_book() {
        let dir = tempdir().unwrap();
        let mut context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        let err = context.process_line("summary").unwrap_err();
        assert!(matches!(err, CommandError::App(AppError::BookNotOpen)));
    }
}
