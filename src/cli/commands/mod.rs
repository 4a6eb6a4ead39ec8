pub mod backup;
pub mod chart;
pub mod config;
pub mod csv;
pub mod entry;
pub mod system;
pub mod user;
pub mod view;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Order in which commands appear in `help`.
pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(user::definitions());
    commands.extend(entry::definitions());
    commands.extend(view::definitions());
    commands.extend(chart::definitions());
    commands.extend(csv::definitions());
    commands.extend(backup::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// First argument lowercased, or a usage error when it is missing.
pub(crate) fn subcommand(args: &[&str], usage: &str) -> Result<String, CommandError> {
    args.first()
        .map(|action| action.to_lowercase())
        .ok_or_else(|| CommandError::usage(usage))
}

/// Remaining arguments joined with spaces, `None` when empty.
pub(crate) fn joined(args: &[&str]) -> Option<String> {
    let text = args.join(" ");
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
