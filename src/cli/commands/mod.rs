pub mod finance;
pub mod history;
pub mod system;
pub mod vault;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(finance::definitions());
    commands.extend(history::definitions());
    commands.extend(vault::definitions());
    commands
}

/// Remaining arguments joined back into one free-text query.
pub(crate) fn query_from(args: &[&str]) -> Option<String> {
    let query = args.join(" ");
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
