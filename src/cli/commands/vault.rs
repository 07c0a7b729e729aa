use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::query_from;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "snippets",
            "List saved snippets, optionally filtered",
            "snippets [query]",
            cmd_snippets,
        ),
        CommandEntry::new(
            "secrets",
            "List stored secrets with masked values",
            "secrets [query]",
            cmd_secrets,
        ),
    ]
}

fn cmd_snippets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = query_from(args).unwrap_or_default();
    let snippets = context.manager.snippets().search(&query, None);
    output::section(format!("Snippets ({})", snippets.len()));
    for snippet in snippets {
        let star = if snippet.is_favorite() { "*" } else { " " };
        output::info(format!(
            "  {} {:<32} {:<12} {}",
            star,
            snippet.title,
            format!("{:?}", snippet.language).to_lowercase(),
            snippet.tags.join(", ")
        ));
    }
    Ok(())
}

fn cmd_secrets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let service = context.manager.secrets();
    let query = query_from(args).unwrap_or_default();
    let secrets = service.search(&query, None);

    output::section(format!("Secrets ({})", secrets.len()));
    for secret in &secrets {
        output::info(format!(
            "  {:<32} {:<13} {}",
            secret.title,
            secret.category.label(),
            secret.masked_value()
        ));
    }

    let counts: Vec<String> = service
        .count_by_category()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    if !counts.is_empty() {
        output::info(format!("By category: {}", counts.join(", ")));
    }
    Ok(())
}
