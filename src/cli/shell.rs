use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};
use shell_words::split;
use tracing::debug;

use crate::cli::context::{CliMode, LoopControl, ShellContext};
use crate::cli::output;
use crate::errors::CliError;

/// Set to run commands read line by line from stdin without a prompt.
pub const SCRIPT_ENV: &str = "STASH_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    output::info("Stash Core shell. Type `help` for commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if let LoopControl::Exit = handle_line(context, trimmed) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        if let LoopControl::Exit = handle_line(context, &line) {
            break;
        }
    }
    Ok(())
}

pub(crate) fn handle_line(context: &mut ShellContext, line: &str) -> LoopControl {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return LoopControl::Continue;
        }
    };

    let Some(raw) = tokens.first() else {
        return LoopControl::Continue;
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    debug!(command = %command, args = args.len(), "dispatching command");

    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            LoopControl::Exit
        }
        Ok(LoopControl::Continue) => LoopControl::Continue,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

/// Completes the first word of a line against the registered command names.
struct CommandHelper {
    commands: Vec<&'static str>,
}

impl CommandHelper {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let trimmed = prefix.trim_start();
        if trimmed.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = prefix.len() - trimmed.len();
        let needle = trimmed.to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::StashManager;

    fn context() -> ShellContext {
        let config = Config {
            ui_color_enabled: false,
            ..Config::default()
        };
        ShellContext::with_manager(CliMode::Script, StashManager::in_memory(), config)
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut context = context();
        assert!(matches!(
            handle_line(&mut context, "summary"),
            LoopControl::Continue
        ));
        assert!(matches!(handle_line(&mut context, "EXIT"), LoopControl::Exit));
        assert!(!context.running);
    }

    #[test]
    fn unknown_and_malformed_lines_keep_running() {
        let mut context = context();
        assert!(matches!(
            handle_line(&mut context, "sumary"),
            LoopControl::Continue
        ));
        assert!(matches!(
            handle_line(&mut context, "matrix \"unterminated"),
            LoopControl::Continue
        ));
        assert!(matches!(handle_line(&mut context, "   "), LoopControl::Continue));
        assert_eq!(context.last_command.as_deref(), Some("sumary"));
    }

    #[test]
    fn snapshot_command_records_history() {
        let mut context = context();
        handle_line(&mut context, "snapshot");
        handle_line(&mut context, "snapshot");
        assert_eq!(context.manager.snapshots().list_snapshots().len(), 1);
        assert!(matches!(
            handle_line(&mut context, "history monthly"),
            LoopControl::Continue
        ));
    }

    #[test]
    fn usage_hint_is_shown_only_at_the_prompt() {
        assert!(context().usage_hint().is_none());

        let interactive = ShellContext::with_manager(
            CliMode::Interactive,
            StashManager::in_memory(),
            Config::default(),
        );
        assert!(interactive
            .usage_hint()
            .is_some_and(|hint| hint.contains("help <command>")));
    }
}
