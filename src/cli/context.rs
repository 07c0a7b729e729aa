use std::io;

use crate::cli::{commands, output, registry::CommandRegistry};
use crate::config::{Config, ConfigManager};
use crate::errors::{CliError, StorageError};
use crate::StashManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// State shared by every command handler during one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: StashManager,
    pub config: Config,
    pub running: bool,
    pub last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let manager = StashManager::open(&config, config_manager.base_dir())?;
        Ok(Self::with_manager(mode, manager, config))
    }

    pub fn with_manager(mode: CliMode, manager: StashManager, config: Config) -> Self {
        output::set_color_enabled(config.ui_color_enabled);
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager,
            config,
            running: true,
            last_command: None,
        }
    }

    pub fn prompt(&self) -> String {
        "stash> ".to_string()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match self.registry.handler(command) {
            Some(handler) => match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    /// Scripts get the bare error; the hint is only for someone at the prompt.
    pub(crate) fn usage_hint(&self) -> Option<&'static str> {
        (self.mode == CliMode::Interactive).then_some("Use `help <command>` for usage details.")
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                if let Some(hint) = self.usage_hint() {
                    output::info(hint);
                }
            }
            other => output::error(other),
        }
    }
}
