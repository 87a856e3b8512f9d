//! Dispatch, error reporting and ledger access helpers for the shell.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::config::{ConfigError, ConfigManager, Settings};
use crate::core::services::{ServiceError, ServiceResult};
use crate::core::validation::ValidationErrors;
use crate::errors::LedgerError;
use crate::ledger::{Ledger, LedgerWriter, WriterOptions};
use crate::simulation::DataSimulator;

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(inner) => CommandError::Ledger(inner),
            ServiceError::Invalid(message) => CommandError::Message(message),
            ServiceError::Validation(errors) => CommandError::Validation(errors),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let settings = config_manager.load()?;
        Ok(Self::with_config(mode, config_manager, settings))
    }

    /// Interactive sessions start from generated sample data; scripts start empty.
    pub fn with_config(mode: CliMode, config_manager: ConfigManager, settings: Settings) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut simulator = DataSimulator::new();
        let mut ledger = Ledger::new();
        if mode == CliMode::Interactive {
            let (accounts, goals, transactions) = simulator.dataset(settings.default_currency);
            ledger.replace_all(accounts, goals, transactions);
        }
        let ledger = LedgerWriter::spawn(
            ledger,
            WriterOptions::with_delay_ms(settings.simulated_delay_ms),
        );

        output::set_preferences(OutputPreferences {
            compact: settings.compact_layout,
        });

        Self {
            mode,
            registry,
            ledger,
            theme: ColorfulTheme::default(),
            config_manager,
            settings,
            simulator,
            running: true,
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        "finance> ".to_string()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            tracing::debug!(command, ?args, "Dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Scripts never block on prompts and always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    /// Scripts take the first option without prompting.
    pub(crate) fn choose(&self, prompt: &str, options: &[String]) -> Result<usize, CommandError> {
        if self.mode == CliMode::Script || options.len() < 2 {
            return Ok(0);
        }
        cli_io::select_item(&self.theme, prompt, options)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Ledger(LedgerError::WriterClosed) => {
                Err(CliError::Ledger(LedgerError::WriterClosed))
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    /// Copy of the current ledger for read-only commands.
    pub(crate) fn snapshot(&self) -> Result<Ledger, CommandError> {
        Ok(self.ledger.snapshot()?)
    }

    /// Runs a service call on the writer thread after the simulated delay.
    pub(crate) fn run<T, F>(&self, job: F) -> Result<T, CommandError>
    where
        F: FnOnce(&mut Ledger) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        Ok(self.ledger.exec_simulated(job)??)
    }

    /// Persists one setting and applies it to the running shell.
    pub(crate) fn update_setting(&mut self, key: &str, value: &str) -> CommandResult {
        let settings = self.config_manager.set(key, value)?;
        self.ledger.set_simulated_delay(std::time::Duration::from_millis(
            settings.simulated_delay_ms,
        ))?;
        output::set_preferences(OutputPreferences {
            compact: settings.compact_layout,
        });
        self.settings = settings;
        Ok(())
    }
}
