use dialoguer::theme::ColorfulTheme;

use crate::config::{ConfigManager, Settings};
use crate::ledger::LedgerHandle;
use crate::simulation::DataSimulator;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command handler for the lifetime of the shell.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: LedgerHandle,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub settings: Settings,
    pub simulator: DataSimulator,
    pub running: bool,
}
