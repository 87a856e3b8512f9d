use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{ArgKind, CommandEntry};
use crate::config::SETTING_KEYS;

const USAGE: &str = "config [<key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("config", "Show or change settings", USAGE, cmd_config)
            .with_args(&[ArgKind::Setting]),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output_section("Settings");
            for (key, value) in context.settings.entries() {
                io::print_info(format!("  {key:<20} {value}"));
            }
            io::print_info(format!(
                "  Stored at {}",
                context.config_manager.path().display()
            ));
            Ok(())
        }
        [key, value] => {
            context.update_setting(key, value)?;
            let current = context
                .settings
                .entries()
                .into_iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value)
                .unwrap_or_default();
            io::print_success(format!("{key} set to {current}"));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "Usage: {USAGE}. Keys: {}",
            SETTING_KEYS.join(", ")
        ))),
    }
}
