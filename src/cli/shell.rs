use std::{
    collections::HashMap,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::ArgKind;
use crate::config::SETTING_KEYS;
use crate::ledger::{Ledger, LedgerHandle};

pub const SCRIPT_ENV: &str = "FINANCE_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::info!(?mode, "Shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(
        context.command_names(),
        context.registry.arg_kinds(),
        context.ledger.clone(),
    );
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output_info("Finance Core shell. Sample data has been generated; type `help` to begin.");

    loop {
        if !context.running {
            break;
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
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
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            crate::cli::io::print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names, then account numbers, goal names and setting keys
/// for the argument positions each command declares.
struct CommandHelper {
    commands: Vec<String>,
    args: HashMap<&'static str, &'static [ArgKind]>,
    ledger: LedgerHandle,
}

impl CommandHelper {
    fn new(
        names: Vec<&'static str>,
        args: HashMap<&'static str, &'static [ArgKind]>,
        ledger: LedgerHandle,
    ) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            args,
            ledger,
        }
    }

    fn candidates(&self, prefix: &str) -> (usize, Vec<Pair>) {
        let word = WordAt::parse(prefix);
        let values = match word.index {
            0 => self.commands.clone(),
            index => {
                let kind = word
                    .command
                    .and_then(|command| self.args.get(command.to_ascii_lowercase().as_str()))
                    .and_then(|kinds| kinds.get(index - 1))
                    .copied()
                    .unwrap_or(ArgKind::Free);
                self.values_for(kind)
            }
        };
        (word.start, matching(word.text, values))
    }

    fn values_for(&self, kind: ArgKind) -> Vec<String> {
        match kind {
            ArgKind::Account => self.with_snapshot(|ledger| {
                ledger
                    .accounts
                    .iter()
                    .map(|account| account.account_number.clone())
                    .collect()
            }),
            ArgKind::Goal => self.with_snapshot(|ledger| {
                ledger.goals.iter().map(|goal| goal.name.clone()).collect()
            }),
            ArgKind::Command => self.commands.clone(),
            ArgKind::Setting => SETTING_KEYS.iter().map(|key| key.to_string()).collect(),
            ArgKind::Free => Vec::new(),
        }
    }

    /// A stopped writer yields no candidates.
    fn with_snapshot(&self, read: impl FnOnce(&Ledger) -> Vec<String>) -> Vec<String> {
        self.ledger
            .snapshot()
            .map(|ledger| read(&ledger))
            .unwrap_or_default()
    }
}

/// The word under the cursor in a partially typed line.
struct WordAt<'a> {
    start: usize,
    index: usize,
    command: Option<&'a str>,
    text: &'a str,
}

impl<'a> WordAt<'a> {
    /// Whitespace inside quotes does not end a word.
    fn parse(prefix: &'a str) -> Self {
        let mut start = 0;
        let mut index = 0;
        let mut command = None;
        let mut quote = None;
        for (offset, ch) in prefix.char_indices() {
            if let Some(open) = quote {
                if ch == open {
                    quote = None;
                }
                continue;
            }
            if ch == '"' || ch == '\'' {
                quote = Some(ch);
            } else if ch.is_whitespace() {
                if offset > start {
                    if index == 0 {
                        command = Some(&prefix[start..offset]);
                    }
                    index += 1;
                }
                start = offset + ch.len_utf8();
            }
        }
        Self {
            start,
            index,
            command,
            text: &prefix[start..],
        }
    }
}

fn matching(typed: &str, mut values: Vec<String>) -> Vec<Pair> {
    let needle = typed.trim_start_matches(['"', '\'']).to_lowercase();
    values.retain(|value| value.to_lowercase().starts_with(&needle));
    values.sort();
    values.dedup();
    values
        .into_iter()
        .map(|value| Pair {
            replacement: if value.contains(char::is_whitespace) {
                format!("\"{value}\"")
            } else {
                value.clone()
            },
            display: value,
        })
        .collect()
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
        Ok(self.candidates(&line[..pos]))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyType;
    use crate::domain::{Account, SavingsGoal};
    use crate::ledger::{LedgerWriter, WriterOptions};
    use rust_decimal_macros::dec;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add-goal "Vacation to Japan" XX1 5000"#).unwrap();
        assert_eq!(tokens, vec!["add-goal", "Vacation to Japan", "XX1", "5000"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line(r#"add-goal "Car XX1"#).is_err());
    }

    fn helper() -> CommandHelper {
        let mut ledger = Ledger::new();
        ledger.add_account(Account::new("XX1001", "Alex Smith", "Global Bank", CurrencyType::USD));
        ledger.add_account(Account::new("XX2002", "Sam Lee", "Metro Savings", CurrencyType::USD));
        ledger.add_goal(SavingsGoal::new("Vacation to Japan", "XX1001", dec!(5000), CurrencyType::USD));
        ledger.add_goal(SavingsGoal::new("Car", "XX2002", dec!(3000), CurrencyType::USD));

        let mut args: HashMap<&'static str, &'static [ArgKind]> = HashMap::new();
        args.insert("deposit", &[ArgKind::Account]);
        args.insert("goal-deposit", &[ArgKind::Account, ArgKind::Goal]);
        args.insert("config", &[ArgKind::Setting]);
        CommandHelper::new(
            vec!["withdraw", "deposit", "deposit", "goal-deposit", "config"],
            args,
            LedgerWriter::spawn(ledger, WriterOptions::default()),
        )
    }

    fn shown(pairs: &[Pair]) -> Vec<&str> {
        pairs.iter().map(|pair| pair.display.as_str()).collect()
    }

    #[test]
    fn command_names_are_sorted_and_unique() {
        let helper = helper();
        assert_eq!(helper.commands, vec!["config", "deposit", "goal-deposit", "withdraw"]);
        let (start, pairs) = helper.candidates("  de");
        assert_eq!(start, 2);
        assert_eq!(shown(&pairs), vec!["deposit"]);
    }

    #[test]
    fn account_positions_complete_from_the_ledger() {
        let (start, pairs) = helper().candidates("deposit XX2");
        assert_eq!(start, 8);
        assert_eq!(shown(&pairs), vec!["XX2002"]);

        let (_, pairs) = helper().candidates("deposit ");
        assert_eq!(shown(&pairs), vec!["XX1001", "XX2002"]);
    }

    #[test]
    fn goal_names_with_spaces_are_quoted() {
        let (start, pairs) = helper().candidates("goal-deposit XX1001 va");
        assert_eq!(start, 20);
        assert_eq!(shown(&pairs), vec!["Vacation to Japan"]);
        assert_eq!(pairs[0].replacement, "\"Vacation to Japan\"");
    }

    #[test]
    fn quoted_words_do_not_shift_positions() {
        let word = WordAt::parse(r#"goal-deposit "XX 1" "Vac"#);
        assert_eq!(word.index, 2);
        assert_eq!(word.command, Some("goal-deposit"));
        assert_eq!(word.text, "\"Vac");
    }

    #[test]
    fn undeclared_positions_offer_nothing() {
        assert!(helper().candidates("deposit XX1001 1").1.is_empty());
        assert!(helper().candidates("withdraw XX").1.is_empty());
        assert_eq!(shown(&helper().candidates("config de").1), vec!["default_currency"]);
    }
}
