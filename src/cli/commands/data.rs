use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::currency::format_amount;
use crate::simulation::{DEFAULT_ACCOUNTS, DEFAULT_GOALS, DEFAULT_TRANSACTIONS};

use super::{count_arg, expect_args};

const GENERATE_USAGE: &str = "generate <accounts|goals|transactions> [count]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "generate",
            "Add simulated accounts, goals or history",
            GENERATE_USAGE,
            cmd_generate,
        ),
        CommandEntry::new(
            "refresh",
            "Replace all data with a fresh simulated data set",
            "refresh",
            cmd_refresh,
        ),
        CommandEntry::new(
            "summary",
            "Show totals per currency",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_generate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, GENERATE_USAGE)?;
    let ledger = context.snapshot()?;
    let currency = context.settings.default_currency;

    match args[0].to_lowercase().as_str() {
        "accounts" => {
            let count = count_arg(args.get(1), DEFAULT_ACCOUNTS)?;
            let accounts = context.simulator.accounts(currency, count);
            let added = context.run(move |ledger| {
                let mut added = 0;
                for account in accounts {
                    if ledger.account(&account.account_number).is_none() {
                        ledger.add_account(account);
                        added += 1;
                    }
                }
                Ok(added)
            })?;
            io::print_success(format!("Generated {added} accounts."));
        }
        "goals" => {
            if ledger.accounts.is_empty() {
                return Err(CommandError::Message(
                    "Goals need at least one account to link to.".into(),
                ));
            }
            let count = count_arg(args.get(1), DEFAULT_GOALS)?;
            let goals = context
                .simulator
                .goals_avoiding(&ledger.accounts, count, &ledger.goals);
            let added = goals.len();
            context.run(move |ledger| {
                for goal in goals {
                    ledger.add_goal(goal);
                }
                Ok(())
            })?;
            io::print_success(format!("Generated {added} savings goals."));
        }
        "transactions" => {
            if ledger.accounts.is_empty() {
                return Err(CommandError::Message(
                    "Transactions need at least one account.".into(),
                ));
            }
            let count = count_arg(args.get(1), DEFAULT_TRANSACTIONS)?;
            let transactions = context
                .simulator
                .transactions(&ledger.accounts, &ledger.goals, count);
            let added = transactions.len();
            context.run(move |ledger| {
                ledger.append_history(transactions);
                Ok(())
            })?;
            io::print_success(format!(
                "Generated {added} transactions (history only, balances unchanged)."
            ));
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Cannot generate `{other}`. Usage: {GENERATE_USAGE}"
            )))
        }
    }
    Ok(())
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Replace all accounts, goals and history with new sample data?")? {
        io::print_info("Refresh cancelled.");
        return Ok(());
    }
    let (accounts, goals, transactions) = context
        .simulator
        .dataset(context.settings.default_currency);
    let counts = (accounts.len(), goals.len(), transactions.len());
    context.run(move |ledger| {
        ledger.replace_all(accounts, goals, transactions);
        Ok(())
    })?;
    io::print_success(format!(
        "Data refreshed: {} accounts, {} savings goals, {} transactions.",
        counts.0, counts.1, counts.2
    ));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.snapshot()?;
    output_section("Summary");
    io::print_info(format!("  Accounts     : {}", ledger.accounts.len()));
    io::print_info(format!("  Savings goals: {}", ledger.goals.len()));
    io::print_info(format!("  Transactions : {}", ledger.transaction_count()));
    if let Some(updated) = ledger.updated_at {
        io::print_info(format!(
            "  Last change  : {}",
            updated.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    let totals = ledger.totals();
    if totals.is_empty() {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|(currency, totals)| {
            vec![
                currency.code().to_string(),
                format_amount(totals.balance, *currency),
                format_amount(totals.saved, *currency),
            ]
        })
        .collect();
    io::print_info(render_table(&["Currency", "Balance", "Saved"], &rows));
    Ok(())
}
