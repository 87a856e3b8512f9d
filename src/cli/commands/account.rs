use rust_decimal::Decimal;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::{ArgKind, CommandEntry};
use crate::core::services::{AccountService, TransactionService};
use crate::currency::CurrencyType;
use crate::domain::{Account, Displayable};

use super::{balance_arg, expect_args};

const ADD_USAGE: &str = "add-account <number> <holder> <bank> [balance] [currency]";
const DELETE_USAGE: &str = "delete-account <number>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("accounts", "List accounts", "accounts", cmd_accounts),
        CommandEntry::new("add-account", "Create an account", ADD_USAGE, cmd_add_account),
        CommandEntry::new(
            "delete-account",
            "Delete an account (history is kept)",
            DELETE_USAGE,
            cmd_delete_account,
        )
        .with_args(&[ArgKind::Account]),
    ]
}

fn cmd_accounts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.snapshot()?;
    let accounts = AccountService::list(&ledger);
    output_section("Accounts");
    if accounts.is_empty() {
        io::print_info("No accounts yet. Use `add-account` or `refresh`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|account| {
            vec![
                account.account_number.clone(),
                account.holder_name.clone(),
                account.bank_name.clone(),
                account.formatted_balance(),
                TransactionService::history_for_account(&ledger, &account.account_number)
                    .len()
                    .to_string(),
            ]
        })
        .collect();
    io::print_info(render_table(
        &["Number", "Holder", "Bank", "Balance", "Txns"],
        &rows,
    ));
    Ok(())
}

fn cmd_add_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, ADD_USAGE)?;
    let balance = match args.get(3) {
        Some(raw) => balance_arg(raw)?,
        None => Decimal::ZERO,
    };
    let currency = args
        .get(4)
        .map(|code| CurrencyType::find(code))
        .unwrap_or(context.settings.default_currency);

    let account = Account::new(args[0], args[1], args[2], currency).with_balance(balance);
    let label = account.display_label();
    context.run(move |ledger| AccountService::add(ledger, account))?;
    io::print_success(format!("Account added: {label}"));
    Ok(())
}

fn cmd_delete_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, DELETE_USAGE)?;
    let number = args[0].to_string();
    let ledger = context.snapshot()?;
    let label = AccountService::find(&ledger, &number)?.display_label();
    if !context.confirm(&format!("Delete account {label}?"))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.run(move |ledger| AccountService::remove(ledger, &number))?;
    io::print_success(format!("Account deleted: {label}"));
    Ok(())
}
