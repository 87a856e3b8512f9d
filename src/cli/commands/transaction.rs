use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::{ArgKind, CommandEntry};
use crate::core::services::TransactionService;
use crate::currency::CurrencyType;
use crate::domain::{Displayable, Transaction, TransactionType};
use crate::ledger::Ledger;

use super::{amount_arg, expect_args};

const LIST_USAGE: &str = "transactions [account <number> | goal <name>]";
const DEPOSIT_USAGE: &str = "deposit <account> <amount>";
const WITHDRAW_USAGE: &str = "withdraw <account> <amount>";
const TRANSFER_USAGE: &str = "transfer <from-account> <to-account> <amount>";
const TRANSFER_OUT_USAGE: &str = "transfer-out <account> <email> <amount> [recipient-account]";
const GOAL_DEPOSIT_USAGE: &str = "goal-deposit <account> <goal> <amount>";
const GOAL_WITHDRAW_USAGE: &str = "goal-withdraw <account> <goal> <amount>";
const GOAL_TRANSFER_USAGE: &str = "goal-transfer <from-goal> <to-goal> <amount>";
const GOAL_TRANSFER_OUT_USAGE: &str = "goal-transfer-out <goal> <email> <amount> [recipient-goal]";
const DELETE_USAGE: &str = "delete-transaction <position>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "transactions",
            "List transaction history, newest first",
            LIST_USAGE,
            cmd_transactions,
        ),
        CommandEntry::new(
            "deposit",
            "Add money to an account",
            DEPOSIT_USAGE,
            cmd_deposit,
        )
        .with_args(&[ArgKind::Account]),
        CommandEntry::new(
            "withdraw",
            "Take money out of an account",
            WITHDRAW_USAGE,
            cmd_withdraw,
        )
        .with_args(&[ArgKind::Account]),
        CommandEntry::new(
            "transfer",
            "Move money between two accounts",
            TRANSFER_USAGE,
            cmd_transfer,
        )
        .with_args(&[ArgKind::Account, ArgKind::Account]),
        CommandEntry::new(
            "transfer-out",
            "Send money from an account to another user",
            TRANSFER_OUT_USAGE,
            cmd_transfer_out,
        )
        .with_args(&[ArgKind::Account]),
        CommandEntry::new(
            "goal-deposit",
            "Move money from an account into a savings goal",
            GOAL_DEPOSIT_USAGE,
            cmd_goal_deposit,
        )
        .with_args(&[ArgKind::Account, ArgKind::Goal]),
        CommandEntry::new(
            "goal-withdraw",
            "Move money from a savings goal back to an account",
            GOAL_WITHDRAW_USAGE,
            cmd_goal_withdraw,
        )
        .with_args(&[ArgKind::Account, ArgKind::Goal]),
        CommandEntry::new(
            "goal-transfer",
            "Move savings between two goals",
            GOAL_TRANSFER_USAGE,
            cmd_goal_transfer,
        )
        .with_args(&[ArgKind::Goal, ArgKind::Goal]),
        CommandEntry::new(
            "goal-transfer-out",
            "Send savings from a goal to another user",
            GOAL_TRANSFER_OUT_USAGE,
            cmd_goal_transfer_out,
        )
        .with_args(&[ArgKind::Goal]),
        CommandEntry::new(
            "delete-transaction",
            "Delete a history entry (balances are not reverted)",
            DELETE_USAGE,
            cmd_delete_transaction,
        ),
    ]
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ledger = context.snapshot()?;
    let (title, transactions) = match args {
        [] => ("Transactions".to_string(), TransactionService::list(&ledger)),
        ["account", number, ..] => (
            format!("Transactions for account {number}"),
            TransactionService::history_for_account(&ledger, number),
        ),
        ["goal", name, ..] => (
            format!("Transactions for goal {name}"),
            TransactionService::history_for_goal(&ledger, name),
        ),
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "Usage: {LIST_USAGE}"
            )))
        }
    };

    output_section(title);
    if transactions.is_empty() {
        io::print_info("No transactions recorded.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .enumerate()
        .map(|(index, txn)| {
            vec![
                (index + 1).to_string(),
                txn.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                txn.kind.as_str().to_string(),
                txn.formatted_amount(),
                describe(txn),
            ]
        })
        .collect();
    io::print_info(render_table(
        &["#", "Date", "Type", "Amount", "Details"],
        &rows,
    ));
    Ok(())
}

fn cmd_deposit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, DEPOSIT_USAGE)?;
    account_transaction(context, TransactionType::Deposit, args[0], args[1])
}

fn cmd_withdraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, WITHDRAW_USAGE)?;
    account_transaction(context, TransactionType::Withdraw, args[0], args[1])
}

fn cmd_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, TRANSFER_USAGE)?;
    let amount = amount_arg(args[2])?;
    let currency = account_currency(context, args[0])?;
    let txn = Transaction::new(TransactionType::TransferOut, args[0], amount, currency)
        .with_target_account(args[1]);
    submit(context, txn)
}

fn cmd_transfer_out(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, TRANSFER_OUT_USAGE)?;
    let amount = amount_arg(args[2])?;
    let currency = account_currency(context, args[0])?;
    let target = match args.get(3) {
        Some(target) => target.to_string(),
        None => {
            let numbers: Vec<String> = context
                .simulator
                .accounts_for_email(args[1], currency)?
                .into_iter()
                .map(|account| account.account_number)
                .collect();
            pick_recipient_target(context, args[1], "account", numbers)?
        }
    };
    let txn = Transaction::new(TransactionType::TransferOutTo, args[0], amount, currency)
        .with_target_account(target)
        .with_recipient(args[1]);
    submit(context, txn)
}

fn cmd_goal_deposit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, GOAL_DEPOSIT_USAGE)?;
    let amount = amount_arg(args[2])?;
    let currency = account_currency(context, args[0])?;
    let txn =
        Transaction::new(TransactionType::DepositGoal, args[0], amount, currency).with_goal(args[1]);
    submit(context, txn)
}

fn cmd_goal_withdraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, GOAL_WITHDRAW_USAGE)?;
    let amount = amount_arg(args[2])?;
    let currency = account_currency(context, args[0])?;
    let txn = Transaction::new(TransactionType::WithdrawGoal, args[0], amount, currency)
        .with_goal(args[1]);
    submit(context, txn)
}

fn cmd_goal_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, GOAL_TRANSFER_USAGE)?;
    let amount = amount_arg(args[2])?;
    let (account, currency) = goal_origin(context, args[0])?;
    let txn = Transaction::new(TransactionType::TransferGoalOut, account, amount, currency)
        .with_goal(args[0])
        .with_target_goal(args[1]);
    submit(context, txn)
}

fn cmd_goal_transfer_out(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, GOAL_TRANSFER_OUT_USAGE)?;
    let amount = amount_arg(args[2])?;
    let (account, currency) = goal_origin(context, args[0])?;
    let target = match args.get(3) {
        Some(target) => target.to_string(),
        None => {
            let names: Vec<String> = context
                .simulator
                .goals_for_email(args[1], currency)?
                .into_iter()
                .map(|goal| goal.name)
                .collect();
            pick_recipient_target(context, args[1], "goal", names)?
        }
    };
    let txn = Transaction::new(TransactionType::TransferGoalOutTo, account, amount, currency)
        .with_goal(args[0])
        .with_target_goal(target)
        .with_recipient(args[1]);
    submit(context, txn)
}

fn cmd_delete_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, DELETE_USAGE)?;
    let position: usize = args[0].parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a valid position", args[0]))
    })?;
    let ledger = context.snapshot()?;
    let id = TransactionService::id_at(&ledger, position)?;
    let label = ledger
        .transaction(id)
        .map(|txn| txn.display_label())
        .unwrap_or_else(|| id.to_string());

    if !context.confirm(&format!("Delete transaction {label}?"))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.run(move |ledger| TransactionService::remove(ledger, id))?;
    io::print_success(format!("Transaction deleted: {label}"));
    io::print_info("Balances were not changed.");
    Ok(())
}

fn account_transaction(
    context: &mut ShellContext,
    kind: TransactionType,
    account: &str,
    raw_amount: &str,
) -> CommandResult {
    let amount = amount_arg(raw_amount)?;
    let currency = account_currency(context, account)?;
    submit(context, Transaction::new(kind, account, amount, currency))
}

fn submit(context: &mut ShellContext, transaction: Transaction) -> CommandResult {
    let committed = context.run(move |ledger| TransactionService::submit(ledger, transaction))?;
    io::print_success(format!("Recorded {}", committed.display_label()));
    print_affected(&context.snapshot()?, &committed);
    Ok(())
}

fn print_affected(ledger: &Ledger, txn: &Transaction) {
    let target = txn.target_account_number.as_ref().filter(|_| !txn.kind.needs_recipient_email());
    let accounts = [Some(&txn.account_number), target];
    if txn.kind.touches_account() {
        for number in accounts.into_iter().flatten() {
            if let Some(account) = ledger.account(number) {
                io::print_info(format!(
                    "  Account {} balance: {}",
                    account.account_number,
                    account.formatted_balance()
                ));
            }
        }
    }
    let target = txn.target_goal_name.as_ref().filter(|_| !txn.kind.needs_recipient_email());
    for name in [txn.goal_name.as_ref(), target]
        .into_iter()
        .flatten()
    {
        if let Some(goal) = ledger.goal(name) {
            io::print_info(format!(
                "  Goal {} saved: {} of {}",
                goal.name,
                goal.formatted_saved(),
                goal.formatted_target()
            ));
        }
    }
}

/// Currency of the named account, or the configured default when unknown.
fn account_currency(context: &ShellContext, account: &str) -> Result<CurrencyType, CommandError> {
    Ok(context
        .snapshot()?
        .account(account)
        .map(|account| account.currency)
        .unwrap_or(context.settings.default_currency))
}

/// Linked account number and currency of the named goal.
fn goal_origin(context: &ShellContext, goal: &str) -> Result<(String, CurrencyType), CommandError> {
    Ok(context
        .snapshot()?
        .goal(goal)
        .map(|goal| (goal.account_number.clone(), goal.currency))
        .unwrap_or_else(|| (String::new(), context.settings.default_currency)))
}

/// Picks which of the recipient's accounts or goals receives the money.
fn pick_recipient_target(
    context: &ShellContext,
    email: &str,
    what: &str,
    options: Vec<String>,
) -> Result<String, CommandError> {
    if options.is_empty() {
        return Err(CommandError::Message(format!(
            "Recipient {email} has no {what} to receive the transfer"
        )));
    }
    let index = context.choose(&format!("Recipient {what} for {email}"), &options)?;
    let choice = options.into_iter().nth(index).unwrap_or_default();
    io::print_info(format!("Recipient {what}: {choice}"));
    Ok(choice)
}

fn describe(txn: &Transaction) -> String {
    let goal = txn.goal_name.as_deref().unwrap_or("?");
    match txn.kind {
        TransactionType::Deposit | TransactionType::Withdraw => txn.account_number.clone(),
        TransactionType::TransferOut => format!(
            "{} -> {}",
            txn.account_number,
            txn.target_account_number.as_deref().unwrap_or("?")
        ),
        TransactionType::TransferOutTo => format!(
            "{} -> {} ({})",
            txn.account_number,
            txn.target_account_number.as_deref().unwrap_or("?"),
            txn.target_user_email.as_deref().unwrap_or("?")
        ),
        TransactionType::DepositGoal => format!("{} -> goal {goal}", txn.account_number),
        TransactionType::WithdrawGoal => format!("goal {goal} -> {}", txn.account_number),
        TransactionType::TransferGoalOut => format!(
            "goal {goal} -> goal {}",
            txn.target_goal_name.as_deref().unwrap_or("?")
        ),
        TransactionType::TransferGoalOutTo => format!(
            "goal {goal} -> goal {} ({})",
            txn.target_goal_name.as_deref().unwrap_or("?"),
            txn.target_user_email.as_deref().unwrap_or("?")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn details_name_both_legs() {
        let txn = Transaction::new(TransactionType::TransferOut, "XX1", dec!(5), CurrencyType::USD)
            .with_target_account("XX2");
        assert_eq!(describe(&txn), "XX1 -> XX2");

        let txn = Transaction::new(TransactionType::WithdrawGoal, "XX1", dec!(5), CurrencyType::USD)
            .with_goal("Car");
        assert_eq!(describe(&txn), "goal Car -> XX1");
    }

    #[test]
    fn details_show_the_recipient_target() {
        let txn = Transaction::new(TransactionType::TransferOutTo, "XX1", dec!(5), CurrencyType::USD)
            .with_target_account("XX77")
            .with_recipient("sam@example.com");
        assert_eq!(describe(&txn), "XX1 -> XX77 (sam@example.com)");

        let txn =
            Transaction::new(TransactionType::TransferGoalOutTo, "XX1", dec!(5), CurrencyType::USD)
                .with_goal("Car")
                .with_target_goal("Boat")
                .with_recipient("sam@example.com");
        assert_eq!(describe(&txn), "goal Car -> goal Boat (sam@example.com)");
    }
}
