use rust_decimal::Decimal;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::{ArgKind, CommandEntry};
use crate::core::services::GoalService;
use crate::domain::{Displayable, SavingsGoal};

use super::{amount_arg, balance_arg, expect_args};

const ADD_USAGE: &str = "add-goal <name> <account> <target> [saved]";
const DELETE_USAGE: &str = "delete-goal <name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("goals", "List savings goals", "goals", cmd_goals),
        CommandEntry::new("add-goal", "Create a savings goal", ADD_USAGE, cmd_add_goal)
            .with_args(&[ArgKind::Free, ArgKind::Account]),
        CommandEntry::new(
            "delete-goal",
            "Delete a savings goal",
            DELETE_USAGE,
            cmd_delete_goal,
        )
        .with_args(&[ArgKind::Goal]),
    ]
}

fn cmd_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.snapshot()?;
    let goals = GoalService::list(&ledger);
    output_section("Savings goals");
    if goals.is_empty() {
        io::print_info("No savings goals yet. Use `add-goal` or `refresh`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = goals
        .iter()
        .map(|goal| {
            let marker = if goal.is_reached() { " *" } else { "" };
            vec![
                goal.name.clone(),
                goal.account_number.clone(),
                goal.formatted_saved(),
                goal.formatted_target(),
                format!("{}%{marker}", goal.progress_percent().round_dp(1)),
            ]
        })
        .collect();
    io::print_info(render_table(
        &["Name", "Account", "Saved", "Target", "Progress"],
        &rows,
    ));
    Ok(())
}

fn cmd_add_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, ADD_USAGE)?;
    let target = amount_arg(args[2])?;
    let saved = match args.get(3) {
        Some(raw) => balance_arg(raw)?,
        None => Decimal::ZERO,
    };

    // Goals share the linked account's currency when it exists.
    let currency = context
        .snapshot()?
        .account(args[1])
        .map(|account| account.currency)
        .unwrap_or(context.settings.default_currency);

    let goal = SavingsGoal::new(args[0], args[1], target, currency).with_saved(saved);
    let label = goal.display_label();
    context.run(move |ledger| GoalService::add(ledger, goal))?;
    io::print_success(format!("Savings goal added: {label}"));
    Ok(())
}

fn cmd_delete_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, DELETE_USAGE)?;
    let name = args[0].to_string();
    let ledger = context.snapshot()?;
    let label = GoalService::find(&ledger, &name)?.display_label();
    if !context.confirm(&format!("Delete savings goal {label}?"))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.run(move |ledger| GoalService::remove(ledger, &name))?;
    io::print_success(format!("Savings goal deleted: {label}"));
    Ok(())
}
