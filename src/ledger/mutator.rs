//! Transaction application rules.
//!
//! The mutator never touches the caller's collections: it works on copies and
//! hands the updated collections back only when every leg succeeded, so a
//! rejected transaction leaves the ledger exactly as it was.

use rust_decimal::Decimal;

use crate::domain::{Account, Funded, Keyed, SavingsGoal, Transaction, TransactionType};
use crate::errors::{EntityKind, LedgerError};

/// Outcome of a successful application.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub accounts: Vec<Account>,
    pub goals: Vec<SavingsGoal>,
    pub transaction: Transaction,
}

/// Applies one transaction's balance effects to accounts and savings goals.
#[derive(Debug, Default, Clone, Copy)]
pub struct LedgerMutator;

impl LedgerMutator {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(
        &self,
        transaction: &Transaction,
        accounts: &[Account],
        goals: &[SavingsGoal],
    ) -> Result<Applied, LedgerError> {
        let amount = transaction.amount;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let mut accounts = accounts.to_vec();
        let mut goals = goals.to_vec();
        let source = transaction.account_number.as_str();

        match transaction.kind {
            TransactionType::Deposit => {
                credit(&mut accounts, EntityKind::Account, source, amount)?;
            }
            TransactionType::Withdraw | TransactionType::TransferOutTo => {
                debit(&mut accounts, EntityKind::Account, source, amount)?;
            }
            TransactionType::TransferOut => {
                let target = required(
                    &transaction.target_account_number,
                    "target account number",
                )?;
                ensure_distinct(source, target)?;
                debit(&mut accounts, EntityKind::Account, source, amount)?;
                credit(&mut accounts, EntityKind::Account, target, amount)?;
            }
            TransactionType::DepositGoal => {
                let goal = required(&transaction.goal_name, "goal name")?;
                debit(&mut accounts, EntityKind::Account, source, amount)?;
                credit(&mut goals, EntityKind::Goal, goal, amount)?;
            }
            TransactionType::WithdrawGoal => {
                let goal = required(&transaction.goal_name, "goal name")?;
                debit(&mut goals, EntityKind::Goal, goal, amount)?;
                credit(&mut accounts, EntityKind::Account, source, amount)?;
            }
            TransactionType::TransferGoalOut => {
                let goal = required(&transaction.goal_name, "goal name")?;
                let target = required(&transaction.target_goal_name, "target goal name")?;
                ensure_distinct(goal, target)?;
                debit(&mut goals, EntityKind::Goal, goal, amount)?;
                credit(&mut goals, EntityKind::Goal, target, amount)?;
            }
            TransactionType::TransferGoalOutTo => {
                let goal = required(&transaction.goal_name, "goal name")?;
                debit(&mut goals, EntityKind::Goal, goal, amount)?;
            }
        }

        Ok(Applied {
            accounts,
            goals,
            transaction: transaction.clone(),
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, LedgerError> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| LedgerError::Validation(format!("{field} is required")))
}

fn ensure_distinct(source: &str, target: &str) -> Result<(), LedgerError> {
    if source == target {
        return Err(LedgerError::Validation(format!(
            "source and target `{source}` must differ"
        )));
    }
    Ok(())
}

/// Subtracts `amount` from every entity keyed `key`. Each match must cover the
/// amount on its own; the copies are left untouched when any of them cannot.
fn debit<T: Keyed + Funded>(
    items: &mut [T],
    kind: EntityKind,
    key: &str,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let mut matched = false;
    for item in items.iter().filter(|item| item.matches_key(key)) {
        matched = true;
        if item.funds() < amount {
            return Err(LedgerError::InsufficientFunds {
                kind,
                key: key.to_string(),
                available: item.funds(),
                requested: amount,
            });
        }
    }
    if !matched {
        return Err(LedgerError::not_found(kind, key));
    }
    for item in items.iter_mut().filter(|item| item.matches_key(key)) {
        *item.funds_mut() -= amount;
    }
    Ok(())
}

fn credit<T: Keyed + Funded>(
    items: &mut [T],
    kind: EntityKind,
    key: &str,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let mut matched = false;
    for item in items.iter_mut().filter(|item| item.matches_key(key)) {
        let funds = item.funds_mut();
        *funds = funds.checked_add(amount).ok_or_else(|| {
            LedgerError::Validation(format!("amount {amount} overflows the funds of {kind} `{key}`"))
        })?;
        matched = true;
    }
    if matched {
        Ok(())
    } else {
        Err(LedgerError::not_found(kind, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyType;
    use rust_decimal_macros::dec;

    fn account(number: &str, balance: Decimal) -> Account {
        Account::new(number, "Sam Lee", "Metro Savings", CurrencyType::USD).with_balance(balance)
    }

    fn goal(name: &str, saved: Decimal) -> SavingsGoal {
        SavingsGoal::new(name, "XX1", dec!(10000), CurrencyType::USD).with_saved(saved)
    }

    fn txn(kind: TransactionType, account_number: &str, amount: Decimal) -> Transaction {
        Transaction::new(kind, account_number, amount, CurrencyType::USD)
    }

    #[test]
    fn deposit_credits_matching_account_only() {
        let accounts = vec![account("XX1", dec!(10.10)), account("XX2", dec!(5))];
        let applied = LedgerMutator
            .apply(&txn(TransactionType::Deposit, "XX1", dec!(0.25)), &accounts, &[])
            .unwrap();
        assert_eq!(applied.accounts[0].balance, dec!(10.35));
        assert_eq!(applied.accounts[1].balance, dec!(5));
    }

    #[test]
    fn transfer_out_to_has_no_credit_leg() {
        let accounts = vec![account("XX1", dec!(100)), account("XX2", dec!(0))];
        let transaction = txn(TransactionType::TransferOutTo, "XX1", dec!(40))
            .with_target_account("XX2")
            .with_recipient("casey@example.com");
        let applied = LedgerMutator.apply(&transaction, &accounts, &[]).unwrap();
        assert_eq!(applied.accounts[0].balance, dec!(60));
        assert_eq!(applied.accounts[1].balance, dec!(0));
    }

    #[test]
    fn deposit_goal_moves_money_from_account_to_goal() {
        let accounts = vec![account("XX1", dec!(100))];
        let goals = vec![goal("Car", dec!(20))];
        let transaction = txn(TransactionType::DepositGoal, "XX1", dec!(30)).with_goal("Car");
        let applied = LedgerMutator.apply(&transaction, &accounts, &goals).unwrap();
        assert_eq!(applied.accounts[0].balance, dec!(70));
        assert_eq!(applied.goals[0].saved_amount, dec!(50));
    }

    #[test]
    fn withdraw_goal_checks_saved_amount() {
        let accounts = vec![account("XX1", dec!(0))];
        let goals = vec![goal("Car", dec!(20))];
        let transaction = txn(TransactionType::WithdrawGoal, "XX1", dec!(25)).with_goal("Car");
        let err = LedgerMutator
            .apply(&transaction, &accounts, &goals)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                kind: EntityKind::Goal,
                ..
            }
        ));

        let transaction = txn(TransactionType::WithdrawGoal, "XX1", dec!(20)).with_goal("Car");
        let applied = LedgerMutator.apply(&transaction, &accounts, &goals).unwrap();
        assert_eq!(applied.accounts[0].balance, dec!(20));
        assert_eq!(applied.goals[0].saved_amount, dec!(0));
    }

    #[test]
    fn goal_transfer_out_to_only_debits() {
        let goals = vec![goal("Trip", dec!(80)), goal("Car", dec!(0))];
        let transaction = txn(TransactionType::TransferGoalOutTo, "", dec!(80))
            .with_goal("Trip")
            .with_recipient("alex@example.com");
        let applied = LedgerMutator.apply(&transaction, &[], &goals).unwrap();
        assert_eq!(applied.goals[0].saved_amount, dec!(0));
        assert_eq!(applied.goals[1].saved_amount, dec!(0));
    }

    #[test]
    fn missing_target_account_aborts_transfer() {
        let accounts = vec![account("XX1", dec!(100))];
        let transaction =
            txn(TransactionType::TransferOut, "XX1", dec!(10)).with_target_account("XX9");
        let err = LedgerMutator
            .apply(&transaction, &accounts, &[])
            .unwrap_err();
        assert_eq!(err, LedgerError::not_found(EntityKind::Account, "XX9"));
    }

    #[test]
    fn goal_types_require_goal_name() {
        let accounts = vec![account("XX1", dec!(100))];
        let err = LedgerMutator
            .apply(&txn(TransactionType::DepositGoal, "XX1", dec!(10)), &accounts, &[])
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref message) if message.contains("goal name")));
    }

    #[test]
    fn self_transfer_is_rejected() {
        let accounts = vec![account("XX1", dec!(100))];
        let transaction =
            txn(TransactionType::TransferOut, "XX1", dec!(10)).with_target_account("XX1");
        let err = LedgerMutator
            .apply(&transaction, &accounts, &[])
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let accounts = vec![account("XX1", dec!(100))];
        for amount in [dec!(0), dec!(-5)] {
            let err = LedgerMutator
                .apply(&txn(TransactionType::Deposit, "XX1", amount), &accounts, &[])
                .unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)));
        }
    }

    #[test]
    fn exact_balance_can_be_withdrawn() {
        let accounts = vec![account("XX1", dec!(99.99))];
        let applied = LedgerMutator
            .apply(&txn(TransactionType::Withdraw, "XX1", dec!(99.99)), &accounts, &[])
            .unwrap();
        assert_eq!(applied.accounts[0].balance, Decimal::ZERO);
    }

    #[test]
    fn credit_overflow_is_rejected_without_panicking() {
        let accounts = vec![account("XX1", dec!(1))];
        let err = LedgerMutator
            .apply(&txn(TransactionType::Deposit, "XX1", Decimal::MAX), &accounts, &[])
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref message) if message.contains("overflows")));
        assert_eq!(accounts[0].balance, dec!(1));

        let goals = vec![goal("Car", Decimal::MAX)];
        let err = LedgerMutator
            .apply(
                &txn(TransactionType::DepositGoal, "XX1", dec!(1)).with_goal("Car"),
                &accounts,
                &goals,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(goals[0].saved_amount, Decimal::MAX);
    }
}
