//! Business logic helpers for recording transactions.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::core::validation::validate_transaction;
use crate::domain::Transaction;
use crate::ledger::Ledger;

/// Validates transaction forms and routes them through the ledger mutator.
pub struct TransactionService;

impl TransactionService {
    /// Validates `transaction`, applies it and returns the committed record.
    pub fn submit(ledger: &mut Ledger, transaction: Transaction) -> ServiceResult<Transaction> {
        validate_transaction(&transaction)?;
        Ok(ledger.submit(transaction)?)
    }

    /// Deletes a history entry. Balances are not reverted.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Transaction> {
        Ok(ledger.remove_transaction(id)?)
    }

    /// Resolves a 1-based position in the newest-first listing.
    pub fn id_at(ledger: &Ledger, position: usize) -> ServiceResult<Uuid> {
        Self::list(ledger)
            .get(position.wrapping_sub(1))
            .map(|txn| txn.id)
            .ok_or_else(|| ServiceError::Invalid(format!("No transaction at position {position}")))
    }

    /// History ordered newest first.
    pub fn list(ledger: &Ledger) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = ledger.transactions.iter().collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions
    }

    pub fn history_for_account<'a>(ledger: &'a Ledger, account_number: &str) -> Vec<&'a Transaction> {
        Self::list(ledger)
            .into_iter()
            .filter(|txn| txn.involves_account(account_number))
            .collect()
    }

    pub fn history_for_goal<'a>(ledger: &'a Ledger, goal_name: &str) -> Vec<&'a Transaction> {
        Self::list(ledger)
            .into_iter()
            .filter(|txn| txn.involves_goal(goal_name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyType;
    use crate::domain::{Account, SavingsGoal, TransactionType};
    use crate::errors::LedgerError;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_account(
            Account::new("XX1", "Jordan Lee", "Global Bank", CurrencyType::USD)
                .with_balance(dec!(500)),
        );
        ledger.add_goal(
            SavingsGoal::new("Home Renovation", "XX1", dec!(9000), CurrencyType::USD)
                .with_saved(dec!(100)),
        );
        ledger
    }

    #[test]
    fn validation_runs_before_the_mutator() {
        let mut ledger = ledger();
        let txn = Transaction::new(TransactionType::TransferOutTo, "XX1", dec!(10), CurrencyType::USD);
        let err = TransactionService::submit(&mut ledger, txn).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(ledger.account("XX1").unwrap().balance, dec!(500));
    }

    #[test]
    fn ledger_errors_are_wrapped() {
        let mut ledger = ledger();
        let txn = Transaction::new(TransactionType::Withdraw, "XX1", dec!(501), CurrencyType::USD);
        let err = TransactionService::submit(&mut ledger, txn).unwrap_err();
        assert!(matches!(err, ServiceError::Ledger(ref inner) if inner.is_insufficient_funds()));
    }

    #[test]
    fn remove_returns_deleted_transaction_without_reverting() {
        let mut ledger = ledger();
        let txn = Transaction::new(TransactionType::Deposit, "XX1", dec!(25), CurrencyType::USD);
        let committed = TransactionService::submit(&mut ledger, txn).unwrap();

        let removed = TransactionService::remove(&mut ledger, committed.id).unwrap();
        assert_eq!(removed.id, committed.id);
        assert!(ledger.transaction(committed.id).is_none());
        assert_eq!(ledger.account("XX1").unwrap().balance, dec!(525));
        assert!(matches!(
            TransactionService::remove(&mut ledger, committed.id),
            Err(ServiceError::Ledger(LedgerError::NotFound { .. }))
        ));
    }

    #[test]
    fn listing_is_newest_first_and_positions_are_one_based() {
        let mut ledger = ledger();
        let mut older = Transaction::new(TransactionType::Deposit, "XX1", dec!(1), CurrencyType::USD);
        older.timestamp -= Duration::hours(3);
        let newer = Transaction::new(TransactionType::Deposit, "XX1", dec!(2), CurrencyType::USD);
        ledger.append_history([older.clone(), newer.clone()]);

        assert_eq!(TransactionService::id_at(&ledger, 1).unwrap(), newer.id);
        assert_eq!(TransactionService::id_at(&ledger, 2).unwrap(), older.id);
        assert!(TransactionService::id_at(&ledger, 0).is_err());
        assert!(TransactionService::id_at(&ledger, 3).is_err());
    }

    #[test]
    fn goal_history_includes_both_legs() {
        let mut ledger = ledger();
        ledger.add_goal(SavingsGoal::new("Car", "XX1", dec!(100), CurrencyType::USD));
        let txn = Transaction::new(TransactionType::TransferGoalOut, "XX1", dec!(50), CurrencyType::USD)
            .with_goal("Home Renovation")
            .with_target_goal("Car");
        TransactionService::submit(&mut ledger, txn).unwrap();

        assert_eq!(TransactionService::history_for_goal(&ledger, "Car").len(), 1);
        assert_eq!(TransactionService::history_for_goal(&ledger, "Home Renovation").len(), 1);
        assert!(TransactionService::history_for_account(&ledger, "XX1").is_empty());
    }
}
