use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::CurrencyType;
use crate::domain::{Account, SavingsGoal, Transaction};
use crate::errors::{EntityKind, LedgerError};

use super::mutator::{Applied, LedgerMutator};

/// In-memory state holder for accounts, savings goals and transaction history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(skip)]
    mutator: LedgerMutator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Balance and saved totals for one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyTotals {
    pub balance: Decimal,
    pub saved: Decimal,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `transaction` and, on success, commits the new balances and
    /// appends it to history. On failure nothing changes.
    pub fn submit(&mut self, transaction: Transaction) -> Result<Transaction, LedgerError> {
        let Applied {
            accounts,
            goals,
            transaction,
        } = match self
            .mutator
            .apply(&transaction, &self.accounts, &self.goals)
        {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!(
                    kind = %transaction.kind,
                    account = %transaction.account_number,
                    error = %err,
                    "Transaction rejected"
                );
                return Err(err);
            }
        };
        self.accounts = accounts;
        self.goals = goals;
        self.transactions.push(transaction.clone());
        self.touch();
        tracing::info!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "Transaction committed"
        );
        Ok(transaction)
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_goal(&mut self, goal: SavingsGoal) -> Uuid {
        let id = goal.id;
        self.goals.push(goal);
        self.touch();
        id
    }

    /// Appends records to history without applying them, as bulk generators do.
    pub fn append_history(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        self.transactions.extend(transactions);
        self.touch();
    }

    /// Swaps every collection at once, e.g. after regenerating simulated data.
    pub fn replace_all(
        &mut self,
        accounts: Vec<Account>,
        goals: Vec<SavingsGoal>,
        transactions: Vec<Transaction>,
    ) {
        self.accounts = accounts;
        self.goals = goals;
        self.transactions = transactions;
        self.touch();
    }

    pub fn remove_account(&mut self, account_number: &str) -> Result<Account, LedgerError> {
        let index = self
            .accounts
            .iter()
            .position(|account| account.account_number == account_number)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, account_number))?;
        self.touch();
        Ok(self.accounts.remove(index))
    }

    pub fn remove_goal(&mut self, name: &str) -> Result<SavingsGoal, LedgerError> {
        let index = self
            .goals
            .iter()
            .position(|goal| goal.name == name)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Goal, name))?;
        self.touch();
        Ok(self.goals.remove(index))
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction, LedgerError> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Transaction, id.to_string()))?;
        self.touch();
        Ok(self.transactions.remove(index))
    }

    pub fn account(&self, account_number: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.account_number == account_number)
    }

    pub fn goal(&self, name: &str) -> Option<&SavingsGoal> {
        self.goals.iter().find(|goal| goal.name == name)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Sums balances and saved amounts per currency, saturating at `Decimal::MAX`;
    /// amounts are never converted.
    pub fn totals(&self) -> BTreeMap<CurrencyType, CurrencyTotals> {
        let mut totals: BTreeMap<CurrencyType, CurrencyTotals> = BTreeMap::new();
        for account in &self.accounts {
            let entry = totals.entry(account.currency).or_default();
            entry.balance = entry.balance.saturating_add(account.balance);
        }
        for goal in &self.goals {
            let entry = totals.entry(goal.currency).or_default();
            entry.saved = entry.saved.saturating_add(goal.saved_amount);
        }
        totals
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;
    use rust_decimal_macros::dec;

    fn seeded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_account(
            Account::new("XX1", "Alex Smith", "Global Bank", CurrencyType::USD)
                .with_balance(dec!(250)),
        );
        ledger.add_account(
            Account::new("XX2", "Alex Smith", "Global Bank", CurrencyType::EUR)
                .with_balance(dec!(40)),
        );
        ledger.add_goal(
            SavingsGoal::new("Car", "XX1", dec!(1000), CurrencyType::USD).with_saved(dec!(60)),
        );
        ledger
    }

    #[test]
    fn submit_appends_history_on_success() {
        let mut ledger = seeded();
        let txn = Transaction::new(TransactionType::Withdraw, "XX1", dec!(50), CurrencyType::USD);
        let committed = ledger.submit(txn.clone()).unwrap();
        assert_eq!(committed.id, txn.id);
        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(ledger.account("XX1").unwrap().balance, dec!(200));
        assert!(ledger.updated_at.is_some());
    }

    #[test]
    fn rejected_submit_keeps_history_empty() {
        let mut ledger = seeded();
        let txn = Transaction::new(TransactionType::Withdraw, "XX2", dec!(50), CurrencyType::EUR);
        assert!(ledger.submit(txn).unwrap_err().is_insufficient_funds());
        assert_eq!(ledger.transaction_count(), 0);
        assert_eq!(ledger.account("XX2").unwrap().balance, dec!(40));
    }

    #[test]
    fn removal_of_unknown_entities_reports_not_found() {
        let mut ledger = seeded();
        assert!(matches!(
            ledger.remove_account("nope"),
            Err(LedgerError::NotFound { kind: EntityKind::Account, .. })
        ));
        assert!(matches!(
            ledger.remove_goal("nope"),
            Err(LedgerError::NotFound { kind: EntityKind::Goal, .. })
        ));
        assert!(ledger.remove_transaction(Uuid::new_v4()).is_err());
        assert_eq!(ledger.remove_goal("Car").unwrap().name, "Car");
        assert!(ledger.goals.is_empty());
    }

    #[test]
    fn totals_are_grouped_by_currency() {
        let totals = seeded().totals();
        assert_eq!(
            totals[&CurrencyType::USD],
            CurrencyTotals {
                balance: dec!(250),
                saved: dec!(60)
            }
        );
        assert_eq!(totals[&CurrencyType::EUR].balance, dec!(40));
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut ledger = Ledger::new();
        for number in ["XX1", "XX2"] {
            ledger.add_account(
                Account::new(number, "Alex Smith", "Global Bank", CurrencyType::USD)
                    .with_balance(Decimal::MAX),
            );
        }
        assert_eq!(ledger.totals()[&CurrencyType::USD].balance, Decimal::MAX);
    }

    #[test]
    fn appended_history_does_not_move_money() {
        let mut ledger = seeded();
        let generated = Transaction::new(TransactionType::Deposit, "XX1", dec!(5), CurrencyType::USD);
        ledger.append_history([generated]);
        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(ledger.account("XX1").unwrap().balance, dec!(250));
    }
}
