#![allow(dead_code)]

use std::sync::Mutex;

use finance_core::{
    currency::CurrencyType,
    domain::{Account, SavingsGoal},
    ledger::Ledger,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn account(number: &str, balance: Decimal) -> Account {
    Account::new(number, "Taylor Wilson", "Metro Savings", CurrencyType::USD).with_balance(balance)
}

pub fn goal(name: &str, saved: Decimal) -> SavingsGoal {
    SavingsGoal::new(name, "XX1", Decimal::new(1_000_000, 2), CurrencyType::USD).with_saved(saved)
}

pub fn ledger_with(accounts: Vec<Account>, goals: Vec<SavingsGoal>) -> Ledger {
    let mut ledger = Ledger::new();
    ledger.replace_all(accounts, goals, Vec::new());
    ledger
}
