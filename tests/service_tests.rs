mod common;

use common::{account, goal};
use finance_core::{
    core::services::{AccountService, GoalService, ServiceError, TransactionService},
    currency::CurrencyType,
    domain::{Transaction, TransactionType},
    ledger::Ledger,
    LedgerError,
};
use rust_decimal_macros::dec;

fn prepared_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    AccountService::add(&mut ledger, account("XX1", dec!(1000))).unwrap();
    AccountService::add(&mut ledger, account("XX2", dec!(500))).unwrap();
    GoalService::add(&mut ledger, goal("Emergency Fund", dec!(100))).unwrap();
    ledger
}

#[test]
fn transfer_through_services_records_history() {
    let mut ledger = prepared_ledger();
    let transfer = Transaction::new(TransactionType::TransferOut, "XX1", dec!(300), CurrencyType::USD)
        .with_target_account("XX2");
    TransactionService::submit(&mut ledger, transfer).unwrap();

    assert_eq!(AccountService::find(&ledger, "XX1").unwrap().balance, dec!(700));
    assert_eq!(AccountService::find(&ledger, "XX2").unwrap().balance, dec!(800));
    assert_eq!(TransactionService::list(&ledger).len(), 1);
    assert_eq!(TransactionService::history_for_account(&ledger, "XX2").len(), 1);
}

#[test]
fn failed_withdraw_leaves_no_record() {
    let mut ledger = prepared_ledger();
    let withdraw = Transaction::new(TransactionType::Withdraw, "XX2", dec!(500.01), CurrencyType::USD);
    let err = TransactionService::submit(&mut ledger, withdraw).unwrap_err();

    assert!(matches!(err, ServiceError::Ledger(LedgerError::InsufficientFunds { .. })));
    assert_eq!(AccountService::find(&ledger, "XX2").unwrap().balance, dec!(500));
    assert!(TransactionService::list(&ledger).is_empty());
}

#[test]
fn recipient_email_is_validated_before_debit() {
    let mut ledger = prepared_ledger();
    let send = Transaction::new(TransactionType::TransferOutTo, "XX1", dec!(10), CurrencyType::USD)
        .with_recipient("not-an-email");
    match TransactionService::submit(&mut ledger, send).unwrap_err() {
        ServiceError::Validation(errors) => assert!(errors.get("recipientEmail").is_some()),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(AccountService::find(&ledger, "XX1").unwrap().balance, dec!(1000));
}

#[test]
fn goal_savings_flow_and_totals() {
    let mut ledger = prepared_ledger();
    let deposit = Transaction::new(TransactionType::DepositGoal, "XX1", dec!(250), CurrencyType::USD)
        .with_goal("Emergency Fund");
    TransactionService::submit(&mut ledger, deposit).unwrap();

    let goal = GoalService::find(&ledger, "Emergency Fund").unwrap();
    assert_eq!(goal.saved_amount, dec!(350));

    let totals = ledger.totals();
    let usd = totals.get(&CurrencyType::USD).unwrap();
    assert_eq!(usd.balance, dec!(1250));
    assert_eq!(usd.saved, dec!(350));
    assert_eq!(TransactionService::history_for_goal(&ledger, "Emergency Fund").len(), 1);
}

#[test]
fn removing_an_account_keeps_its_history() {
    let mut ledger = prepared_ledger();
    let deposit = Transaction::new(TransactionType::Deposit, "XX2", dec!(5), CurrencyType::USD);
    TransactionService::submit(&mut ledger, deposit).unwrap();

    AccountService::remove(&mut ledger, "XX2").unwrap();
    assert_eq!(AccountService::list(&ledger).len(), 1);
    assert_eq!(TransactionService::history_for_account(&ledger, "XX2").len(), 1);

    let again = Transaction::new(TransactionType::Deposit, "XX2", dec!(5), CurrencyType::USD);
    assert!(matches!(
        TransactionService::submit(&mut ledger, again),
        Err(ServiceError::Ledger(LedgerError::NotFound { .. }))
    ));
}
