//! Form-level validation performed before anything reaches the ledger.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{Account, SavingsGoal, Transaction, TransactionType};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Field name to message map, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Parses a user-entered amount: digits with at most one decimal point, strictly positive.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Amount is required".into());
    }
    let well_formed = trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
        && trimmed.matches('.').count() <= 1
        && trimmed.chars().any(|ch| ch.is_ascii_digit());
    if !well_formed {
        return Err(format!("`{trimmed}` is not a valid amount"));
    }
    let amount =
        Decimal::from_str(trimmed).map_err(|err| format!("`{trimmed}` is not a valid amount: {err}"))?;
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than zero".into());
    }
    Ok(amount)
}

pub fn validate_transaction(transaction: &Transaction) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let kind = transaction.kind;

    if transaction.amount <= Decimal::ZERO {
        errors.add("amount", "Amount must be greater than zero");
    }
    if kind.touches_account() && is_blank(&transaction.account_number) {
        errors.add("account", "Account number is required");
    }
    if kind.is_goal() && is_blank_opt(&transaction.goal_name) {
        errors.add("goalName", "Goal name is required");
    }
    let to_account = matches!(kind, TransactionType::TransferOut | TransactionType::TransferOutTo);
    if to_account && is_blank_opt(&transaction.target_account_number) {
        errors.add("toAccount", "Target account number is required");
    }
    let to_goal = matches!(
        kind,
        TransactionType::TransferGoalOut | TransactionType::TransferGoalOutTo
    );
    if to_goal && is_blank_opt(&transaction.target_goal_name) {
        errors.add("toGoalName", "Target goal name is required");
    }
    if kind.needs_recipient_email() {
        let valid = transaction
            .target_user_email
            .as_deref()
            .is_some_and(is_valid_email);
        if !valid {
            errors.add("recipientEmail", "A valid recipient email is required");
        }
    }

    errors.into_result()
}

pub fn validate_account(account: &Account) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if is_blank(&account.account_number) {
        errors.add("accountNumber", "Account number is required");
    }
    if is_blank(&account.holder_name) {
        errors.add("holderName", "Holder name is required");
    }
    if is_blank(&account.bank_name) {
        errors.add("bankName", "Bank name is required");
    }
    errors.into_result()
}

pub fn validate_goal(goal: &SavingsGoal) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if is_blank(&goal.name) {
        errors.add("goalName", "Goal name is required");
    }
    if is_blank(&goal.account_number) {
        errors.add("account", "Linked account number is required");
    }
    if goal.target_amount <= Decimal::ZERO {
        errors.add("targetAmount", "Target amount must be greater than zero");
    }
    if goal.saved_amount < Decimal::ZERO {
        errors.add("savedAmount", "Saved amount cannot be negative");
    }
    errors.into_result()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, is_blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyType;
    use rust_decimal_macros::dec;

    #[test]
    fn email_pattern_matches_common_addresses() {
        assert!(is_valid_email("taylor.lee+bills@example.co"));
        assert!(!is_valid_email("taylor@localhost"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn parse_amount_accepts_plain_decimals() {
        assert_eq!(parse_amount(" 12.50 "), Ok(dec!(12.50)));
        assert_eq!(parse_amount("7"), Ok(dec!(7)));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("-4").is_err());
        assert!(parse_amount("0.00").is_err());
        assert!(parse_amount(".").is_err());
    }

    #[test]
    fn transfer_to_user_requires_recipient_email() {
        let txn = Transaction::new(TransactionType::TransferOutTo, "XX1", dec!(5), CurrencyType::USD)
            .with_target_account("XX2")
            .with_recipient("not-an-email");
        let errors = validate_transaction(&txn).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("recipientEmail").is_some());
    }

    #[test]
    fn transfers_to_another_user_need_a_recipient_target() {
        let to_account =
            Transaction::new(TransactionType::TransferOutTo, "XX1", dec!(5), CurrencyType::USD)
                .with_recipient("sam@example.com");
        let errors = validate_transaction(&to_account).unwrap_err();
        assert_eq!(errors.get("toAccount"), Some("Target account number is required"));
        assert!(validate_transaction(&to_account.with_target_account("XX2")).is_ok());

        let to_goal =
            Transaction::new(TransactionType::TransferGoalOutTo, "XX1", dec!(5), CurrencyType::USD)
                .with_goal("Trip")
                .with_recipient("sam@example.com");
        let errors = validate_transaction(&to_goal).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("toGoalName"), Some("Target goal name is required"));
        assert!(validate_transaction(&to_goal.with_target_goal("Boat")).is_ok());
    }

    #[test]
    fn goal_transfer_collects_every_missing_field() {
        let txn = Transaction::new(TransactionType::TransferGoalOut, "", dec!(0), CurrencyType::USD);
        let errors = validate_transaction(&txn).unwrap_err();
        assert!(errors.get("amount").is_some());
        assert!(errors.get("goalName").is_some());
        assert!(errors.get("toGoalName").is_some());
        assert!(errors.get("account").is_none());
        assert_eq!(
            errors.to_string(),
            "amount: Amount must be greater than zero; goalName: Goal name is required; \
             toGoalName: Target goal name is required"
        );
    }

    #[test]
    fn complete_deposit_passes() {
        let txn = Transaction::new(TransactionType::Deposit, "XX1", dec!(5), CurrencyType::USD);
        assert!(validate_transaction(&txn).is_ok());
    }

    #[test]
    fn goal_form_rejects_negative_saved_amount() {
        let goal = SavingsGoal::new("Trip", "XX1", dec!(100), CurrencyType::USD).with_saved(dec!(-1));
        let errors = validate_goal(&goal).unwrap_err();
        assert_eq!(errors.get("savedAmount"), Some("Saved amount cannot be negative"));
    }
}
