use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{format_amount, CurrencyType};
use crate::domain::common::*;

/// A bank account tracked by the ledger. `account_number` is the matching key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub account_number: String,
    pub holder_name: String,
    pub bank_name: String,
    pub balance: Decimal,
    pub currency: CurrencyType,
    pub created_at: NaiveDate,
}

impl Account {
    /// Creates an account with a zero balance, dated today.
    pub fn new(
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
        bank_name: impl Into<String>,
        currency: CurrencyType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number: account_number.into(),
            holder_name: holder_name.into(),
            bank_name: bank_name.into(),
            balance: Decimal::ZERO,
            currency,
            created_at: Local::now().date_naive(),
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn formatted_balance(&self) -> String {
        format_amount(self.balance, self.currency)
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Account {
    fn key(&self) -> &str {
        &self.account_number
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!(
            "{} ({} - {})",
            self.account_number, self.bank_name, self.holder_name
        )
    }
}

impl Funded for Account {
    fn funds(&self) -> Decimal {
        self.balance
    }

    fn funds_mut(&mut self) -> &mut Decimal {
        &mut self.balance
    }
}
