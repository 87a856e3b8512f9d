use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{format_amount, CurrencyType};
use crate::domain::common::{Displayable, Identifiable};

/// Closed set of transaction kinds; each selects one mutation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    TransferOut,
    TransferOutTo,
    DepositGoal,
    WithdrawGoal,
    TransferGoalOut,
    TransferGoalOutTo,
}

impl TransactionType {
    pub const ALL: [TransactionType; 8] = [
        TransactionType::Deposit,
        TransactionType::Withdraw,
        TransactionType::TransferOut,
        TransactionType::TransferOutTo,
        TransactionType::DepositGoal,
        TransactionType::WithdrawGoal,
        TransactionType::TransferGoalOut,
        TransactionType::TransferGoalOutTo,
    ];

    /// Wire name, e.g. `TRANSFER_OUT_TO`.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
            TransactionType::TransferOut => "TRANSFER_OUT",
            TransactionType::TransferOutTo => "TRANSFER_OUT_TO",
            TransactionType::DepositGoal => "DEPOSIT_GOAL",
            TransactionType::WithdrawGoal => "WITHDRAW_GOAL",
            TransactionType::TransferGoalOut => "TRANSFER_GOAL_OUT",
            TransactionType::TransferGoalOutTo => "TRANSFER_GOAL_OUT_TO",
        }
    }

    /// Human label with spaces instead of underscores.
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_goal(self) -> bool {
        matches!(
            self,
            TransactionType::DepositGoal
                | TransactionType::WithdrawGoal
                | TransactionType::TransferGoalOut
                | TransactionType::TransferGoalOutTo
        )
    }

    pub fn is_transfer(self) -> bool {
        matches!(
            self,
            TransactionType::TransferOut
                | TransactionType::TransferOutTo
                | TransactionType::TransferGoalOut
                | TransactionType::TransferGoalOutTo
        )
    }

    /// Transfers to another user have no credit leg in this ledger.
    pub fn needs_recipient_email(self) -> bool {
        matches!(
            self,
            TransactionType::TransferOutTo | TransactionType::TransferGoalOutTo
        )
    }

    /// Whether the rule reads or writes the source account.
    pub fn touches_account(self) -> bool {
        !matches!(
            self,
            TransactionType::TransferGoalOut | TransactionType::TransferGoalOutTo
        )
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown transaction type `{}`", s.trim()))
    }
}

/// A single ledger movement. Immutable once recorded; only deletion is supported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionType,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_goal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user_email: Option<String>,
    pub amount: Decimal,
    pub timestamp: NaiveDateTime,
    pub currency: CurrencyType,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        account_number: impl Into<String>,
        amount: Decimal,
        currency: CurrencyType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            account_number: account_number.into(),
            goal_name: None,
            target_account_number: None,
            target_goal_name: None,
            target_user_email: None,
            amount,
            timestamp: Local::now().naive_local(),
            currency,
        }
    }

    pub fn with_goal(mut self, goal_name: impl Into<String>) -> Self {
        self.goal_name = Some(goal_name.into());
        self
    }

    pub fn with_target_account(mut self, account_number: impl Into<String>) -> Self {
        self.target_account_number = Some(account_number.into());
        self
    }

    pub fn with_target_goal(mut self, goal_name: impl Into<String>) -> Self {
        self.target_goal_name = Some(goal_name.into());
        self
    }

    pub fn with_recipient(mut self, email: impl Into<String>) -> Self {
        self.target_user_email = Some(email.into());
        self
    }

    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount, self.currency)
    }

    /// True when the transaction moves money on the given account, on either leg.
    pub fn involves_account(&self, account_number: &str) -> bool {
        (self.kind.touches_account() && self.account_number == account_number)
            || self.target_account_number.as_deref() == Some(account_number)
    }

    /// True when the transaction moves money on the given goal, on either leg.
    pub fn involves_goal(&self, goal_name: &str) -> bool {
        self.goal_name.as_deref() == Some(goal_name)
            || self.target_goal_name.as_deref() == Some(goal_name)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} on {}",
            self.kind.label(),
            self.formatted_amount(),
            self.timestamp.format("%Y-%m-%d %H:%M")
        )
    }
}
