use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{format_amount, CurrencyType};
use crate::domain::common::*;

/// A savings goal. Goals are matched by `name`; `account_number` is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub account_number: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub currency: CurrencyType,
    pub created_at: NaiveDate,
}

impl SavingsGoal {
    /// Creates an empty goal linked to `account_number`.
    pub fn new(
        name: impl Into<String>,
        account_number: impl Into<String>,
        target_amount: Decimal,
        currency: CurrencyType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            account_number: account_number.into(),
            target_amount,
            saved_amount: Decimal::ZERO,
            currency,
            created_at: Local::now().date_naive(),
        }
    }

    pub fn with_saved(mut self, saved_amount: Decimal) -> Self {
        self.saved_amount = saved_amount;
        self
    }

    /// Share of the target already saved, in percent with two decimals.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        // Saturates when the ratio does not fit in a Decimal.
        self.saved_amount
            .checked_div(self.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
            .round_dp(2)
    }

    pub fn is_reached(&self) -> bool {
        self.saved_amount >= self.target_amount
    }

    pub fn formatted_saved(&self) -> String {
        format_amount(self.saved_amount, self.currency)
    }

    pub fn formatted_target(&self) -> String {
        format_amount(self.target_amount, self.currency)
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Keyed for SavingsGoal {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Displayable for SavingsGoal {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.account_number)
    }
}

impl Funded for SavingsGoal {
    fn funds(&self) -> Decimal {
        self.saved_amount
    }

    fn funds_mut(&mut self) -> &mut Decimal {
        &mut self.saved_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn progress_is_relative_to_target() {
        let goal = SavingsGoal::new("Trip", "XX1", dec!(400), CurrencyType::USD).with_saved(dec!(100));
        assert_eq!(goal.progress_percent(), dec!(25));
        assert!(!goal.is_reached());
    }

    #[test]
    fn zero_target_reports_no_progress() {
        let goal = SavingsGoal::new("Empty", "XX1", Decimal::ZERO, CurrencyType::USD);
        assert_eq!(goal.progress_percent(), Decimal::ZERO);
        assert!(goal.is_reached());
    }

    #[test]
    fn oversized_progress_saturates() {
        let goal = SavingsGoal::new("Moon", "XX1", dec!(0.0001), CurrencyType::USD)
            .with_saved(Decimal::MAX);
        assert_eq!(goal.progress_percent(), Decimal::MAX);
    }
}
