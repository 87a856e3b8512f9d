//! Random sample data for demos and manual testing.

use chrono::{Duration, Local};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::core::validation::is_valid_email;
use crate::currency::CurrencyType;
use crate::domain::{Account, SavingsGoal, Transaction, TransactionType};
use crate::errors::LedgerError;

const BANKS: [&str; 3] = ["Global Bank", "Metro Savings", "Tech Credit Union"];
const FIRST_NAMES: [&str; 5] = ["Alex", "Sam", "Jordan", "Taylor", "Casey"];
const LAST_NAMES: [&str; 5] = ["Smith", "Johnson", "Brown", "Lee", "Wilson"];
const GOAL_NAMES: [&str; 4] = [
    "Emergency Fund",
    "Vacation to Japan",
    "New Car Fund",
    "Home Renovation",
];

/// Default sizes used when refreshing the whole ledger.
pub const DEFAULT_ACCOUNTS: usize = 4;
pub const DEFAULT_GOALS: usize = 3;
pub const DEFAULT_TRANSACTIONS: usize = 10;

/// Seedable generator of accounts, savings goals and transaction history.
pub struct DataSimulator {
    rng: StdRng,
}

impl Default for DataSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSimulator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn accounts(&mut self, currency: CurrencyType, count: usize) -> Vec<Account> {
        (0..count)
            .map(|_| {
                let number = self.account_number();
                let holder = self.person_name();
                let bank = self.pick(&BANKS);
                let mut account = Account::new(number, holder, bank, currency)
                    .with_balance(self.cents(100_000..5_000_000));
                account.created_at = Local::now().date_naive() - self.days(365);
                account
            })
            .collect()
    }

    /// Goals get distinct names; once the catalogue is exhausted a counter is appended.
    pub fn goals(&mut self, accounts: &[Account], count: usize) -> Vec<SavingsGoal> {
        self.goals_avoiding(accounts, count, &[])
    }

    /// Like [`goals`](Self::goals), skipping names already present in `existing`.
    pub fn goals_avoiding(
        &mut self,
        accounts: &[Account],
        count: usize,
        existing: &[SavingsGoal],
    ) -> Vec<SavingsGoal> {
        if accounts.is_empty() {
            return Vec::new();
        }
        let mut taken: Vec<String> = existing.iter().map(|goal| goal.name.clone()).collect();
        let mut goals = Vec::with_capacity(count);
        for _ in 0..count {
            let name = self.unique_goal_name(&taken);
            taken.push(name.clone());

            let target_cents = self.rng.gen_range(500_000..3_000_000_i64);
            let saved_cents = self.rng.gen_range(0..target_cents * 6 / 5);
            let account = accounts.choose(&mut self.rng).unwrap_or(&accounts[0]);

            let mut goal = SavingsGoal::new(
                name,
                account.account_number.clone(),
                Decimal::new(target_cents, 2),
                account.currency,
            )
            .with_saved(Decimal::new(saved_cents, 2));
            goal.created_at = Local::now().date_naive() - self.days(180);
            goals.push(goal);
        }
        goals
    }

    /// History records only; they are not applied to any balance.
    pub fn transactions(
        &mut self,
        accounts: &[Account],
        goals: &[SavingsGoal],
        count: usize,
    ) -> Vec<Transaction> {
        if accounts.is_empty() {
            return Vec::new();
        }
        let kinds: Vec<TransactionType> = TransactionType::ALL
            .into_iter()
            .filter(|kind| !kind.is_goal() || !goals.is_empty())
            .collect();

        (0..count)
            .map(|_| {
                let kind = *kinds.choose(&mut self.rng).unwrap_or(&TransactionType::Deposit);
                let account = accounts.choose(&mut self.rng).unwrap_or(&accounts[0]);
                let mut txn = Transaction::new(
                    kind,
                    account.account_number.clone(),
                    self.cents(5_000..250_000),
                    account.currency,
                );
                txn.timestamp =
                    Local::now().naive_local() - Duration::hours(self.rng.gen_range(0..720));

                if kind.is_goal() {
                    txn.goal_name = goals.choose(&mut self.rng).map(|goal| goal.name.clone());
                }
                match kind {
                    TransactionType::TransferOut => {
                        txn.target_account_number = Some(self.other_account(accounts, account));
                    }
                    TransactionType::TransferGoalOut => {
                        let source = txn.goal_name.clone().unwrap_or_default();
                        txn.target_goal_name = goals
                            .iter()
                            .filter(|goal| goal.name != source)
                            .collect::<Vec<_>>()
                            .choose(&mut self.rng)
                            .map(|goal| goal.name.clone())
                            .or(Some(source));
                    }
                    TransactionType::TransferOutTo => {
                        txn.target_account_number = Some(self.account_number());
                    }
                    TransactionType::TransferGoalOutTo => {
                        txn.target_goal_name = Some(self.pick(&GOAL_NAMES).to_string());
                    }
                    _ => {}
                }
                if kind.needs_recipient_email() {
                    txn.target_user_email = Some(self.email());
                }
                txn
            })
            .collect()
    }

    /// A full sample data set using the default sizes.
    pub fn dataset(
        &mut self,
        currency: CurrencyType,
    ) -> (Vec<Account>, Vec<SavingsGoal>, Vec<Transaction>) {
        let accounts = self.accounts(currency, DEFAULT_ACCOUNTS);
        let goals = self.goals(&accounts, DEFAULT_GOALS);
        let transactions = self.transactions(&accounts, &goals, DEFAULT_TRANSACTIONS);
        (accounts, goals, transactions)
    }

    /// Stand-in for looking up another user's accounts by email.
    pub fn accounts_for_email(
        &mut self,
        email: &str,
        currency: CurrencyType,
    ) -> Result<Vec<Account>, LedgerError> {
        ensure_email(email)?;
        Ok(self.accounts(currency, DEFAULT_ACCOUNTS))
    }

    /// Stand-in for looking up another user's savings goals by email.
    pub fn goals_for_email(
        &mut self,
        email: &str,
        currency: CurrencyType,
    ) -> Result<Vec<SavingsGoal>, LedgerError> {
        ensure_email(email)?;
        let accounts = self.accounts(currency, DEFAULT_ACCOUNTS);
        Ok(self.goals(&accounts, DEFAULT_GOALS))
    }

    fn unique_goal_name(&mut self, taken: &[String]) -> String {
        let free: Vec<&str> = GOAL_NAMES
            .iter()
            .copied()
            .filter(|name| !taken.iter().any(|used| used == name))
            .collect();
        if let Some(name) = free.choose(&mut self.rng) {
            return (*name).to_string();
        }
        let base = self.pick(&GOAL_NAMES);
        (2..)
            .map(|n| format!("{base} {n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn other_account(&mut self, accounts: &[Account], source: &Account) -> String {
        let others: Vec<&Account> = accounts
            .iter()
            .filter(|account| account.account_number != source.account_number)
            .collect();
        match others.choose(&mut self.rng) {
            Some(account) => account.account_number.clone(),
            None => self.account_number(),
        }
    }

    fn account_number(&mut self) -> String {
        format!("XX{}", self.rng.gen_range(10_000_000..100_000_000))
    }

    fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn email(&mut self) -> String {
        format!(
            "{}{}@gmail.com",
            self.pick(&FIRST_NAMES),
            self.pick(&LAST_NAMES)
        )
        .to_ascii_lowercase()
    }

    fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn cents(&mut self, range: std::ops::Range<i64>) -> Decimal {
        Decimal::new(self.rng.gen_range(range), 2)
    }

    fn days(&mut self, max: i64) -> Duration {
        Duration::days(self.rng.gen_range(0..max))
    }
}

fn ensure_email(email: &str) -> Result<(), LedgerError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!(
            "`{email}` is not a valid email address"
        )))
    }
}
