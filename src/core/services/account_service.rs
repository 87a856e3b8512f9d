use uuid::Uuid;

use crate::core::validation::validate_account;
use crate::domain::Account;
use crate::ledger::Ledger;

use super::{ServiceError, ServiceResult};

pub struct AccountService;

impl AccountService {
    pub fn add(ledger: &mut Ledger, account: Account) -> ServiceResult<Uuid> {
        validate_account(&account)?;
        Self::ensure_unique_number(ledger, &account.account_number)?;
        tracing::info!(account = %account.account_number, "Account added");
        Ok(ledger.add_account(account))
    }

    /// Removes the account. History that mentions it is kept.
    pub fn remove(ledger: &mut Ledger, account_number: &str) -> ServiceResult<Account> {
        let removed = ledger.remove_account(account_number)?;
        tracing::info!(account = %account_number, "Account removed");
        Ok(removed)
    }

    pub fn find<'a>(ledger: &'a Ledger, account_number: &str) -> ServiceResult<&'a Account> {
        ledger
            .account(account_number)
            .ok_or_else(|| ServiceError::Invalid(format!("Account `{account_number}` not found")))
    }

    pub fn list(ledger: &Ledger) -> Vec<&Account> {
        ledger.accounts.iter().collect()
    }

    fn ensure_unique_number(ledger: &Ledger, candidate: &str) -> ServiceResult<()> {
        let normalized = candidate.trim().to_ascii_lowercase();
        let duplicate = ledger
            .accounts
            .iter()
            .any(|account| account.account_number.trim().to_ascii_lowercase() == normalized);
        if duplicate {
            Err(ServiceError::Invalid(format!(
                "Account `{}` already exists",
                candidate
            )))
        } else {
            Ok(())
        }
    }
}
