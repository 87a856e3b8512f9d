pub mod account_service;
pub mod goal_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use goal_service::GoalService;
pub use transaction_service::TransactionService;

use crate::core::validation::ValidationErrors;
use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}
