use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// Which kind of ledger entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Goal,
    Transaction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Account => "account",
            EntityKind::Goal => "savings goal",
            EntityKind::Transaction => "transaction",
        };
        f.write_str(label)
    }
}

/// Error type that captures ledger failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Insufficient funds in {kind} `{key}`: available {available}, requested {requested}")]
    InsufficientFunds {
        kind: EntityKind,
        key: String,
        available: Decimal,
        requested: Decimal,
    },
    #[error("No {kind} matches `{key}`")]
    NotFound { kind: EntityKind, key: String },
    #[error("Invalid transaction: {0}")]
    Validation(String),
    #[error("Ledger writer is no longer running")]
    WriterClosed,
}

impl LedgerError {
    pub(crate) fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, LedgerError::InsufficientFunds { .. })
    }
}
