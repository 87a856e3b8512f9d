//! Ledger state, the transaction mutator and the single-writer actor.

pub mod book;
pub mod mutator;
pub mod writer;

pub use book::{CurrencyTotals, Ledger};
pub use mutator::{Applied, LedgerMutator};
pub use writer::{LedgerHandle, LedgerWriter, WriterOptions};
