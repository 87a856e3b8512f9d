#![doc(test(attr(deny(warnings))))]

//! Finance Core keeps bank accounts, savings goals and their transaction
//! history consistent. Every transaction goes through a single mutator that
//! applies its balance effects all-or-nothing.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod simulation;
pub mod utils;

pub use errors::{EntityKind, LedgerError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
