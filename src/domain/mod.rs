pub mod account;
pub mod common;
pub mod goal;
pub mod transaction;

pub use account::Account;
pub use common::{Displayable, Funded, Identifiable, Keyed};
pub use goal::SavingsGoal;
pub use transaction::{Transaction, TransactionType};
