use rust_decimal::Decimal;
use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Entities the ledger matches by a business key (account number, goal name).
pub trait Keyed {
    fn key(&self) -> &str;

    fn matches_key(&self, candidate: &str) -> bool {
        self.key() == candidate
    }
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Entities carrying a spendable amount the ledger debits and credits.
pub trait Funded {
    fn funds(&self) -> Decimal;
    fn funds_mut(&mut self) -> &mut Decimal;
}
