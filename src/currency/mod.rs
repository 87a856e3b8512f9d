//! Supported currencies and amount formatting helpers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Major currencies the tracker can label amounts with. No conversion is performed.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CurrencyType {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    AUD,
    CAD,
    CHF,
    CNY,
    SEK,
    NZD,
}

impl CurrencyType {
    pub const ALL: [CurrencyType; 10] = [
        CurrencyType::USD,
        CurrencyType::EUR,
        CurrencyType::GBP,
        CurrencyType::JPY,
        CurrencyType::AUD,
        CurrencyType::CAD,
        CurrencyType::CHF,
        CurrencyType::CNY,
        CurrencyType::SEK,
        CurrencyType::NZD,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CurrencyType::USD => "USD",
            CurrencyType::EUR => "EUR",
            CurrencyType::GBP => "GBP",
            CurrencyType::JPY => "JPY",
            CurrencyType::AUD => "AUD",
            CurrencyType::CAD => "CAD",
            CurrencyType::CHF => "CHF",
            CurrencyType::CNY => "CNY",
            CurrencyType::SEK => "SEK",
            CurrencyType::NZD => "NZD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CurrencyType::USD => "$",
            CurrencyType::EUR => "€",
            CurrencyType::GBP => "£",
            CurrencyType::JPY | CurrencyType::CNY => "¥",
            CurrencyType::AUD => "A$",
            CurrencyType::CAD => "C$",
            CurrencyType::CHF => "Fr.",
            CurrencyType::SEK => "kr",
            CurrencyType::NZD => "NZ$",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            CurrencyType::USD => "United States Dollar",
            CurrencyType::EUR => "Euro",
            CurrencyType::GBP => "British Pound Sterling",
            CurrencyType::JPY => "Japanese Yen",
            CurrencyType::AUD => "Australian Dollar",
            CurrencyType::CAD => "Canadian Dollar",
            CurrencyType::CHF => "Swiss Franc",
            CurrencyType::CNY => "Chinese Yuan",
            CurrencyType::SEK => "Swedish Krona",
            CurrencyType::NZD => "New Zealand Dollar",
        }
    }

    /// Looks a currency up by code or full name, falling back to USD.
    pub fn find(value: &str) -> CurrencyType {
        Self::lookup(value).unwrap_or_default()
    }

    fn lookup(value: &str) -> Option<CurrencyType> {
        let needle = value.trim();
        Self::ALL.into_iter().find(|currency| {
            currency.code().eq_ignore_ascii_case(needle)
                || currency.full_name().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for CurrencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyType {
    type Err = String;

    /// Strict parse used for user input; unknown codes are rejected instead of defaulting.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("unknown currency `{}`", s.trim()))
    }
}

/// Formats an amount as `symbol` + thousands-grouped value with two decimals.
pub fn format_amount(amount: Decimal, currency: CurrencyType) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!(
        "{sign}{}{}.{fraction}",
        currency.symbol(),
        group_thousands(whole)
    )
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
