use std::str::FromStr;

use rust_decimal::Decimal;

pub mod account;
pub mod config;
pub mod data;
pub mod goal;
pub mod system;
pub mod transaction;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;
use crate::core::validation::parse_amount;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let entries = system::definitions()
        .into_iter()
        .chain(account::definitions())
        .chain(goal::definitions())
        .chain(transaction::definitions())
        .chain(data::definitions())
        .chain(config::definitions());
    for entry in entries {
        registry.register(entry);
    }
}

/// Fails with the usage line when fewer than `min` arguments were given.
pub(crate) fn expect_args(args: &[&str], min: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min {
        return Err(CommandError::InvalidArguments(format!("Usage: {usage}")));
    }
    Ok(())
}

/// Strictly positive transaction amount.
pub(crate) fn amount_arg(raw: &str) -> Result<Decimal, CommandError> {
    parse_amount(raw).map_err(CommandError::InvalidArguments)
}

/// Opening balance or saved amount; zero is allowed.
pub(crate) fn balance_arg(raw: &str) -> Result<Decimal, CommandError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))?;
    if value.is_sign_negative() {
        return Err(CommandError::InvalidArguments(
            "Amount cannot be negative".into(),
        ));
    }
    Ok(value)
}

/// Largest batch `generate` will create in one go.
pub(crate) const MAX_COUNT: usize = 1_000;

/// Between 1 and [`MAX_COUNT`].
pub(crate) fn count_arg(raw: Option<&&str>, default: usize) -> Result<usize, CommandError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let count = raw
        .parse::<usize>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a valid count")))?;
    if count > MAX_COUNT {
        return Err(CommandError::InvalidArguments(format!(
            "Count {count} exceeds the maximum of {MAX_COUNT}"
        )));
    }
    Ok(count)
}
