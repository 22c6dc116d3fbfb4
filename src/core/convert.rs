//! Pure cross-rate conversion against a rate table.

use std::collections::HashMap;

use thiserror::Error;

/// A currency code could not be resolved against the rate table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown currency code: {0}")]
pub struct UnknownCurrencyError(pub String);

/// Resolve a code to its rate relative to `base`. The base itself always
/// resolves to 1; everything else must have a non-NaN entry in the map.
fn resolve_rate(
    code: &str,
    base: &str,
    rates: &HashMap<String, f64>,
) -> Result<f64, UnknownCurrencyError> {
    if code == base {
        return Ok(1.0);
    }

    match rates.get(code) {
        Some(rate) if !rate.is_nan() => Ok(*rate),
        _ => Err(UnknownCurrencyError(code.to_string())),
    }
}

/// Convert `amount` from one currency to another.
///
/// Rates are expressed as units of `code` per 1 unit of `base`, so
/// converting FROM a currency divides out its relative value and converting
/// TO a currency multiplies it in. Identical codes short-circuit without a
/// lookup, even when the code is otherwise unknown.
pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    base: &str,
    rates: &HashMap<String, f64>,
) -> Result<f64, UnknownCurrencyError> {
    if from == to {
        return Ok(amount);
    }

    let rate_to = resolve_rate(to, base, rates)?;
    let rate_from = resolve_rate(from, base, rates)?;

    Ok(amount * (rate_to / rate_from))
}
