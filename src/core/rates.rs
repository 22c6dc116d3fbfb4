//! Rate table model and wire payload validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::convert::{UnknownCurrencyError, convert};

/// A normalized exchange-rate table.
///
/// Every rate is expressed as units of that currency per 1 unit of `base`.
/// The base itself carries an implicit rate of 1 and may be absent from the
/// map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Convert an amount between two currencies in this table.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, UnknownCurrencyError> {
        convert(amount, from, to, &self.base, &self.rates)
    }

    /// Whether `code` can be used in a conversion against this table.
    pub fn supports(&self, code: &str) -> bool {
        code == self.base || self.rates.get(code).is_some_and(|r| !r.is_nan())
    }

    /// Validate and normalize a raw JSON payload into a rate table.
    ///
    /// `base` must be a non-empty string and `rates` an object whose every
    /// value is a finite number. Extra fields (e.g. a provider `date`) are
    /// ignored. Returns `None` for any shape violation.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        let object = payload.as_object()?;

        let base = object.get("base")?.as_str()?;
        if base.trim().is_empty() {
            return None;
        }

        let raw_rates = object.get("rates")?.as_object()?;
        let mut rates = HashMap::with_capacity(raw_rates.len());
        for (code, value) in raw_rates {
            let rate = value.as_f64()?;
            if !rate.is_finite() {
                return None;
            }
            rates.insert(code.clone(), rate);
        }

        Some(RateTable {
            base: base.to_string(),
            rates,
        })
    }
}
