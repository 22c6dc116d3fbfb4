//! Static currency reference data and search.
//!
//! The metadata table ships embedded in the binary and is parsed once on
//! first access. It drives fraction digits and increment rounding in the
//! money formatter and the `currencies` listing in the CLI.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Deserialize;

/// Reference data for a single currency.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CurrencyMeta {
    pub code: String,
    pub name: String,
    pub symbol: Option<String>,
    pub symbol_native: Option<String>,
    pub decimal_digits: u32,
    /// Increment for cash rounding, e.g. 0.05 for CHF. 0 disables it.
    pub rounding: f64,
    pub country_code: Option<String>,
    pub flag: Option<String>,
}

static CURRENCIES: LazyLock<Vec<CurrencyMeta>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/currencies.json"))
        .expect("embedded currency table must be valid JSON")
});

static CURRENCY_BY_CODE: LazyLock<HashMap<&'static str, &'static CurrencyMeta>> =
    LazyLock::new(|| {
        CURRENCIES
            .iter()
            .map(|meta| (meta.code.as_str(), meta))
            .collect()
    });

/// All known currencies, in table order.
pub fn all_currencies() -> &'static [CurrencyMeta] {
    &CURRENCIES
}

/// Look up metadata by code. The lookup is case-insensitive.
pub fn find_currency(code: &str) -> Option<&'static CurrencyMeta> {
    CURRENCY_BY_CODE.get(code.to_uppercase().as_str()).copied()
}

/// Filter currencies by a free-text query, matching code, name, or symbol
/// case-insensitively while preserving table order. A blank query returns
/// the full list.
pub fn filter_currencies<'a>(query: &str, list: &'a [CurrencyMeta]) -> Vec<&'a CurrencyMeta> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return list.iter().collect();
    }

    let needle = trimmed.to_lowercase();
    list.iter()
        .filter(|meta| {
            meta.code.to_lowercase().contains(&needle)
                || meta.name.to_lowercase().contains(&needle)
                || meta
                    .symbol
                    .as_ref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_loads() {
        assert!(all_currencies().len() > 20);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let usd = find_currency("usd").unwrap();
        assert_eq!(usd.code, "USD");
        assert_eq!(usd.decimal_digits, 2);
        assert!(find_currency("ZZZ").is_none());
    }

    #[test]
    fn test_known_rounding_metadata() {
        let chf = find_currency("CHF").unwrap();
        assert_eq!(chf.rounding, 0.05);
        let jpy = find_currency("JPY").unwrap();
        assert_eq!(jpy.decimal_digits, 0);
    }

    #[test]
    fn test_filter_matches_code_name_and_symbol() {
        let list = all_currencies();
        let by_code = filter_currencies("gbp", list);
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].code, "GBP");

        let by_name = filter_currencies("dollar", list);
        assert!(by_name.iter().any(|m| m.code == "USD"));
        assert!(by_name.iter().any(|m| m.code == "AUD"));

        let by_symbol = filter_currencies("₹", list);
        assert_eq!(by_symbol[0].code, "INR");
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let list = all_currencies();
        assert_eq!(filter_currencies("  ", list).len(), list.len());
    }
}
