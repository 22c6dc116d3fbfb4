//! Currency-aware money formatting.
//!
//! Formatting resolves fraction digits and cash-rounding increments from the
//! currency metadata table, then renders with per-locale grouping and
//! decimal separators. No ICU-sized dependency is involved; the handful of
//! separator profiles the CLI supports live in this module.

use crate::core::currency::find_currency;

const DEFAULT_FRACTION_DIGITS: u32 = 2;
const MAX_FRACTION_DIGITS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// Groups of three: 1,234,567
    Thousands,
    /// Indian system: 12,34,567
    Indian,
}

/// Separator profile for a formatting locale.
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    pub tag: &'static str,
    group: &'static str,
    decimal: &'static str,
    grouping: Grouping,
}

const EN_US: Locale = Locale {
    tag: "en-US",
    group: ",",
    decimal: ".",
    grouping: Grouping::Thousands,
};

const LOCALES: [Locale; 4] = [
    EN_US,
    Locale {
        tag: "de-DE",
        group: ".",
        decimal: ",",
        grouping: Grouping::Thousands,
    },
    Locale {
        tag: "fr-FR",
        group: "\u{202F}",
        decimal: ",",
        grouping: Grouping::Thousands,
    },
    Locale {
        tag: "en-IN",
        group: ",",
        decimal: ".",
        grouping: Grouping::Indian,
    },
];

/// Resolve a locale tag to a separator profile. Unknown tags fall back to
/// en-US.
pub fn locale_for(tag: &str) -> Locale {
    LOCALES
        .iter()
        .find(|l| l.tag.eq_ignore_ascii_case(tag))
        .copied()
        .unwrap_or(EN_US)
}

/// Options for [`format_money`].
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Override the fraction digit count resolved from currency metadata.
    pub digits: Option<u32>,
    /// Formatting locale tag; `None` formats as en-US.
    pub locale: Option<String>,
    /// Disable currency-specific increment rounding.
    pub skip_rounding: bool,
}

/// Round a value to the nearest multiple of `increment`.
///
/// Ties round half away from zero at the increment granularity, so negative
/// values behave symmetrically. Degenerate inputs (non-finite value or
/// increment, non-positive increment, overflowing step) return the value
/// unchanged. A final truncation at 10 decimal digits suppresses
/// floating-point noise from the scale/unscale round trip.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if !increment.is_finite() || increment <= 0.0 {
        return value;
    }

    let step = (1.0 / increment).round();
    if step == 0.0 || !step.is_finite() {
        return value;
    }

    let rounded = (value * step).round() / step;
    (rounded * 1e10).round() / 1e10
}

/// Render an amount as a localized, currency-rounded string.
///
/// Non-finite values render as an empty string; the caller decides on a
/// placeholder. Unknown currency codes fall back to 2 fraction digits with
/// no increment rounding.
pub fn format_money(value: f64, code: &str, options: &FormatOptions) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let meta = find_currency(code);
    let digits = options
        .digits
        .or(meta.map(|m| m.decimal_digits))
        .unwrap_or(DEFAULT_FRACTION_DIGITS)
        .min(MAX_FRACTION_DIGITS);
    let increment = meta.map_or(0.0, |m| m.rounding);

    let value = if !options.skip_rounding && increment > 0.0 {
        round_to_increment(value, increment)
    } else {
        value
    };

    let locale = options
        .locale
        .as_deref()
        .map_or(EN_US, locale_for);

    localize(value, digits, &locale)
}

fn localize(value: f64, digits: u32, locale: &Locale) -> String {
    let fixed = format!("{value:.prec$}", prec = digits as usize);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };

    let (integer_part, fraction_part) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let grouped = group_digits(integer_part, locale);
    match fraction_part {
        Some(frac) => format!("{sign}{grouped}{}{frac}", locale.decimal),
        None => format!("{sign}{grouped}"),
    }
}

fn group_digits(digits: &str, locale: &Locale) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut remaining = chars.len();
    let mut first_group = true;

    while remaining > 0 {
        let size = match locale.grouping {
            Grouping::Thousands => 3,
            Grouping::Indian if first_group => 3,
            Grouping::Indian => 2,
        };
        let start = remaining.saturating_sub(size);
        groups.push(chars[start..remaining].iter().collect());
        remaining = start;
        first_group = false;
    }

    groups.reverse();
    groups.join(locale.group)
}
