//! Free-form amount parsing for user input.
//!
//! Accepts both "1,234.56" and "1.234,56" conventions by treating the
//! rightmost `.` or `,` as the decimal separator and stripping every other
//! occurrence as a thousands separator. Returns `f64::NAN` for anything
//! that does not parse into a finite number; never panics.

/// Parse a user-entered amount into a number.
///
/// Whitespace (including non-breaking space) is removed before parsing. A
/// single leading `+`/`-` is honored; a sign anywhere else yields NaN.
pub fn parse_amount(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }

    let without_spaces: String = trimmed
        .chars()
        .filter(|c| *c != '\u{00A0}' && !c.is_whitespace())
        .collect();
    if without_spaces.is_empty() {
        return f64::NAN;
    }

    let (sign, numeric_part) = match without_spaces.strip_prefix(['+', '-']) {
        Some(rest) => (&without_spaces[..1], rest),
        None => ("", without_spaces.as_str()),
    };

    if numeric_part.is_empty() || numeric_part.contains(['+', '-']) {
        return f64::NAN;
    }

    let decimal_index = match (numeric_part.rfind('.'), numeric_part.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(dot), None) => Some(dot),
        (None, Some(comma)) => Some(comma),
        (None, None) => None,
    };

    let normalized = normalize_number_string(numeric_part, decimal_index);
    if normalized.is_empty() {
        return f64::NAN;
    }

    match format!("{sign}{normalized}").parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => f64::NAN,
    }
}

fn strip_separators(value: &str) -> String {
    value.chars().filter(|c| *c != '.' && *c != ',').collect()
}

fn normalize_number_string(value: &str, decimal_index: Option<usize>) -> String {
    let Some(index) = decimal_index else {
        return strip_separators(value);
    };

    let integer_part = strip_separators(&value[..index]);
    let fractional_part = strip_separators(&value[index + 1..]);

    if fractional_part.is_empty() {
        integer_part
    } else {
        format!("{integer_part}.{fractional_part}")
    }
}
