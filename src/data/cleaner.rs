//! Value Cleaning Module
//! Extracts numbers from noisy, human-entered cell text.

/// Keep ASCII digits and `.` only, then parse.
///
/// Returns `None` for text with no digits (`""`, `"."`, `"해당없음"`) or with
/// more than one decimal point, never `0.0`.
pub fn clean_value(raw: &str) -> Option<f64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() || digits == "." {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a year or month cell. Decimal text such as `"2020.0"` is accepted
/// and truncated toward zero.
pub fn coerce_integer(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let value = value.trunc();
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

/// Trimmed text, or `None` when the cell is blank.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
