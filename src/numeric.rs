//! Free-form numeric/currency normalization.
//!
//! Both parsers are total: anything they can't make sense of comes back as
//! `None`, which downstream code treats as missing data (never zero).

const THOUSANDS_SEPARATORS: &[char] = &[',', '\u{00a0}', '\u{202f}', '_'];
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];
const UNICODE_MINUS: char = '\u{2212}';

/// Parse an integer count such as `"1,000"` or `" -42 "`.
pub fn parse_integer(text: &str) -> Option<i64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<i64>()
        .ok()
        .or_else(|| cleaned.replace(UNICODE_MINUS, "-").parse::<i64>().ok())
}

/// Parse a monetary amount such as `"$1,234.56"` or `"(1,234.56)"`.
///
/// With `parentheses_as_negative`, a value wrapped in parentheses is negated.
/// Empty input and the literal `NaN` (any case) are absent.
pub fn parse_money(text: &str, parentheses_as_negative: bool) -> Option<f64> {
    let mut trimmed = text.trim();
    if is_blank_or_nan(trimmed) {
        return None;
    }

    let mut negate = false;
    if parentheses_as_negative && trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
        trimmed = trimmed[1..trimmed.len() - 1].trim();
        negate = true;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| {
            !THOUSANDS_SEPARATORS.contains(c) && !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace()
        })
        .collect();
    if is_blank_or_nan(&cleaned) {
        return None;
    }

    // ASCII first, then retry with the Unicode minus sign swapped out
    let value = cleaned
        .parse::<f64>()
        .ok()
        .or_else(|| cleaned.replace(UNICODE_MINUS, "-").parse::<f64>().ok())?;

    // f64's parser accepts "inf"/"infinity"; those are not money
    if !value.is_finite() {
        return None;
    }

    Some(if negate { -value } else { value })
}

fn is_blank_or_nan(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("nan")
}
