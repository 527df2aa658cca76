// Fallback recognizer for plain rendered report lines:
//
//   [CODE] Service label ... START END CHANGE  <revenue somewhere in the tail>
//
// Lines that don't match the whole shape produce nothing.
use super::Strategy;
use crate::numeric::{parse_integer, parse_money};
use crate::rows::CandidateRow;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// Parenthesized or signed amount, optional currency symbol
const MONEY_PATTERN: &str = concat!(
    r"\(\s*[$€£¥]?\s*[0-9][0-9,]*(?:\.[0-9]+)?\s*\)",
    r"|[-−]?\s*[$€£¥]?\s*[-−]?[0-9][0-9,]*(?:\.[0-9]+)?",
);

// A code is a short token with a digit ("SVC1", "12", "4K") or a short
// all-caps token ("TV", "ABC"). It is only taken when a service label still
// follows it. The tail must hold a money token, so the service label gives
// back words until one does.
const ROW_HEAD: &str = concat!(
    r"^\s*(?:(?P<code>[A-Z]{0,6}[0-9][A-Z0-9-]{0,6}|[A-Z][A-Z0-9-]{1,7})\s+)?",
    r"(?P<service>\S.*)",
    r"\s+(?P<start>[-−]?[0-9][0-9,]*)",
    r"\s+(?P<end>[-−]?[0-9][0-9,]*)",
    r"\s+(?P<change>[-−]?[0-9][0-9,]*)",
);

static ROW_LINE: Lazy<Regex> = Lazy::new(|| {
    let pattern = [ROW_HEAD, r"\s+(?P<tail>.*?(?P<money>", MONEY_PATTERN, r").*?)\s*$"].concat();
    Regex::new(&pattern).expect("row line pattern is valid")
});

/// Scan every line independently, in document order.
pub fn recognize(text: &str, parentheses_as_negative: bool) -> Vec<CandidateRow> {
    let rows: Vec<CandidateRow> = text
        .lines()
        .filter_map(|line| match_line(line, parentheses_as_negative))
        .collect();
    debug!("fallback line pattern matched {} lines", rows.len());
    rows
}

/// Decode one line, or `None` if it isn't a report row.
pub fn match_line(line: &str, parentheses_as_negative: bool) -> Option<CandidateRow> {
    let caps = ROW_LINE.captures(line)?;
    let revenue_raw = caps.name("money")?.as_str().trim().to_string();

    let capture = |name: &str| caps.name(name).map(|m| m.as_str().trim()).unwrap_or_default();

    Some(CandidateRow {
        code: capture("code").to_string(),
        service: capture("service").to_string(),
        start_count: parse_integer(capture("start")),
        end_count: parse_integer(capture("end")),
        change_count: parse_integer(capture("change")),
        revenue: parse_money(&revenue_raw, parentheses_as_negative),
        revenue_raw,
        source: Strategy::Fallback,
    })
}
