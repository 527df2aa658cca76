//! Embedded-block recognizer.
//!
//! Some report exporters annotate the rendered text with a machine-readable
//! copy of each row: a marker token followed by a double-quoted, CSV-escaped
//! record (inner quotes doubled), e.g.
//!
//! ```text
//! REVROW "0,SVC1,Streaming,100,120,20,""$1,050.00"""
//! ```
//!
//! Fields are positional: 0 is the exporter's row index (ignored), 1 code,
//! 2 service, 3 start count, 4 end count, 5 change count, and the last field
//! is the raw revenue. A block sits on a single line. A block that can't be
//! decoded, including one whose closing quote is missing, is skipped on its own.

use super::Strategy;
use crate::numeric::{parse_integer, parse_money};
use crate::rows::CandidateRow;
use log::{debug, warn};
use regex::Regex;

/// Index, code, service, three counts and a trailing revenue field.
pub const MIN_FIELDS: usize = 7;

/// Every block introduced by `marker`, decoded in text order.
pub fn recognize(text: &str, marker: &str, parentheses_as_negative: bool) -> Vec<CandidateRow> {
    let pattern = match block_pattern(marker) {
        Some(re) => re,
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    let mut skipped = 0;
    for caps in pattern.captures_iter(text) {
        let content = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        match decode_block(content, parentheses_as_negative) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    debug!("embedded blocks: {} decoded, {} skipped", rows.len(), skipped);
    rows
}

fn block_pattern(marker: &str) -> Option<Regex> {
    if marker.trim().is_empty() {
        warn!("empty embedded-block marker, strategy disabled");
        return None;
    }
    // Quoted content never crosses a line break, so an unterminated block
    // can't swallow the opening quote of the next one
    let pattern = format!(r#"{}\s*[:=]?\s*"((?:[^"\r\n]|"")*)""#, regex::escape(marker.trim()));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("invalid embedded-block marker {:?}: {}", marker, e);
            None
        }
    }
}

/// Decode the quoted content of one block into a candidate row.
pub fn decode_block(content: &str, parentheses_as_negative: bool) -> Option<CandidateRow> {
    // Undo the outer quoting
    let record = content.replace("\"\"", "\"");
    if record.matches('"').count() % 2 != 0 {
        return None;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(record.as_bytes());
    let fields = reader.records().next()?.ok()?;
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let field = |idx: usize| fields.get(idx).map(str::trim).unwrap_or_default();
    let revenue_raw = field(fields.len() - 1).to_string();

    Some(CandidateRow {
        code: field(1).to_string(),
        service: field(2).to_string(),
        start_count: parse_integer(field(3)),
        end_count: parse_integer(field(4)),
        change_count: parse_integer(field(5)),
        revenue: parse_money(&revenue_raw, parentheses_as_negative),
        revenue_raw,
        source: Strategy::Embedded,
    })
}
