// Tab-separated rows: ROW <tab> SERVICE <tab> LAST MONTH <tab> THIS MONTH [...]
// Older exports render the table with literal tabs and no revenue column.
use super::Strategy;
use crate::numeric::parse_integer;
use crate::rows::CandidateRow;
use log::debug;

const MIN_PARTS: usize = 4;

pub fn recognize(text: &str) -> Vec<CandidateRow> {
    let rows: Vec<CandidateRow> = text.lines().filter_map(match_line).collect();
    debug!("tabbed lines matched {} rows", rows.len());
    rows
}

pub fn match_line(line: &str) -> Option<CandidateRow> {
    let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
    if parts.len() < MIN_PARTS {
        return None;
    }

    let start = parse_integer(parts[2])?;
    let end = parse_integer(parts[3])?;

    Some(CandidateRow {
        code: parts[0].to_string(),
        service: parts[1].to_string(),
        start_count: Some(start),
        end_count: Some(end),
        change_count: end.checked_sub(start),
        revenue_raw: String::new(),
        revenue: None,
        source: Strategy::Tabbed,
    })
}
