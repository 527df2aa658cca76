//! Header-indexed CSV table for the CSV report path.
//!
//! The CSV path skips row recognition entirely: the table's rows are already
//! decoded, and the aggregator reads them by column name through
//! [`ReportRow`](crate::aggregate::ReportRow).

use crate::aggregate::ReportRow;
use crate::config::CsvColumns;
use crate::numeric::{parse_integer, parse_money};
use crate::types::{RawDocument, Result};
use log::debug;
use serde::Serialize;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse a delimited table with a header row. Ragged rows are allowed;
    /// bytes that aren't valid delimited UTF-8 are `DocumentUnreadable`.
    pub fn parse(doc: &RawDocument) -> Result<Self> {
        let delimiter = detect_delimiter(doc.bytes());
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(doc.bytes());

        let headers = reader
            .headers()
            .map_err(|e| doc.unreadable(e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| doc.unreadable(e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(
            "csv table: {} columns, {} rows (delimiter {:?})",
            headers.len(),
            rows.len(),
            delimiter as char
        );
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows viewed through the configured column names.
    pub fn report_rows<'a>(
        &'a self,
        columns: &'a CsvColumns,
        parentheses_as_negative: bool,
    ) -> Vec<CsvRow<'a>> {
        self.rows
            .iter()
            .map(|values| CsvRow {
                table: self,
                values,
                columns,
                parentheses_as_negative,
            })
            .collect()
    }
}

/// Pick the candidate delimiter that occurs most often in the header line.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let mut best = b',';
    let mut max_count = 0;
    for &delim in &CANDIDATE_DELIMITERS {
        let count = first_line.iter().filter(|&&b| b == delim).count();
        if count > max_count {
            max_count = count;
            best = delim;
        }
    }
    best
}

#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    table: &'a CsvTable,
    values: &'a [String],
    columns: &'a CsvColumns,
    parentheses_as_negative: bool,
}

impl<'a> CsvRow<'a> {
    /// Cell by header name; missing columns and short rows are `None`.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.values.get(idx).map(|v| v.trim())
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}

impl ReportRow for CsvRow<'_> {
    fn code(&self) -> String {
        self.get(&self.columns.code_column).unwrap_or_default().to_string()
    }

    fn service(&self) -> String {
        self.get(&self.columns.service_column).unwrap_or_default().to_string()
    }

    fn start_count(&self) -> Option<i64> {
        self.get(&self.columns.start_column).and_then(parse_integer)
    }

    fn end_count(&self) -> Option<i64> {
        self.get(&self.columns.end_column).and_then(parse_integer)
    }

    fn revenue(&self) -> Option<f64> {
        self.get(&self.columns.revenue_column)
            .and_then(|v| parse_money(v, self.parentheses_as_negative))
    }

    fn category(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}
