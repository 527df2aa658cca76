// Delimited-text export of the report table
use crate::aggregate::ReportRow;
use crate::types::{Result, RevchonkError};
use log::info;
use std::io::Write;
use std::path::Path;

pub const COLUMNS: [&str; 7] = [
    "Code",
    "Service",
    "Start Subs",
    "End Subs",
    "Change",
    "Revenue",
    "Net Adds",
];

fn count_field(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn money_field(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

/// Write a header row plus one record per row. Absent values are empty fields.
pub fn write_rows<R: ReportRow, W: Write>(rows: &[R], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;
    for row in rows {
        out.write_record([
            row.code(),
            row.service(),
            count_field(row.start_count()),
            count_field(row.end_count()),
            count_field(row.change_count()),
            money_field(row.revenue()),
            count_field(row.net_change()),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn to_csv_string<R: ReportRow>(rows: &[R]) -> Result<String> {
    let mut buf = Vec::new();
    write_rows(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RevchonkError::Export(e.to_string()))
}

/// Write the CSV next to `path` first and rename it into place, so a failed
/// export never leaves a half-written file behind.
pub fn write_csv_file<R: ReportRow>(rows: &[R], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_rows(rows, tmp.as_file_mut())?;
    tmp.persist(path).map_err(|e| RevchonkError::Io(e.error))?;
    info!("exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
