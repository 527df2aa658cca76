//! End-to-end processing: `RawDocument` in, [`Report`] out.
//!
//! ```text
//! bytes -> content_extractor -> text -> ExtractionRouter -> candidates -> dedupe -> rows
//!                            \-> csv table ------------------------------------------/
//!                                                                     rows -> aggregate views
//! ```
//!
//! Only whole-document failures are errors. A document that reads fine but
//! yields no rows is an [`Extraction::NoRowsExtracted`] report carrying the raw
//! text for inspection.

use crate::aggregate::{self, ReportRow, SummaryRow, Totals};
use crate::config::{CsvColumns, RevchonkConfig};
use crate::content_extractor::{self, ExtractedContent};
use crate::csv_table::CsvTable;
use crate::dedupe::dedupe;
use crate::export;
use crate::pdf_extraction::ExtractionRouter;
use crate::rows::CanonicalRow;
use crate::types::{DocumentFormat, RawDocument, Result};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Extraction {
    /// Canonical rows recognized in PDF text.
    Rows(Vec<CanonicalRow>),
    /// Rows of a CSV export, read by column name.
    Table(CsvTable),
    /// Readable document, nothing matched.
    NoRowsExtracted,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        matches!(self, Extraction::NoRowsExtracted)
    }
}

/// A row as shown in the top-N views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub code: String,
    pub service: String,
    pub revenue: Option<f64>,
    pub net_change: Option<i64>,
}

impl ViewRow {
    fn of<R: ReportRow>(row: &R) -> Self {
        Self {
            code: row.code(),
            service: row.service(),
            revenue: row.revenue(),
            net_change: row.net_change(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportViews {
    pub totals: Totals,
    pub group_by: String,
    pub summary: Vec<SummaryRow>,
    pub top_revenue: Vec<ViewRow>,
    pub top_gainers: Vec<ViewRow>,
    pub top_decliners: Vec<ViewRow>,
}

impl ReportViews {
    pub fn compute<R: ReportRow>(rows: &[R], group_by: &str, top_n: usize) -> Self {
        let views = |picked: Vec<&R>| -> Vec<ViewRow> { picked.into_iter().map(ViewRow::of).collect() };
        Self {
            totals: aggregate::totals(rows),
            group_by: group_by.to_string(),
            summary: aggregate::summarize_by(rows, group_by),
            top_revenue: views(aggregate::top_revenue(rows, top_n)),
            top_gainers: views(aggregate::top_gainers(rows, top_n)),
            top_decliners: views(aggregate::top_decliners(rows, top_n)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub format: DocumentFormat,
    pub extraction: Extraction,
    pub views: ReportViews,
    #[serde(skip)]
    pub raw_text: String,
    #[serde(skip)]
    csv_columns: CsvColumns,
    #[serde(skip)]
    parentheses_as_negative: bool,
}

impl Report {
    /// Canonical rows of the PDF path; empty otherwise.
    pub fn rows(&self) -> &[CanonicalRow] {
        match &self.extraction {
            Extraction::Rows(rows) => rows.as_slice(),
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extraction.is_empty()
    }

    /// The exportable table as CSV text.
    pub fn to_csv(&self) -> Result<String> {
        match &self.extraction {
            Extraction::Table(table) => {
                export::to_csv_string(&table.report_rows(&self.csv_columns, self.parentheses_as_negative))
            }
            _ => export::to_csv_string(self.rows()),
        }
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        match &self.extraction {
            Extraction::Table(table) => export::write_csv_file(
                &table.report_rows(&self.csv_columns, self.parentheses_as_negative),
                path,
            ),
            _ => export::write_csv_file(self.rows(), path),
        }
    }
}

/// Recognize and deduplicate rows in raw PDF text.
pub fn extract_rows(text: &str, config: &RevchonkConfig) -> Vec<CanonicalRow> {
    let candidates = ExtractionRouter::recognize(text, &config.recognizer);
    let rows = dedupe(&candidates, config.dedupe.include_service_in_key);
    info!("{} candidates -> {} canonical rows", candidates.len(), rows.len());
    rows
}

pub struct Pipeline {
    config: RevchonkConfig,
}

impl Pipeline {
    pub fn new(config: RevchonkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RevchonkConfig {
        &self.config
    }

    pub fn process(&self, doc: &RawDocument) -> Result<Report> {
        content_extractor::check_size(doc, self.config.report.max_input_bytes)?;

        let (raw_text, extraction) = match content_extractor::extract_content(doc)? {
            ExtractedContent::Text(text) => {
                let rows = extract_rows(&text, &self.config);
                let extraction = if rows.is_empty() {
                    Extraction::NoRowsExtracted
                } else {
                    Extraction::Rows(rows)
                };
                (text, extraction)
            }
            ExtractedContent::Table(table) => {
                let text = String::from_utf8_lossy(doc.bytes()).into_owned();
                let extraction = if table.is_empty() {
                    Extraction::NoRowsExtracted
                } else {
                    Extraction::Table(table)
                };
                (text, extraction)
            }
        };

        if extraction.is_empty() {
            warn!(
                "no rows extracted from {} document ({} bytes)",
                doc.format(),
                doc.len()
            );
        }

        let views = self.views(&extraction);
        Ok(Report {
            format: doc.format(),
            extraction,
            views,
            raw_text,
            csv_columns: self.config.csv.clone(),
            parentheses_as_negative: self.config.recognizer.parentheses_as_negative,
        })
    }

    fn views(&self, extraction: &Extraction) -> ReportViews {
        let report = &self.config.report;
        match extraction {
            Extraction::Rows(rows) => ReportViews::compute(rows, &report.group_by, report.top_n),
            Extraction::Table(table) => ReportViews::compute(
                &table.report_rows(&self.config.csv, self.config.recognizer.parentheses_as_negative),
                &report.group_by,
                report.top_n,
            ),
            Extraction::NoRowsExtracted => ReportViews {
                group_by: report.group_by.clone(),
                ..ReportViews::default()
            },
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(RevchonkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf_extraction::Strategy;

    #[test]
    fn test_single_embedded_block() {
        let text = "Revenue by service\nREVROW \"0,SVC1,Streaming,100,120,20,$50.00\"\nPage 1 of 1\n";
        let rows = extract_rows(text, &RevchonkConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, Some(50.0));
        assert_eq!(rows[0].net_adds, Some(20));
        assert_eq!(rows[0].source, Strategy::Embedded);
    }

    #[test]
    fn test_same_record_from_both_strategies() {
        let text = "REVROW \"0,SVC1,Streaming,100,120,20,$50.00\"\n\
                    SVC1 Streaming 100 120 20 $50.00\n\
                    SVC2 Music 10 12 2 $7.00\n";
        let rows = extract_rows(text, &RevchonkConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, Strategy::Embedded);
        assert_eq!(rows[1].code, "SVC2");
    }

    #[test]
    fn test_letter_only_code_collapses_across_strategies() {
        let text = "TV Cable 1 2 1 $5.00\n\
                    REVROW \"0,TV,Cable,1,2,1,$5.00\"\n";
        let rows = extract_rows(text, &RevchonkConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "TV");
        assert_eq!(rows[0].source, Strategy::Embedded);
    }

    #[test]
    fn test_huge_counts_do_not_overflow_views() {
        let text = "A1 Tv 0 9223372036854775807 1 $1.00\n\
                    B1 Tv 0 9223372036854775807 2 $1.00\n";
        let rows = extract_rows(text, &RevchonkConfig::default());
        assert_eq!(rows.len(), 2);
        let views = ReportViews::compute(&rows, "Service", 10);
        assert_eq!(views.totals.subscribers, i64::MAX);
        assert_eq!(views.summary[0].net_change, i64::MAX);
    }

    #[test]
    fn test_csv_views() {
        let csv = "code,service,subCountStart,subCountEnd,revenue\n\
                   A,Tv,10,15,$100.00\n\
                   B,Radio,8,4,$300.00\n\
                   C,Tv,1,2,$250.00\n";
        let report = Pipeline::default().process(&RawDocument::csv(csv)).unwrap();
        assert!(matches!(report.extraction, Extraction::Table(_)));
        assert_eq!(report.views.totals.revenue, 650.0);
        assert_eq!(report.views.totals.subscribers, 21);
        let groups: Vec<&str> = report.views.summary.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(groups, vec!["Tv", "Radio"]);
        assert_eq!(report.views.summary[0].net_change, 6);
        assert_eq!(report.views.top_decliners[0].code, "B");
        assert_eq!(
            report.to_csv().unwrap().lines().nth(2),
            Some("B,Radio,8,4,-4,300.00,-4")
        );
    }

    #[test]
    fn test_header_only_csv_is_no_rows() {
        let report = Pipeline::default()
            .process(&RawDocument::csv("code,revenue\n"))
            .unwrap();
        assert!(report.is_empty());
        assert!(report.rows().is_empty());
    }

    #[test]
    fn test_size_guard_applies() {
        let mut config = RevchonkConfig::default();
        config.report.max_input_bytes = 4;
        let err = Pipeline::new(config)
            .process(&RawDocument::csv("code,revenue\n"))
            .unwrap_err();
        assert!(matches!(err, crate::types::RevchonkError::DocumentTooLarge { .. }));
    }
}
