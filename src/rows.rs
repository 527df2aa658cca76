// Candidate and canonical report rows
use crate::aggregate::{net_change, ReportRow};
use crate::pdf_extraction::Strategy;
use serde::{Deserialize, Serialize};

/// A tentative record from one recognizer strategy. Absent numbers are `None`,
/// an unrecognized code or service is the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub code: String,
    pub service: String,
    pub start_count: Option<i64>,
    pub end_count: Option<i64>,
    pub change_count: Option<i64>,
    pub revenue_raw: String,
    pub revenue: Option<f64>,
    pub source: Strategy,
}

impl CandidateRow {
    /// True when every field is absent or empty; only such rows are dropped.
    pub fn is_blank(&self) -> bool {
        self.code.is_empty()
            && self.service.is_empty()
            && self.start_count.is_none()
            && self.end_count.is_none()
            && self.change_count.is_none()
            && self.revenue_raw.is_empty()
            && self.revenue.is_none()
    }

    pub fn identity_key(&self, include_service: bool) -> IdentityKey {
        IdentityKey {
            code: self.code.clone(),
            start_count: self.start_count,
            end_count: self.end_count,
            change_count: self.change_count,
            service: include_service.then(|| self.service.clone()),
        }
    }
}

/// Fields that decide whether two rows are the same logical record.
/// Revenue is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub code: String,
    pub start_count: Option<i64>,
    pub end_count: Option<i64>,
    pub change_count: Option<i64>,
    pub service: Option<String>,
}

/// The single surviving row per identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub code: String,
    pub service: String,
    pub start_count: Option<i64>,
    pub end_count: Option<i64>,
    pub change_count: Option<i64>,
    pub revenue: Option<f64>,
    pub net_adds: Option<i64>,
    pub source: Strategy,
}

impl From<CandidateRow> for CanonicalRow {
    fn from(row: CandidateRow) -> Self {
        Self {
            net_adds: net_change(row.start_count, row.end_count),
            code: row.code,
            service: row.service,
            start_count: row.start_count,
            end_count: row.end_count,
            change_count: row.change_count,
            revenue: row.revenue,
            source: row.source,
        }
    }
}

impl From<CanonicalRow> for CandidateRow {
    fn from(row: CanonicalRow) -> Self {
        Self {
            revenue_raw: row.revenue.map(|r| r.to_string()).unwrap_or_default(),
            code: row.code,
            service: row.service,
            start_count: row.start_count,
            end_count: row.end_count,
            change_count: row.change_count,
            revenue: row.revenue,
            source: row.source,
        }
    }
}

impl ReportRow for CanonicalRow {
    fn code(&self) -> String {
        self.code.clone()
    }

    fn service(&self) -> String {
        self.service.clone()
    }

    fn start_count(&self) -> Option<i64> {
        self.start_count
    }

    fn end_count(&self) -> Option<i64> {
        self.end_count
    }

    fn revenue(&self) -> Option<f64> {
        self.revenue
    }

    fn change_count(&self) -> Option<i64> {
        self.change_count
    }

    fn net_change(&self) -> Option<i64> {
        self.net_adds
    }

    /// Categories are addressed by the exported column names.
    fn category(&self, column: &str) -> Option<String> {
        let fmt_count = |v: Option<i64>| v.map(|n| n.to_string());
        match column.to_ascii_lowercase().as_str() {
            "code" => Some(self.code.clone()),
            "service" => Some(self.service.clone()),
            "start subs" => fmt_count(self.start_count),
            "end subs" => fmt_count(self.end_count),
            "change" => fmt_count(self.change_count),
            "net adds" => fmt_count(self.net_adds),
            "source" => Some(self.source.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn candidate(
    code: &str,
    service: &str,
    counts: (Option<i64>, Option<i64>, Option<i64>),
    revenue: Option<f64>,
    source: Strategy,
) -> CandidateRow {
    CandidateRow {
        code: code.to_string(),
        service: service.to_string(),
        start_count: counts.0,
        end_count: counts.1,
        change_count: counts.2,
        revenue_raw: revenue.map(|r| r.to_string()).unwrap_or_default(),
        revenue,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        let blank = candidate("", "", (None, None, None), None, Strategy::Fallback);
        assert!(blank.is_blank());

        let partial = candidate("", "", (None, Some(3), None), None, Strategy::Fallback);
        assert!(!partial.is_blank());
    }

    #[test]
    fn test_canonical_net_adds() {
        let row: CanonicalRow =
            candidate("A", "Tv", (Some(100), Some(120), Some(20)), Some(1.0), Strategy::Embedded).into();
        assert_eq!(row.net_adds, Some(20));

        let row: CanonicalRow =
            candidate("A", "Tv", (None, Some(120), None), None, Strategy::Embedded).into();
        assert_eq!(row.net_adds, None);
    }

    #[test]
    fn test_identity_key_service_toggle() {
        let a = candidate("A", "Tv", (Some(1), Some(2), Some(1)), Some(5.0), Strategy::Embedded);
        let b = candidate("A", "Radio", (Some(1), Some(2), Some(1)), Some(9.0), Strategy::Fallback);
        assert_eq!(a.identity_key(false), b.identity_key(false));
        assert_ne!(a.identity_key(true), b.identity_key(true));
    }

    #[test]
    fn test_category_lookup() {
        let row: CanonicalRow =
            candidate("A", "Tv", (Some(1), Some(4), Some(3)), None, Strategy::Fallback).into();
        assert_eq!(row.category("Service").as_deref(), Some("Tv"));
        assert_eq!(row.category("net adds").as_deref(), Some("3"));
        assert_eq!(row.category("package"), None);
    }
}
