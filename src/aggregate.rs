//! Derived fields and grouped views over report rows.
//!
//! Works on anything implementing [`ReportRow`], so canonical rows from the
//! PDF path and raw CSV rows share one implementation.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub trait ReportRow {
    fn code(&self) -> String;
    fn service(&self) -> String;
    fn start_count(&self) -> Option<i64>;
    fn end_count(&self) -> Option<i64>;
    fn revenue(&self) -> Option<f64>;

    /// Reported change column; sources without one fall back to net change.
    fn change_count(&self) -> Option<i64> {
        self.net_change()
    }

    fn net_change(&self) -> Option<i64> {
        net_change(self.start_count(), self.end_count())
    }

    /// Value of a caller-named grouping column, if the row has one.
    fn category(&self, column: &str) -> Option<String>;
}

/// `end - start`; absent if either side is absent.
pub fn net_change(start: Option<i64>, end: Option<i64>) -> Option<i64> {
    end?.checked_sub(start?)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of present revenues; absent ones count as 0 here.
    pub revenue: f64,
    pub rows: usize,
    pub rows_with_revenue: usize,
    /// Sum of present end-period counts, saturating at the `i64` bounds.
    pub subscribers: i64,
}

impl Totals {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

pub fn totals<R: ReportRow>(rows: &[R]) -> Totals {
    let mut totals = Totals {
        rows: rows.len(),
        ..Totals::default()
    };
    for row in rows {
        if let Some(revenue) = row.revenue() {
            totals.revenue += revenue;
            totals.rows_with_revenue += 1;
        }
        totals.subscribers = totals.subscribers.saturating_add(row.end_count().unwrap_or(0));
    }
    totals
}

pub fn total_revenue<R: ReportRow>(rows: &[R]) -> f64 {
    totals(rows).revenue
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub revenue: f64,
    pub net_change: i64,
    pub rows: usize,
}

/// Group by `column`, summing revenue and net change per group, ordered by
/// descending revenue. Rows without the column land in the "" group; equal
/// revenues keep first-seen order.
pub fn summarize_by<R: ReportRow>(rows: &[R], column: &str) -> Vec<SummaryRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<SummaryRow> = Vec::new();

    for row in rows {
        let category = row.category(column).unwrap_or_default();
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            groups.push(SummaryRow {
                category,
                revenue: 0.0,
                net_change: 0,
                rows: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.revenue += row.revenue().unwrap_or(0.0);
        group.net_change = group.net_change.saturating_add(row.net_change().unwrap_or(0));
        group.rows += 1;
    }

    groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    groups
}

/// Top `n` rows by revenue, highest first. Rows without revenue are left out.
pub fn top_revenue<R: ReportRow>(rows: &[R], n: usize) -> Vec<&R> {
    top_by(rows, n, |row| row.revenue(), |a: &f64, b: &f64| b.total_cmp(a))
}

/// Top `n` rows by net change, largest gain first.
pub fn top_gainers<R: ReportRow>(rows: &[R], n: usize) -> Vec<&R> {
    top_by(rows, n, |row| row.net_change(), |a: &i64, b: &i64| b.cmp(a))
}

/// Top `n` rows by net change, largest loss first.
pub fn top_decliners<R: ReportRow>(rows: &[R], n: usize) -> Vec<&R> {
    top_by(rows, n, |row| row.net_change(), |a: &i64, b: &i64| a.cmp(b))
}

fn top_by<R, K, F, C>(rows: &[R], n: usize, key: F, cmp: C) -> Vec<&R>
where
    F: Fn(&R) -> Option<K>,
    C: Fn(&K, &K) -> Ordering,
{
    let mut keyed: Vec<(K, &R)> = rows
        .iter()
        .filter_map(|row| key(row).map(|k| (k, row)))
        .collect();
    // stable: ties keep table order
    keyed.sort_by(|a, b| cmp(&a.0, &b.0));
    keyed.into_iter().take(n).map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        group: &'static str,
        start: Option<i64>,
        end: Option<i64>,
        revenue: Option<f64>,
    }

    impl ReportRow for Row {
        fn code(&self) -> String {
            String::new()
        }
        fn service(&self) -> String {
            self.group.to_string()
        }
        fn start_count(&self) -> Option<i64> {
            self.start
        }
        fn end_count(&self) -> Option<i64> {
            self.end
        }
        fn revenue(&self) -> Option<f64> {
            self.revenue
        }
        fn category(&self, column: &str) -> Option<String> {
            (column == "group").then(|| self.group.to_string())
        }
    }

    fn row(group: &'static str, start: Option<i64>, end: Option<i64>, revenue: Option<f64>) -> Row {
        Row { group, start, end, revenue }
    }

    #[test]
    fn test_net_change() {
        assert_eq!(net_change(Some(100), Some(120)), Some(20));
        assert_eq!(net_change(None, Some(120)), None);
        assert_eq!(net_change(Some(100), None), None);
    }

    #[test]
    fn test_totals_skip_absent() {
        let rows = vec![
            row("A", Some(1), Some(3), Some(10.0)),
            row("A", None, None, None),
            row("B", Some(2), Some(5), Some(2.5)),
        ];
        let t = totals(&rows);
        assert_eq!(t.revenue, 12.5);
        assert_eq!(t.rows, 3);
        assert_eq!(t.rows_with_revenue, 2);
        assert_eq!(t.subscribers, 8);
        assert!(totals::<Row>(&[]).is_empty());
    }

    #[test]
    fn test_huge_counts_saturate() {
        let rows = vec![
            row("A", Some(0), Some(i64::MAX), Some(1.0)),
            row("A", Some(0), Some(i64::MAX), Some(1.0)),
            row("B", Some(i64::MAX), Some(i64::MIN), None),
        ];
        assert_eq!(totals(&rows[..2]).subscribers, i64::MAX);

        let summary = summarize_by(&rows, "group");
        assert_eq!(summary[0].category, "A");
        assert_eq!(summary[0].net_change, i64::MAX);
        // end - start underflows, so B has no net change at all
        assert_eq!(summary[1].net_change, 0);
    }

    #[test]
    fn test_summary_sorted_by_revenue() {
        let rows = vec![
            row("A", Some(0), Some(5), Some(300.0)),
            row("C", Some(0), Some(1), Some(200.0)),
            row("B", Some(10), Some(4), Some(1500.0)),
            row("A", Some(0), Some(2), Some(200.0)),
        ];
        let summary = summarize_by(&rows, "group");
        let order: Vec<&str> = summary.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert_eq!(summary[1].revenue, 500.0);
        assert_eq!(summary[1].net_change, 7);
        assert_eq!(summary[0].net_change, -6);
    }

    #[test]
    fn test_unknown_column_single_group() {
        let rows = vec![row("A", None, None, Some(1.0)), row("B", None, None, Some(2.0))];
        let summary = summarize_by(&rows, "nope");
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].category, "");
        assert_eq!(summary[0].rows, 2);
    }

    #[test]
    fn test_top_views() {
        let rows = vec![
            row("a", Some(10), Some(15), Some(5.0)),
            row("b", Some(10), Some(2), None),
            row("c", None, Some(9), Some(50.0)),
            row("d", Some(0), Some(30), Some(20.0)),
        ];
        let by_revenue: Vec<&str> = top_revenue(&rows, 10).iter().map(|r| r.group).collect();
        assert_eq!(by_revenue, vec!["c", "d", "a"]);

        let gainers: Vec<&str> = top_gainers(&rows, 2).iter().map(|r| r.group).collect();
        assert_eq!(gainers, vec!["d", "a"]);

        let decliners: Vec<&str> = top_decliners(&rows, 1).iter().map(|r| r.group).collect();
        assert_eq!(decliners, vec!["b"]);
    }
}
