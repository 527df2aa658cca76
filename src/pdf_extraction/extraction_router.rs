// Row recognition over extracted PDF text
//
// Every enabled strategy runs against the same text, unconditionally. The
// candidate sequences are concatenated in strategy order (embedded blocks,
// then fallback lines, then tab-separated lines) and reconciled later by the
// deduplicator's first-wins rule. No strategy decides whether another is
// "right".

use super::{embedded_block, line_pattern, tabbed_lines};
use crate::config::RecognizerConfig;
use crate::rows::CandidateRow;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which recognizer produced a candidate row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Embedded,
    Fallback,
    Tabbed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Embedded => write!(f, "embedded"),
            Strategy::Fallback => write!(f, "fallback"),
            Strategy::Tabbed => write!(f, "tabbed"),
        }
    }
}

pub struct ExtractionRouter;

impl ExtractionRouter {
    /// Enabled strategies, in the order their output is concatenated.
    pub fn strategies(config: &RecognizerConfig) -> Vec<Strategy> {
        let mut chain = vec![Strategy::Embedded, Strategy::Fallback];
        if config.tabbed_lines {
            chain.push(Strategy::Tabbed);
        }
        chain
    }

    /// Run a single strategy.
    pub fn run(strategy: Strategy, text: &str, config: &RecognizerConfig) -> Vec<CandidateRow> {
        match strategy {
            Strategy::Embedded => {
                embedded_block::recognize(text, &config.marker, config.parentheses_as_negative)
            }
            Strategy::Fallback => line_pattern::recognize(text, config.parentheses_as_negative),
            Strategy::Tabbed => tabbed_lines::recognize(text),
        }
    }

    /// All candidates from all enabled strategies, blank rows removed.
    pub fn recognize(text: &str, config: &RecognizerConfig) -> Vec<CandidateRow> {
        let mut candidates = Vec::new();
        for strategy in Self::strategies(config) {
            let rows = Self::run(strategy, text, config);
            debug!("{} strategy produced {} candidates", strategy, rows.len());
            candidates.extend(rows.into_iter().filter(|row| !row.is_blank()));
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "Monthly Revenue Report\n\
                         REVROW \"0,SVC1,Streaming,100,120,20,$50.00\"\n\
                         SVC2 Music 10 5 -5 $(12.00)\n\
                         SVC3 News 7 9 2 $3.50\n\
                         A1\tPodcasts\t4\t6\n";

    #[test]
    fn test_strategy_chain() {
        let mut config = RecognizerConfig::default();
        assert_eq!(
            ExtractionRouter::strategies(&config),
            vec![Strategy::Embedded, Strategy::Fallback]
        );
        config.tabbed_lines = true;
        assert_eq!(ExtractionRouter::strategies(&config).last(), Some(&Strategy::Tabbed));
    }

    #[test]
    fn test_embedded_rows_come_first() {
        let config = RecognizerConfig::default();
        let rows = ExtractionRouter::recognize(MIXED, &config);
        let sources: Vec<Strategy> = rows.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![Strategy::Embedded, Strategy::Fallback, Strategy::Fallback]
        );
        assert_eq!(rows[0].code, "SVC1");
        assert_eq!(rows[1].code, "SVC2");
        assert_eq!(rows[2].code, "SVC3");
    }

    #[test]
    fn test_tabbed_rows_rank_last() {
        let config = RecognizerConfig {
            tabbed_lines: true,
            ..RecognizerConfig::default()
        };
        let rows = ExtractionRouter::recognize(MIXED, &config);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].source, Strategy::Tabbed);
        assert_eq!(rows[3].service, "Podcasts");
    }

    #[test]
    fn test_nothing_recognized() {
        let rows = ExtractionRouter::recognize("just prose\nno numbers here", &RecognizerConfig::default());
        assert!(rows.is_empty());
    }
}
