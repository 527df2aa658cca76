//! Collapse candidate rows from overlapping strategies into canonical rows.
//!
//! The first candidate seen for an identity key wins and later ones are
//! dropped whole; fields are never merged. Since revenue is not part of the
//! key, two rows with equal counts but different revenue collapse as well.

use crate::rows::{CandidateRow, CanonicalRow};
use log::debug;
use std::collections::HashSet;

pub fn dedupe(candidates: &[CandidateRow], include_service_in_key: bool) -> Vec<CanonicalRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if seen.insert(candidate.identity_key(include_service_in_key)) {
            rows.push(CanonicalRow::from(candidate.clone()));
        }
    }

    debug!(
        "dedupe kept {} of {} candidates ({} dropped)",
        rows.len(),
        candidates.len(),
        candidates.len() - rows.len()
    );
    rows
}
