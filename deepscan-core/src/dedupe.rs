use crate::model::DeepScanIssue;
use std::collections::HashSet;

/// Collapse issues sharing a fingerprint, keeping the first one seen.
///
/// Order is preserved. Applied per page across states, then again across pages.
pub fn dedupe(issues: Vec<DeepScanIssue>) -> Vec<DeepScanIssue> {
    let mut seen = HashSet::with_capacity(issues.len());
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.fingerprint()))
        .collect()
}
