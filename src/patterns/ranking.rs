//! Running, ranking and filtering detectors

use super::detectors::DETECTORS;
use super::types::{Pattern, PatternFilter};
use crate::config::DetectorThresholds;
use crate::exchange::CapturedExchange;
use tracing::debug;

/// Run every detector and rank the findings
pub fn detect_patterns(exchanges: &[CapturedExchange], limits: &DetectorThresholds) -> Vec<Pattern> {
    let findings: Vec<Pattern> = DETECTORS
        .iter()
        .filter_map(|(kind, detector)| {
            let finding = detector(exchanges, limits);
            if let Some(pattern) = &finding {
                debug!(
                    "Detector {} flagged {} exchanges ({})",
                    kind, pattern.affected_count, pattern.severity
                );
            }
            finding
        })
        .collect();
    rank_patterns(findings)
}

/// Sort by severity, most severe first. The sort is stable, so detector
/// order breaks ties.
pub fn rank_patterns(mut patterns: Vec<Pattern>) -> Vec<Pattern> {
    patterns.sort_by_key(|p| p.severity);
    patterns
}

/// Borrow the findings that pass `filter`, in their existing order
pub fn filter_patterns<'a>(patterns: &'a [Pattern], filter: &PatternFilter) -> Vec<&'a Pattern> {
    patterns.iter().filter(|p| filter.matches(p)).collect()
}
