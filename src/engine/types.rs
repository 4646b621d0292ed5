//! Analysis report types

use crate::endpoint::EndpointAggregate;
use crate::exchange::CapturedExchange;
use crate::patterns::Pattern;
use serde::Serialize;
use std::collections::BTreeMap;

/// Status class bucket for codes outside 200..=599
pub const OTHER_STATUS_CLASS: &str = "other";

/// Batch-level statistics over a list of exchanges
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_requests: usize,
    /// Sum of response body sizes
    pub total_bytes: u64,
    /// Sum of per-exchange elapsed time (ms)
    pub total_time: f64,
    /// Earliest start to latest end (ms)
    pub span_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_started_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_finished_ms: Option<f64>,
    pub avg_response_time: f64,
    /// Distinct hosts in first-seen order
    pub domains: Vec<String>,
    /// `2xx`..`5xx` and `other`
    pub status_classes: BTreeMap<String, usize>,
    /// Upper-cased method → count
    pub methods: BTreeMap<String, usize>,
}

impl BatchSummary {
    /// Summarize a batch; an empty batch yields zeroes
    pub fn from_exchanges(exchanges: &[CapturedExchange]) -> Self {
        let mut summary = Self {
            total_requests: exchanges.len(),
            ..Self::default()
        };

        for exchange in exchanges {
            summary.total_bytes += exchange.response_body.size;
            summary.total_time += exchange.time.max(0.0);

            let start = exchange.started_ms;
            let end = exchange.end_ms();
            summary.first_started_ms = Some(summary.first_started_ms.map_or(start, |s| s.min(start)));
            summary.last_finished_ms = Some(summary.last_finished_ms.map_or(end, |e| e.max(end)));

            let domain = exchange.domain_or_unknown();
            if !summary.domains.contains(&domain) {
                summary.domains.push(domain);
            }

            *summary
                .status_classes
                .entry(status_class(exchange.status))
                .or_default() += 1;
            *summary
                .methods
                .entry(exchange.method.to_ascii_uppercase())
                .or_default() += 1;
        }

        if let (Some(first), Some(last)) = (summary.first_started_ms, summary.last_finished_ms) {
            summary.span_ms = last - first;
        }
        if !exchanges.is_empty() {
            summary.avg_response_time = summary.total_time / exchanges.len() as f64;
        }
        summary
    }

    /// Count for a status class such as `"4xx"`
    pub fn status_count(&self, class: &str) -> usize {
        self.status_classes.get(class).copied().unwrap_or(0)
    }
}

/// `2xx`-style bucket for a status code
pub fn status_class(status: u16) -> String {
    match status {
        200..=599 => format!("{}xx", status / 100),
        _ => OTHER_STATUS_CLASS.to_string(),
    }
}

/// Everything the analyzer derives from one batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: BatchSummary,
    pub endpoints: Vec<EndpointAggregate>,
    pub patterns: Vec<Pattern>,
}
