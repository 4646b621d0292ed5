//! Analysis engine module
//!
//! Ties the pipelines together for the host surfaces.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Analyzer` - Runs aggregation, detection and summary with one config
//! - `BatchSummary` - Batch-level counts and timings
//! - `AnalysisReport` - The combined output of one run
//!
//! The analyzer holds only its configuration. Every call recomputes its
//! result from the exchanges it is given.

mod types;

pub use types::{status_class, AnalysisReport, BatchSummary, OTHER_STATUS_CLASS};

use crate::config::AnalyzerConfig;
use crate::endpoint::{aggregate_endpoints_with, EndpointAggregate};
use crate::exchange::CapturedExchange;
use crate::patterns::{detect_patterns, filter_patterns, Pattern, PatternFilter};
use crate::schema::SchemaBuilder;
use std::time::Instant;
use tracing::{debug, info};

/// Stateless analyzer over batches of exchanges
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn schema_builder(&self) -> SchemaBuilder {
        SchemaBuilder::new().with_max_depth(self.config.schema.max_depth)
    }

    /// Group exchanges into endpoints
    pub fn endpoints(&self, exchanges: &[CapturedExchange]) -> Vec<EndpointAggregate> {
        aggregate_endpoints_with(exchanges, &self.schema_builder())
    }

    /// Run all detectors; findings are ranked by severity
    pub fn patterns(&self, exchanges: &[CapturedExchange]) -> Vec<Pattern> {
        detect_patterns(exchanges, &self.config.detectors)
    }

    /// Run all detectors and keep the findings that pass `filter`
    pub fn filtered_patterns(
        &self,
        exchanges: &[CapturedExchange],
        filter: &PatternFilter,
    ) -> Vec<Pattern> {
        let patterns = self.patterns(exchanges);
        filter_patterns(&patterns, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Batch-level statistics
    pub fn summary(&self, exchanges: &[CapturedExchange]) -> BatchSummary {
        BatchSummary::from_exchanges(exchanges)
    }

    /// Summary, endpoints and findings in one report
    pub fn analyze(&self, exchanges: &[CapturedExchange]) -> AnalysisReport {
        let started = Instant::now();
        debug!("Analyzing {} exchanges", exchanges.len());

        let report = AnalysisReport {
            summary: self.summary(exchanges),
            endpoints: self.endpoints(exchanges),
            patterns: self.patterns(exchanges),
        };

        info!(
            "Analyzed {} exchanges: {} endpoints, {} findings in {}ms",
            exchanges.len(),
            report.endpoints.len(),
            report.patterns.len(),
            started.elapsed().as_millis()
        );
        report
    }
}
