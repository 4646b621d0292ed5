// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # har-insights
//!
//! Endpoint schema inference and traffic pattern detection for recorded
//! HTTP exchanges (HAR captures).
//!
//! ## Features
//!
//! - **Schema Inference**: Structural schemas from JSON bodies, merged across samples
//! - **Endpoint Templates**: `/users/42` and `/users/7` become `/users/{id}`
//! - **Endpoint Aggregation**: Parameters, headers, status codes and schemas per endpoint
//! - **Anomaly Detection**: Twelve heuristics from waterfall gaps to missing cache headers
//! - **OpenAPI Output**: Render inferred endpoints as an OpenAPI 3.0.3 document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use har_insights::{load_har, Analyzer, AnalyzerConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let exchanges = load_har("capture.har")?;
//!     let report = Analyzer::new(AnalyzerConfig::default()).analyze(&exchanges);
//!
//!     for pattern in &report.patterns {
//!         println!("[{}] {}", pattern.severity, pattern.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 HAR loader → CapturedExchange[]              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                 ┌──────────────┴──────────────┐
//! ┌───────────────┴──────────────┐ ┌────────────┴─────────────────┐
//! │ Normalizer → Aggregator      │ │ Detectors (12, independent)  │
//! │   └ Schema builder / merger  │ │   └ Ranking / filtering      │
//! └───────────────┬──────────────┘ └────────────┬─────────────────┘
//!                 │ EndpointAggregate[]         │ Pattern[]
//!          OpenAPI generator           CLI / HTTP service
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Captured exchange model
pub mod exchange;

/// HAR 1.2 loader
pub mod har;

/// Schema inference from JSON bodies
pub mod schema;

/// URL normalization and endpoint aggregation
pub mod endpoint;

/// Anomaly detectors, ranking and filtering
pub mod patterns;

/// Analyzer configuration and thresholds
pub mod config;

/// Analyzer service and reports
pub mod engine;

/// OpenAPI document generation
pub mod openapi;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, AnalyzerConfig, DetectorThresholds};
pub use endpoint::{aggregate_endpoints, normalize_url, EndpointAggregate};
pub use engine::{AnalysisReport, Analyzer, BatchSummary};
pub use exchange::CapturedExchange;
pub use har::{load_har, parse_har};
pub use openapi::{generate_openapi, OpenApiOptions};
pub use patterns::{detect_patterns, filter_patterns, rank_patterns, Pattern, PatternFilter, Severity};
pub use schema::{build_schema, merge_schemas, SchemaNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
