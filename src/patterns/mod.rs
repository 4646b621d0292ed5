//! Pattern module
//!
//! Heuristic performance and correctness findings over a batch of
//! exchanges. Every detector is a plain function over the full list with
//! its thresholds taken from [`crate::config::DetectorThresholds`].

mod detectors;
mod ranking;
mod types;

pub use detectors::{
    detect_api_batching, detect_duplicate_requests, detect_failed_requests,
    detect_large_cookies, detect_missing_cors, detect_mixed_content, detect_priority_mismatch,
    detect_redirects, detect_sequential_loading, detect_timing_anomalies,
    detect_uncached_static, detect_waterfall_gaps, Detector, DETECTORS,
};
pub use ranking::{detect_patterns, filter_patterns, rank_patterns};
pub use types::{Pattern, PatternExample, PatternFilter, PatternType, Severity};
