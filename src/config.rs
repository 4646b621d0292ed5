//! Analyzer configuration
//!
//! Every tunable threshold used by the detectors lives in
//! [`DetectorThresholds`]. The defaults are heuristics, tunable rather than
//! correctness-critical. A configuration can be loaded from YAML:
//!
//! ```yaml
//! schema:
//!   max_depth: 64
//! detectors:
//!   waterfall_gap_ms: 500
//!   large_cookie_bytes: 4096
//!   max_examples: 5
//! ```

use crate::error::{Error, Result};
use crate::schema::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Default Constants
// ============================================================================

/// Idle time between consecutive requests that counts as a gap
pub const WATERFALL_GAP_MS: f64 = 500.0;
/// DNS phase above this is slow
pub const SLOW_DNS_MS: f64 = 200.0;
/// TLS handshake above this is slow
pub const SLOW_SSL_MS: f64 = 500.0;
/// Server wait (TTFB) above this is slow
pub const SLOW_WAIT_MS: f64 = 3000.0;
/// More slow DNS records than this escalates timing anomalies to high
pub const DNS_ANOMALY_ESCALATION: usize = 5;
/// More slow wait records than this escalates timing anomalies to high
pub const WAIT_ANOMALY_ESCALATION: usize = 3;
/// Request cookies above this many bytes are oversized
pub const LARGE_COOKIE_BYTES: usize = 4096;
/// Calls to sibling API endpoints within this window could be batched
pub const BATCH_WINDOW_MS: f64 = 2000.0;
/// Minimum calls in a window to suggest batching
pub const BATCH_MIN_CALLS: usize = 2;
/// Saved requests at which batching becomes medium severity
pub const BATCH_MEDIUM_SAVINGS: usize = 5;
/// Images above this size should not be fetched with high priority
pub const LARGE_IMAGE_BYTES: u64 = 100 * 1024;
/// Repetitions of the same request that count as a duplicate
pub const DUPLICATE_MIN_COUNT: usize = 2;
/// Repetitions of one request that escalate duplicates to high
pub const DUPLICATE_HIGH_COUNT: usize = 5;
/// More redirects than this raises redirect severity to medium
pub const REDIRECT_MEDIUM_COUNT: usize = 5;
/// Uncached static assets at which severity becomes medium
pub const UNCACHED_MEDIUM_COUNT: usize = 10;
/// Minimum exchanges before sequential loading is judged
pub const SEQUENTIAL_MIN_REQUESTS: usize = 5;
/// Share of sequential requests above which loading is flagged
pub const SEQUENTIAL_RATIO: f64 = 0.5;
/// Examples attached to each finding
pub const MAX_EXAMPLES: usize = 5;

// ============================================================================
// Detector Thresholds
// ============================================================================

/// Thresholds for the anomaly detectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorThresholds {
    pub waterfall_gap_ms: f64,
    pub slow_dns_ms: f64,
    pub slow_ssl_ms: f64,
    pub slow_wait_ms: f64,
    pub dns_anomaly_escalation: usize,
    pub wait_anomaly_escalation: usize,
    pub large_cookie_bytes: usize,
    pub batch_window_ms: f64,
    pub batch_min_calls: usize,
    pub batch_medium_savings: usize,
    pub large_image_bytes: u64,
    pub duplicate_min_count: usize,
    pub duplicate_high_count: usize,
    pub redirect_medium_count: usize,
    pub uncached_medium_count: usize,
    pub sequential_min_requests: usize,
    pub sequential_ratio: f64,
    /// Examples attached to each finding
    pub max_examples: usize,
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self {
            waterfall_gap_ms: WATERFALL_GAP_MS,
            slow_dns_ms: SLOW_DNS_MS,
            slow_ssl_ms: SLOW_SSL_MS,
            slow_wait_ms: SLOW_WAIT_MS,
            dns_anomaly_escalation: DNS_ANOMALY_ESCALATION,
            wait_anomaly_escalation: WAIT_ANOMALY_ESCALATION,
            large_cookie_bytes: LARGE_COOKIE_BYTES,
            batch_window_ms: BATCH_WINDOW_MS,
            batch_min_calls: BATCH_MIN_CALLS,
            batch_medium_savings: BATCH_MEDIUM_SAVINGS,
            large_image_bytes: LARGE_IMAGE_BYTES,
            duplicate_min_count: DUPLICATE_MIN_COUNT,
            duplicate_high_count: DUPLICATE_HIGH_COUNT,
            redirect_medium_count: REDIRECT_MEDIUM_COUNT,
            uncached_medium_count: UNCACHED_MEDIUM_COUNT,
            sequential_min_requests: SEQUENTIAL_MIN_REQUESTS,
            sequential_ratio: SEQUENTIAL_RATIO,
            max_examples: MAX_EXAMPLES,
        }
    }
}

// ============================================================================
// Schema Config
// ============================================================================

/// Schema inference settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Nesting depth at which a subtree is truncated
    pub max_depth: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// Analyzer Config
// ============================================================================

/// Complete analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Detector thresholds
    pub detectors: DetectorThresholds,
    /// Schema inference settings
    pub schema: SchemaConfig,
}

impl AnalyzerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let d = &self.detectors;
        if d.max_examples == 0 {
            return Err(Error::invalid_value(
                "detectors.max_examples",
                "must be greater than zero",
            ));
        }
        if self.schema.max_depth == 0 {
            return Err(Error::invalid_value(
                "schema.max_depth",
                "must be greater than zero",
            ));
        }
        if d.batch_min_calls < 2 {
            return Err(Error::invalid_value(
                "detectors.batch_min_calls",
                "a batch needs at least two calls",
            ));
        }
        if d.duplicate_min_count < 2 {
            return Err(Error::invalid_value(
                "detectors.duplicate_min_count",
                "a duplicate needs at least two requests",
            ));
        }
        if !(0.0..=1.0).contains(&d.sequential_ratio) {
            return Err(Error::invalid_value(
                "detectors.sequential_ratio",
                "must be between 0 and 1",
            ));
        }
        for (field, value) in [
            ("detectors.waterfall_gap_ms", d.waterfall_gap_ms),
            ("detectors.slow_dns_ms", d.slow_dns_ms),
            ("detectors.slow_ssl_ms", d.slow_ssl_ms),
            ("detectors.slow_wait_ms", d.slow_wait_ms),
            ("detectors.batch_window_ms", d.batch_window_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_value(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }
}

/// Load an analyzer configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalyzerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load an analyzer configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<AnalyzerConfig> {
    let config: AnalyzerConfig = if yaml.trim().is_empty() {
        AnalyzerConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?
    };
    config.validate()?;
    Ok(config)
}
