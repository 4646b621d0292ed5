//! Pattern types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Finding severity; orders `High` first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_value("severity", format!("unknown severity '{s}'")))
    }
}

/// Detector kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    WaterfallGap,
    TimingAnomaly,
    MixedContent,
    LargeCookies,
    ApiBatching,
    PriorityMismatch,
    DuplicateRequests,
    FailedRequests,
    Redirects,
    MissingCors,
    UncachedStatic,
    SequentialLoading,
}

impl PatternType {
    /// All kinds in detector order
    pub const ALL: [PatternType; 12] = [
        PatternType::WaterfallGap,
        PatternType::TimingAnomaly,
        PatternType::MixedContent,
        PatternType::LargeCookies,
        PatternType::ApiBatching,
        PatternType::PriorityMismatch,
        PatternType::DuplicateRequests,
        PatternType::FailedRequests,
        PatternType::Redirects,
        PatternType::MissingCors,
        PatternType::UncachedStatic,
        PatternType::SequentialLoading,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatternType::WaterfallGap => "waterfall_gap",
            PatternType::TimingAnomaly => "timing_anomaly",
            PatternType::MixedContent => "mixed_content",
            PatternType::LargeCookies => "large_cookies",
            PatternType::ApiBatching => "api_batching",
            PatternType::PriorityMismatch => "priority_mismatch",
            PatternType::DuplicateRequests => "duplicate_requests",
            PatternType::FailedRequests => "failed_requests",
            PatternType::Redirects => "redirects",
            PatternType::MissingCors => "missing_cors",
            PatternType::UncachedStatic => "uncached_static",
            PatternType::SequentialLoading => "sequential_loading",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_");
        PatternType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::invalid_value("type", format!("unknown pattern type '{s}'")))
    }
}

/// One illustrative exchange attached to a finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternExample {
    pub url: String,
    /// Index into the original exchange list
    pub index: usize,
    pub detail: String,
}

impl PatternExample {
    pub fn new(url: impl Into<String>, index: usize, detail: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index,
            detail: detail.into(),
        }
    }
}

/// One heuristic finding across a set of exchanges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub affected_count: usize,
    /// Capped list of examples
    pub examples: Vec<PatternExample>,
    pub recommendation: String,
    /// Aggregate cost, e.g. `"1.2s total wait"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Indices into the original exchange list
    pub all_affected_indices: Vec<usize>,
}

/// Selects findings by severity and type.
///
/// An empty type set matches every type. The severity set defaults to all
/// three severities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFilter {
    pub severities: BTreeSet<Severity>,
    pub types: BTreeSet<PatternType>,
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self {
            severities: Severity::ALL.into_iter().collect(),
            types: BTreeSet::new(),
        }
    }
}

impl PatternFilter {
    /// Filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given severities
    #[must_use]
    pub fn with_severities(mut self, severities: impl IntoIterator<Item = Severity>) -> Self {
        self.severities = severities.into_iter().collect();
        self
    }

    /// Restrict to the given types
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = PatternType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Parse comma-separated lists such as `"high,medium"`.
    ///
    /// `None` or blank input leaves that dimension unrestricted.
    pub fn parse(severities: Option<&str>, types: Option<&str>) -> Result<Self> {
        let mut filter = Self::new();
        if let Some(list) = severities.filter(|s| !s.trim().is_empty()) {
            filter.severities = parse_list(list)?;
        }
        if let Some(list) = types.filter(|s| !s.trim().is_empty()) {
            filter.types = parse_list(list)?;
        }
        Ok(filter)
    }

    /// Whether a finding passes the filter
    pub fn matches(&self, pattern: &Pattern) -> bool {
        self.severities.contains(&pattern.severity)
            && (self.types.is_empty() || self.types.contains(&pattern.pattern_type))
    }
}

fn parse_list<T: FromStr<Err = Error> + Ord>(list: &str) -> Result<BTreeSet<T>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
