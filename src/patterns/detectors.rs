//! Anomaly detectors
//!
//! Each detector scans the whole exchange list independently and returns at
//! most one [`Pattern`]. Detectors share no state; their order in
//! [`DETECTORS`] is the tie-break order used when ranking.

use super::types::{Pattern, PatternExample, PatternType, Severity};
use crate::config::DetectorThresholds;
use crate::exchange::{file_category, origin_of, CapturedExchange, FileCategory, ResourceKind};
use crate::types::OrderedMap;
use regex::Regex;
use std::sync::LazyLock;

/// Detector signature
pub type Detector = fn(&[CapturedExchange], &DetectorThresholds) -> Option<Pattern>;

/// Every detector, in reporting order
pub const DETECTORS: [(PatternType, Detector); 12] = [
    (PatternType::WaterfallGap, detect_waterfall_gaps),
    (PatternType::TimingAnomaly, detect_timing_anomalies),
    (PatternType::MixedContent, detect_mixed_content),
    (PatternType::LargeCookies, detect_large_cookies),
    (PatternType::ApiBatching, detect_api_batching),
    (PatternType::PriorityMismatch, detect_priority_mismatch),
    (PatternType::DuplicateRequests, detect_duplicate_requests),
    (PatternType::FailedRequests, detect_failed_requests),
    (PatternType::Redirects, detect_redirects),
    (PatternType::MissingCors, detect_missing_cors),
    (PatternType::UncachedStatic, detect_uncached_static),
    (PatternType::SequentialLoading, detect_sequential_loading),
];

/// Versioned API path segment such as `/v2/`
static VERSION_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v\d+/").unwrap());

// ============================================================================
// Helpers
// ============================================================================

/// Affected exchanges collected by one detector
struct Hits<'a> {
    exchanges: &'a [CapturedExchange],
    indices: Vec<usize>,
    examples: Vec<PatternExample>,
    max_examples: usize,
}

impl<'a> Hits<'a> {
    fn new(exchanges: &'a [CapturedExchange], limits: &DetectorThresholds) -> Self {
        Self {
            exchanges,
            indices: Vec::new(),
            examples: Vec::new(),
            max_examples: limits.max_examples,
        }
    }

    /// Record an affected exchange with an example detail
    fn push(&mut self, index: usize, detail: impl Into<String>) {
        self.indices.push(index);
        if self.examples.len() < self.max_examples {
            self.examples.push(PatternExample::new(
                &self.exchanges[index].url,
                index,
                detail,
            ));
        }
    }

    /// Record an affected exchange without an example
    fn push_index(&mut self, index: usize) {
        self.indices.push(index);
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn into_pattern(self, pattern_type: PatternType, severity: Severity, text: Text) -> Pattern {
        let mut indices = self.indices;
        indices.sort_unstable();
        indices.dedup();
        Pattern {
            pattern_type,
            severity,
            title: text.title,
            description: text.description,
            affected_count: indices.len(),
            examples: self.examples,
            recommendation: text.recommendation.to_string(),
            impact: text.impact,
            all_affected_indices: indices,
        }
    }
}

/// Human-readable parts of a finding
struct Text {
    title: String,
    description: String,
    recommendation: &'static str,
    impact: Option<String>,
}

impl Text {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: &'static str,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            recommendation,
            impact: None,
        }
    }

    fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }
}

fn format_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else {
        format!("{ms:.0}ms")
    }
}

fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}B")
    }
}

/// Indices ordered by start time; ties keep input order
fn by_start(exchanges: &[CapturedExchange]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..exchanges.len()).collect();
    order.sort_by(|&a, &b| exchanges[a].started_ms.total_cmp(&exchanges[b].started_ms));
    order
}

/// Resource kind from the type hint, else the response media type
fn declared_kind(exchange: &CapturedExchange) -> ResourceKind {
    exchange
        .resource_type
        .as_deref()
        .map(ResourceKind::from_hint)
        .filter(|kind| *kind != ResourceKind::Other)
        .unwrap_or_else(|| ResourceKind::from_mime(&exchange.response_body.mime_type))
}

// ============================================================================
// Detectors
// ============================================================================

/// Idle time between one request ending and the next starting
pub fn detect_waterfall_gaps(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let order = by_start(exchanges);
    let mut hits = Hits::new(exchanges, limits);
    let mut total_gap = 0.0;

    for pair in order.windows(2) {
        let (prev, next) = (&exchanges[pair[0]], &exchanges[pair[1]]);
        let gap = next.started_ms - prev.end_ms();
        if gap > limits.waterfall_gap_ms {
            total_gap += gap;
            hits.push(pair[1], format!("{} idle before this request", format_ms(gap)));
        }
    }

    if hits.is_empty() {
        return None;
    }
    let text = Text::new(
        "Waterfall gaps",
        format!(
            "{} requests started after the network sat idle for more than {}",
            hits.len(),
            format_ms(limits.waterfall_gap_ms)
        ),
        "Start independent requests earlier or in parallel, and preload resources discovered late",
    )
    .with_impact(format!("{} total idle time", format_ms(total_gap)));
    Some(hits.into_pattern(PatternType::WaterfallGap, Severity::Medium, text))
}

/// Slow DNS, TLS or server wait phases
pub fn detect_timing_anomalies(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    let (mut dns_records, mut ssl_records, mut wait_records) = (0usize, 0usize, 0usize);

    for (index, exchange) in exchanges.iter().enumerate() {
        let timings = &exchange.timings;
        let mut details = Vec::new();
        if let Some(dns) = timings.dns.filter(|&v| v > limits.slow_dns_ms) {
            dns_records += 1;
            details.push(format!("DNS {}", format_ms(dns)));
        }
        if let Some(ssl) = timings.ssl.filter(|&v| v > limits.slow_ssl_ms) {
            ssl_records += 1;
            details.push(format!("TLS {}", format_ms(ssl)));
        }
        if let Some(wait) = timings.wait.filter(|&v| v > limits.slow_wait_ms) {
            wait_records += 1;
            details.push(format!("wait {}", format_ms(wait)));
        }
        if !details.is_empty() {
            hits.push(index, details.join(", "));
        }
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if dns_records > limits.dns_anomaly_escalation
        || wait_records > limits.wait_anomaly_escalation
    {
        Severity::High
    } else {
        Severity::Medium
    };
    let text = Text::new(
        "Slow connection phases",
        format!(
            "{dns_records} slow DNS lookups, {ssl_records} slow TLS handshakes and {wait_records} slow server responses"
        ),
        "Use dns-prefetch/preconnect for third-party origins and investigate slow backend responses",
    );
    Some(hits.into_pattern(PatternType::TimingAnomaly, severity, text))
}

/// Unencrypted requests made from an encrypted page
pub fn detect_mixed_content(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let page = exchanges.first()?;
    if !page.is_secure() {
        return None;
    }

    let mut hits = Hits::new(exchanges, limits);
    let mut blocking = false;
    for (index, exchange) in exchanges.iter().enumerate().skip(1) {
        let Some(scheme) = exchange
            .scheme()
            .filter(|s| matches!(s.as_str(), "http" | "ws"))
        else {
            continue;
        };
        let kind = declared_kind(exchange);
        blocking |= matches!(kind, ResourceKind::Script | ResourceKind::Stylesheet);
        hits.push(index, format!("{kind:?} loaded over {scheme}").to_lowercase());
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if blocking { Severity::High } else { Severity::Medium };
    let text = Text::new(
        "Mixed content",
        format!("{} resources were loaded unencrypted from an encrypted page", hits.len()),
        "Serve every resource over https; browsers block active mixed content",
    );
    Some(hits.into_pattern(PatternType::MixedContent, severity, text))
}

/// Requests carrying oversized cookies
pub fn detect_large_cookies(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    let mut total_bytes = 0;

    for (index, exchange) in exchanges.iter().enumerate() {
        let bytes = exchange.cookie_bytes();
        if bytes > limits.large_cookie_bytes {
            total_bytes += bytes;
            hits.push(index, format!("{} of cookies", format_bytes(bytes)));
        }
    }

    if hits.is_empty() {
        return None;
    }
    let text = Text::new(
        "Large cookies",
        format!(
            "{} requests sent more than {} of cookies",
            hits.len(),
            format_bytes(limits.large_cookie_bytes)
        ),
        "Trim cookie payloads, scope cookies to the paths that need them, and serve static assets from a cookieless domain",
    )
    .with_impact(format!("{} of cookie upload", format_bytes(total_bytes)));
    Some(hits.into_pattern(PatternType::LargeCookies, Severity::Medium, text))
}

/// `/graphql` counts only as a whole path segment
fn is_api_path(path: &str) -> bool {
    path.contains("/api/")
        || path.contains("/graphql/")
        || path.ends_with("/graphql")
        || path.contains("/rest/")
        || VERSION_SEGMENT_REGEX.is_match(path)
        || path.ends_with(".json")
}

fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

/// Bursts of sibling API calls that could be combined
pub fn detect_api_batching(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut groups: OrderedMap<Vec<usize>> = OrderedMap::new();
    for index in by_start(exchanges) {
        let exchange = &exchanges[index];
        let Some(domain) = exchange.domain() else {
            continue;
        };
        let path = exchange.path();
        if !is_api_path(&path) {
            continue;
        }
        let key = format!("{domain}{}", parent_path(&path));
        groups.get_or_insert_with(&key, Vec::new).push(index);
    }

    let min_calls = limits.batch_min_calls.max(2);
    let mut hits = Hits::new(exchanges, limits);
    let mut batches = 0usize;
    for (key, members) in groups.iter() {
        // Members are in start order, so the span is last start minus first start
        let (Some(&first), Some(&last)) = (members.first(), members.last()) else {
            continue;
        };
        let span = exchanges[last].started_ms - exchanges[first].started_ms;
        if members.len() < min_calls || span > limits.batch_window_ms {
            continue;
        }
        batches += 1;
        let detail = format!("{} calls under {key} within {}", members.len(), format_ms(span));
        for &index in members {
            hits.push(index, detail.clone());
        }
    }

    if hits.is_empty() {
        return None;
    }
    let savings = hits.len().saturating_sub(batches);
    let severity = if savings >= limits.batch_medium_savings {
        Severity::Medium
    } else {
        Severity::Low
    };
    let text = Text::new(
        "Batchable API calls",
        format!(
            "{} API calls in {batches} groups hit sibling endpoints within {}",
            hits.len(),
            format_ms(limits.batch_window_ms)
        ),
        "Combine related calls into a batch endpoint or a single GraphQL query",
    )
    .with_impact(format!("{savings} requests could be saved"));
    Some(hits.into_pattern(PatternType::ApiBatching, severity, text))
}

/// Render-critical resources fetched late, or large images fetched early
pub fn detect_priority_mismatch(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    let mut critical = 0usize;

    for (index, exchange) in exchanges.iter().enumerate() {
        let Some(priority) = exchange.priority_level() else {
            continue;
        };
        let kind = exchange.resource_kind();
        if kind.is_render_critical() && priority.is_low() {
            critical += 1;
            hits.push(index, format!("{kind:?} at {priority:?} priority"));
        } else if kind == ResourceKind::Image
            && exchange.response_body.size > limits.large_image_bytes
            && priority.is_high()
        {
            hits.push(
                index,
                format!(
                    "{} image at {priority:?} priority",
                    format_bytes(usize::try_from(exchange.response_body.size).unwrap_or(usize::MAX))
                ),
            );
        }
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if critical > 0 { Severity::High } else { Severity::Medium };
    let text = Text::new(
        "Resource priority mismatch",
        format!(
            "{critical} render-blocking resources were fetched at low priority and {} large images at high priority",
            hits.len() - critical
        ),
        "Preload critical CSS, scripts and fonts; lazy-load or lower the priority of large images",
    );
    Some(hits.into_pattern(PatternType::PriorityMismatch, severity, text))
}

/// The same request issued more than once
pub fn detect_duplicate_requests(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut seen: OrderedMap<Vec<usize>> = OrderedMap::new();
    for (index, exchange) in exchanges.iter().enumerate() {
        let key = format!("{} {}", exchange.method.to_ascii_uppercase(), exchange.url);
        seen.get_or_insert_with(&key, Vec::new).push(index);
    }

    let mut hits = Hits::new(exchanges, limits);
    let mut worst = 0usize;
    let mut repeated = 0usize;
    for (_, indices) in seen.iter() {
        if indices.len() < limits.duplicate_min_count {
            continue;
        }
        repeated += 1;
        worst = worst.max(indices.len());
        hits.push(indices[0], format!("requested {} times", indices.len()));
        for &index in &indices[1..] {
            hits.push_index(index);
        }
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if worst >= limits.duplicate_high_count {
        Severity::High
    } else {
        Severity::Medium
    };
    let text = Text::new(
        "Duplicate requests",
        format!("{repeated} requests were issued more than once"),
        "Deduplicate in-flight requests and cache responses on the client",
    )
    .with_impact(format!("{} redundant requests", hits.len() - repeated));
    Some(hits.into_pattern(PatternType::DuplicateRequests, severity, text))
}

/// Client and server error responses
pub fn detect_failed_requests(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    let mut server_errors = 0usize;

    for (index, exchange) in exchanges.iter().enumerate() {
        if exchange.status >= 400 {
            if exchange.status >= 500 {
                server_errors += 1;
            }
            let detail = format!("{} {}", exchange.status, exchange.status_text);
            hits.push(index, detail.trim_end());
        }
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if server_errors > 0 { Severity::High } else { Severity::Medium };
    let text = Text::new(
        "Failed requests",
        format!(
            "{} requests failed ({server_errors} server errors)",
            hits.len()
        ),
        "Fix or remove failing requests; server errors usually point at backend faults",
    );
    Some(hits.into_pattern(PatternType::FailedRequests, severity, text))
}

/// Redirect responses
pub fn detect_redirects(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    for (index, exchange) in exchanges.iter().enumerate() {
        if (300..=399).contains(&exchange.status) {
            let detail = match exchange.response_header("location") {
                Some(location) => format!("{} to {location}", exchange.status),
                None => exchange.status.to_string(),
            };
            hits.push(index, detail);
        }
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if hits.len() > limits.redirect_medium_count {
        Severity::Medium
    } else {
        Severity::Low
    };
    let text = Text::new(
        "Redirects",
        format!("{} requests were redirected", hits.len()),
        "Link directly to final URLs to save a round trip per redirect",
    );
    Some(hits.into_pattern(PatternType::Redirects, severity, text))
}

/// Cross-origin requests answered without CORS headers
pub fn detect_missing_cors(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    for (index, exchange) in exchanges.iter().enumerate() {
        let Some(origin) = exchange.request_header("origin") else {
            continue;
        };
        let own = exchange.parsed_url().and_then(|u| origin_of(&u));
        if own.as_deref() == Some(origin) {
            continue;
        }
        if exchange.response_header("access-control-allow-origin").is_none() {
            hits.push(index, format!("origin {origin} not allowed"));
        }
    }

    if hits.is_empty() {
        return None;
    }
    let text = Text::new(
        "Missing CORS headers",
        format!(
            "{} cross-origin responses lack Access-Control-Allow-Origin",
            hits.len()
        ),
        "Return Access-Control-Allow-Origin for origins that should be allowed",
    );
    Some(hits.into_pattern(PatternType::MissingCors, Severity::Medium, text))
}

fn is_static_asset(exchange: &CapturedExchange) -> bool {
    exchange.resource_kind().is_static()
        || matches!(
            file_category(&exchange.path()),
            Some(FileCategory::Asset | FileCategory::Image)
        )
}

/// Successful static assets served without caching headers
pub fn detect_uncached_static(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    let mut hits = Hits::new(exchanges, limits);
    for (index, exchange) in exchanges.iter().enumerate() {
        if !(200..=299).contains(&exchange.status) || !is_static_asset(exchange) {
            continue;
        }
        let cached = ["cache-control", "expires", "etag"]
            .iter()
            .any(|name| exchange.response_header(name).is_some());
        if !cached {
            hits.push(index, "no cache-control, expires or etag");
        }
    }

    if hits.is_empty() {
        return None;
    }
    let severity = if hits.len() >= limits.uncached_medium_count {
        Severity::Medium
    } else {
        Severity::Low
    };
    let text = Text::new(
        "Uncached static assets",
        format!("{} static assets were served without caching headers", hits.len()),
        "Send Cache-Control with a long max-age for fingerprinted assets",
    );
    Some(hits.into_pattern(PatternType::UncachedStatic, severity, text))
}

/// Requests that each wait for every earlier one to finish
pub fn detect_sequential_loading(
    exchanges: &[CapturedExchange],
    limits: &DetectorThresholds,
) -> Option<Pattern> {
    if exchanges.is_empty() || exchanges.len() < limits.sequential_min_requests {
        return None;
    }

    let order = by_start(exchanges);
    let mut hits = Hits::new(exchanges, limits);
    let mut latest_end = exchanges[order[0]].end_ms();
    for &index in &order[1..] {
        let exchange = &exchanges[index];
        if exchange.started_ms >= latest_end {
            hits.push(index, "started after all earlier requests finished");
        }
        latest_end = latest_end.max(exchange.end_ms());
    }

    let ratio = hits.len() as f64 / exchanges.len() as f64;
    if ratio <= limits.sequential_ratio {
        return None;
    }
    let text = Text::new(
        "Sequential loading",
        format!(
            "{} of {} requests only started once every earlier request had finished",
            hits.len(),
            exchanges.len()
        ),
        "Parallelize independent requests and remove request chains",
    )
    .with_impact(format!("{:.0}% of requests ran sequentially", ratio * 100.0));
    Some(hits.into_pattern(PatternType::SequentialLoading, Severity::Medium, text))
}
