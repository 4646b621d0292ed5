//! Tests for endpoint normalization and aggregation

use super::*;
use crate::exchange::CapturedExchange;
use crate::schema::SchemaBuilder;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use test_case::test_case;

// ============================================================================
// Normalizer
// ============================================================================

#[test_case(
    "https://api.test/users/507f1f77bcf86cd799439011/orders/42",
    "https://api.test/users/{objectId}/orders/{id}";
    "object id and numeric id"
)]
#[test_case(
    "https://api.test/items/550e8400-e29b-41d4-a716-446655440000",
    "https://api.test/items/{uuid}";
    "uuid"
)]
#[test_case(
    "https://cdn.test/img/photo.PNG?w=200",
    "https://cdn.test/img/{image}";
    "image drops query"
)]
#[test_case("https://cdn.test/docs/report.pdf", "https://cdn.test/docs/{document}"; "document")]
#[test_case("https://cdn.test/v/clip.mp4", "https://cdn.test/v/{media}"; "media")]
#[test_case("https://cdn.test/static/app.js", "https://cdn.test/static/{asset}"; "asset")]
#[test_case(
    "https://api.test/reset/aGVsbG8td29ybGQtdGhpcy1pcy1hLWxvbmctdG9rZW4",
    "https://api.test/reset/{token}";
    "long token"
)]
#[test_case("https://api.test/users/me", "https://api.test/users/me"; "verbatim")]
#[test_case("https://api.test:8443/v1/", "https://api.test:8443/v1/"; "port and trailing slash")]
#[test_case("https://api.test", "https://api.test"; "no path")]
fn test_normalize_url(url: &str, expected: &str) {
    assert_eq!(normalize_url(url), expected);
}

#[test]
fn test_normalize_priority_uuid_before_token() {
    // 36 chars of [A-Za-z0-9-] would also satisfy the token rule
    assert_eq!(
        normalize_segment("550e8400-e29b-41d4-a716-446655440000"),
        UUID_PLACEHOLDER
    );
    // 24 hex digits are an object id, not a number
    assert_eq!(
        normalize_segment("123456789012345678901234"),
        OBJECT_ID_PLACEHOLDER
    );
}

#[test]
fn test_normalize_is_idempotent() {
    let once = normalize_url("https://api.test/users/507f1f77bcf86cd799439011/orders/42");
    assert_eq!(normalize_url(&once), once);

    let once = normalize_url("https://api.test/f/550e8400-e29b-41d4-a716-446655440000/a.png");
    assert_eq!(normalize_url(&once), once);
}

#[test]
fn test_normalize_unparsable_url_fails_closed() {
    assert_eq!(normalize_url("not a url"), "not a url");
    assert_eq!(normalize_url(""), "");
}

#[test]
fn test_template_path() {
    assert_eq!(template_path("https://api.test/users/{id}"), "/users/{id}");
    assert_eq!(template_path("https://api.test"), "/");
    assert_eq!(template_path("garbage"), "garbage");
}

// ============================================================================
// Aggregator
// ============================================================================

fn json_get(url: &str, body: &str) -> CapturedExchange {
    CapturedExchange::new("GET", url).with_response_body("application/json", body)
}

#[test]
fn test_aggregate_groups_by_template() {
    let exchanges = vec![
        json_get("https://api.test/users/1", r#"{"id": 1, "name": "a"}"#),
        json_get("https://api.test/users/2", r#"{"id": 2, "email": "b@c.de"}"#),
        CapturedExchange::new("DELETE", "https://api.test/users/3").with_status(204),
    ];

    let aggregates = aggregate_endpoints(&exchanges);
    assert_eq!(aggregates.len(), 2);

    let get = aggregates.iter().find(|a| a.method == "GET").unwrap();
    assert_eq!(get.pattern, "https://api.test/users/{id}");
    assert_eq!(get.path, "/users/1");
    assert_eq!(get.total_calls, 2);
    assert_eq!(get.exchange_indices, vec![0, 1]);

    let schema = get.response_schema.as_ref().unwrap();
    let keys: BTreeSet<_> = schema.properties().unwrap().keys().collect();
    assert_eq!(keys, ["email", "id", "name"].into_iter().collect());
}

#[test]
fn test_aggregate_total_calls_equals_input_len() {
    let exchanges = vec![
        CapturedExchange::new("GET", "https://a.test/x/1"),
        CapturedExchange::new("get", "https://a.test/x/2"),
        CapturedExchange::new("POST", "https://a.test/x"),
        CapturedExchange::new("GET", "not a url"),
        CapturedExchange::new("GET", "also not a url"),
        CapturedExchange::new("GET", "https://b.test/"),
    ];

    let aggregates = aggregate_endpoints(&exchanges);
    let total: usize = aggregates.iter().map(|a| a.total_calls).sum();
    assert_eq!(total, exchanges.len());

    let mut seen: Vec<usize> = aggregates
        .iter()
        .flat_map(|a| a.exchange_indices.iter().copied())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..exchanges.len()).collect::<Vec<_>>());
}

#[test]
fn test_aggregate_method_is_case_folded() {
    let exchanges = vec![
        CapturedExchange::new("get", "https://a.test/x/1"),
        CapturedExchange::new("GET", "https://a.test/x/2"),
    ];
    let aggregates = aggregate_endpoints(&exchanges);
    assert_eq!(aggregates.len(), 1);
    assert_eq!(aggregates[0].method, "GET");
}

#[test]
fn test_aggregate_unparsable_urls_group_by_literal() {
    let exchanges = vec![
        CapturedExchange::new("GET", "not a url"),
        CapturedExchange::new("GET", "not a url"),
        CapturedExchange::new("GET", "other"),
    ];
    let aggregates = aggregate_endpoints(&exchanges);
    assert_eq!(aggregates.len(), 2);
    assert!(aggregates.iter().all(|a| a.domain == "unknown"));
    assert!(aggregates.iter().any(|a| a.pattern == "not a url" && a.total_calls == 2));
}

#[test]
fn test_aggregate_sorted_by_domain_then_path() {
    let exchanges = vec![
        CapturedExchange::new("GET", "https://z.test/a"),
        CapturedExchange::new("GET", "https://a.test/z"),
        CapturedExchange::new("GET", "https://a.test/b"),
        CapturedExchange::new("POST", "https://a.test/b"),
    ];
    let aggregates = aggregate_endpoints(&exchanges);
    let order: Vec<_> = aggregates
        .iter()
        .map(|a| format!("{} {}{}", a.method, a.domain, a.path))
        .collect();
    assert_eq!(
        order,
        vec!["GET a.test/b", "POST a.test/b", "GET a.test/z", "GET z.test/a"]
    );
}

#[test]
fn test_aggregate_records_params_and_headers() {
    let exchanges = vec![
        CapturedExchange::new("GET", "https://a.test/search?q=x&page=1")
            .with_query_param("q", "x")
            .with_query_param("page", "1")
            .with_request_header("Accept", "application/json")
            .with_response_header("Content-Type", "application/json"),
        CapturedExchange::new("GET", "https://a.test/search?q=y&debug=")
            .with_query_param("q", "y")
            .with_query_param("debug", "")
            .with_request_header("ACCEPT", "text/html")
            .with_status(500),
    ];

    let aggregates = aggregate_endpoints(&exchanges);
    assert_eq!(aggregates.len(), 1);
    let agg = &aggregates[0];

    let names: Vec<_> = agg.parameters.keys().collect();
    assert_eq!(names, vec!["q", "page", "debug"]);
    assert_eq!(agg.parameters.get("q").unwrap().len(), 2);
    assert!(agg.parameters.get("debug").unwrap().is_empty());

    let accept = agg.request_headers.get("accept").unwrap();
    assert_eq!(accept.len(), 2);
    assert!(agg.response_headers.contains_key("content-type"));
    assert_eq!(agg.status_codes.iter().copied().collect::<Vec<_>>(), vec![200, 500]);
}

#[test]
fn test_aggregate_request_schema_and_skips_non_json() {
    let exchanges = vec![
        CapturedExchange::new("POST", "https://a.test/api/items")
            .with_request_body("application/json", r#"{"name": "x", "qty": 1}"#)
            .with_response_body("text/html", "<p>ok</p>"),
        CapturedExchange::new("POST", "https://a.test/api/items")
            .with_request_body("application/json", "{broken")
            .with_response_body("application/json", "not json"),
    ];

    let aggregates = aggregate_endpoints(&exchanges);
    let agg = &aggregates[0];
    assert_eq!(agg.total_calls, 2);
    assert!(agg.request_schema.is_some());
    assert!(agg.response_schema.is_none());
}

#[test]
fn test_aggregate_json_mime_required_for_response_schema() {
    let exchanges = vec![CapturedExchange::new("GET", "https://a.test/data")
        .with_response_body("text/plain", r#"{"looks": "like json"}"#)];
    let aggregates = aggregate_endpoints(&exchanges);
    assert!(aggregates[0].response_schema.is_none());
}

#[test]
fn test_aggregate_average_response_time() {
    let exchanges = vec![
        CapturedExchange::new("GET", "https://a.test/x/1").with_timing(0.0, 100.0),
        CapturedExchange::new("GET", "https://a.test/x/2").with_timing(0.0, 300.0),
    ];
    let aggregates = aggregate_endpoints(&exchanges);
    assert!((aggregates[0].avg_response_time - 200.0).abs() < f64::EPSILON);
}

#[test]
fn test_aggregate_respects_schema_depth() {
    let exchanges = vec![json_get("https://a.test/deep", r#"{"a": {"b": {"c": 1}}}"#)];
    let builder = SchemaBuilder::new().with_max_depth(1);
    let aggregates = aggregate_endpoints_with(&exchanges, &builder);
    let schema = aggregates[0].response_schema.as_ref().unwrap();
    assert!(schema.property("a").unwrap().is_truncated());
}

#[test]
fn test_aggregate_is_deterministic() {
    let exchanges = vec![
        json_get("https://b.test/u/1", r#"{"a": 1}"#),
        json_get("https://a.test/u/2", r#"{"b": "x"}"#),
    ];
    assert_eq!(aggregate_endpoints(&exchanges), aggregate_endpoints(&exchanges));
}

#[test]
fn test_empty_input() {
    assert!(aggregate_endpoints(&[]).is_empty());
}
