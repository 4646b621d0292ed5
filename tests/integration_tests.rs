//! Integration tests for har-insights
//!
//! Drives the public API end to end against a recorded shop capture,
//! and the HTTP router through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use har_insights::cli::router;
use har_insights::patterns::PatternType;
use har_insights::{
    generate_openapi, load_config_from_str, Error, load_har, parse_har, Analyzer, AnalyzerConfig,
    OpenApiOptions, PatternFilter, SchemaNode, Severity,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use tower::ServiceExt;

const SHOP_HAR: &str = include_str!("fixtures/shop.har");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.har")
}

// ============================================================================
// Library pipeline
// ============================================================================

#[test]
fn test_parse_fixture() {
    let exchanges = parse_har(SHOP_HAR).unwrap();
    assert_eq!(exchanges.len(), 5);

    let first = &exchanges[0];
    assert_eq!(first.method, "GET");
    assert_eq!(first.status, 200);
    assert_eq!(first.resource_type.as_deref(), Some("document"));

    // Relative ordering survives timestamp parsing
    assert!((exchanges[1].started_ms - first.started_ms - 500.0).abs() < 1e-6);

    // -1 timings mean "not applicable"
    assert_eq!(exchanges[1].timings.dns, None);
    assert_eq!(exchanges[0].timings.dns, Some(12.0));

    assert_eq!(exchanges[3].method, "POST");
    assert!(exchanges[3].request_body.is_some());
}

#[test]
fn test_load_har_from_disk_matches_parse() {
    let from_disk = load_har(fixture_path()).unwrap();
    let from_str = parse_har(SHOP_HAR).unwrap();
    assert_eq!(from_disk, from_str);
}

#[test]
fn test_load_har_from_tempfile() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHOP_HAR.as_bytes()).unwrap();

    let exchanges = load_har(file.path()).unwrap();
    assert_eq!(exchanges.len(), 5);
}

#[test]
fn test_load_har_missing_file() {
    let err = load_har("/definitely/not/here.har").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(err.to_string().contains("here.har"));
}

#[test]
fn test_parse_har_rejects_garbage() {
    assert!(parse_har("not json").is_err());
    assert!(parse_har(r#"{"log": {}}"#).is_err());
}

#[test]
fn test_full_analysis_report() {
    let exchanges = parse_har(SHOP_HAR).unwrap();
    let report = Analyzer::new(AnalyzerConfig::default()).analyze(&exchanges);

    // Summary
    assert_eq!(report.summary.total_requests, 5);
    assert_eq!(report.summary.status_count("2xx"), 4);
    assert_eq!(report.summary.status_count("5xx"), 1);
    assert_eq!(
        report.summary.domains,
        vec!["shop.test", "api.shop.test", "cdn.shop.test"]
    );

    // Endpoints: both product lookups collapse into one template
    assert_eq!(report.endpoints.len(), 4);
    let total: usize = report.endpoints.iter().map(|e| e.total_calls).sum();
    assert_eq!(total, exchanges.len());

    let products = report
        .endpoints
        .iter()
        .find(|e| e.pattern == "https://api.shop.test/api/products/{id}")
        .unwrap();
    assert_eq!(products.method, "GET");
    assert_eq!(products.total_calls, 2);
    assert_eq!(products.exchange_indices, vec![1, 2]);
    assert!((products.avg_response_time - 70.0).abs() < 1e-9);

    let currencies = products.parameters.get("currency").unwrap();
    assert!(currencies.contains("EUR"));
    assert!(currencies.contains("USD"));

    let schema = products.response_schema.as_ref().unwrap();
    let tag = |name: &str| schema.property(name).and_then(|p| p.type_tag()).map(ToString::to_string);
    assert_eq!(tag("price").as_deref(), Some("null|number"));
    assert_eq!(tag("id").as_deref(), Some("integer"));
    assert_eq!(tag("updated").as_deref(), Some("date-time"));
    assert!(matches!(schema.property("tags"), Some(SchemaNode::Array(_))));

    let cart = report
        .endpoints
        .iter()
        .find(|e| e.pattern == "https://api.shop.test/api/cart")
        .unwrap();
    assert_eq!(cart.method, "POST");
    assert!(cart.request_schema.is_some());
    assert!(cart.status_codes.contains(&503));

    // Findings, most severe first
    let types: Vec<PatternType> = report.patterns.iter().map(|p| p.pattern_type).collect();
    assert_eq!(
        types,
        vec![
            PatternType::FailedRequests,
            PatternType::MixedContent,
            PatternType::SequentialLoading,
            PatternType::ApiBatching,
            PatternType::UncachedStatic,
        ]
    );
    assert_eq!(report.patterns[0].severity, Severity::High);
    assert_eq!(report.patterns[0].all_affected_indices, vec![3]);
    assert_eq!(report.patterns[1].all_affected_indices, vec![4]);
    assert_eq!(report.patterns[3].all_affected_indices, vec![1, 2]);
}

#[test]
fn test_filtered_patterns() {
    let exchanges = parse_har(SHOP_HAR).unwrap();
    let analyzer = Analyzer::default();

    let medium = PatternFilter::parse(Some("medium"), None).unwrap();
    let found = analyzer.filtered_patterns(&exchanges, &medium);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.severity == Severity::Medium));

    let typed = PatternFilter::parse(None, Some("mixed-content,redirects")).unwrap();
    let found = analyzer.filtered_patterns(&exchanges, &typed);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].pattern_type, PatternType::MixedContent);
}

#[test]
fn test_config_from_yaml_changes_findings() {
    let config = load_config_from_str(
        r"
detectors:
  sequential_ratio: 0.9
  batch_window_ms: 50
",
    )
    .unwrap();
    let exchanges = parse_har(SHOP_HAR).unwrap();
    let patterns = Analyzer::new(config).patterns(&exchanges);

    // 80% sequential no longer exceeds the ratio; 100ms apart exceeds the window
    assert!(patterns
        .iter()
        .all(|p| p.pattern_type != PatternType::SequentialLoading
            && p.pattern_type != PatternType::ApiBatching));
}

#[test]
fn test_invalid_config_rejected() {
    let err = load_config_from_str("detectors:\n  max_examples: 0\n").unwrap_err();
    assert!(err.to_string().contains("max_examples"));
}

#[test]
fn test_openapi_document() {
    let exchanges = parse_har(SHOP_HAR).unwrap();
    let endpoints = Analyzer::default().endpoints(&exchanges);
    let doc = generate_openapi(&endpoints, &OpenApiOptions::default().with_title("Shop"));

    assert_eq!(doc["openapi"], "3.0.3");
    assert_eq!(doc["info"]["title"], "Shop");

    let get = &doc["paths"]["/api/products/{id}"]["get"];
    assert_eq!(get["operationId"], "getApiProductsId");

    let params = get["parameters"].as_array().unwrap();
    let id = params.iter().find(|p| p["name"] == "id").unwrap();
    assert_eq!(id["in"], "path");
    assert_eq!(id["required"], true);
    assert_eq!(id["schema"]["type"], "integer");
    assert!(params
        .iter()
        .any(|p| p["name"] == "currency" && p["in"] == "query"));

    let schema_ref = &get["responses"]["200"]["content"]["application/json"]["schema"]["$ref"];
    assert_eq!(schema_ref, "#/components/schemas/GetApiProductsIdResponse");

    let component = &doc["components"]["schemas"]["GetApiProductsIdResponse"];
    assert_eq!(component["properties"]["price"]["type"], "number");
    assert_eq!(component["properties"]["price"]["nullable"], true);

    let post = &doc["paths"]["/api/cart"]["post"];
    assert!(post["requestBody"].is_object());
    assert_eq!(post["responses"]["503"]["description"], "Service Unavailable");
}

// ============================================================================
// HTTP router
// ============================================================================

async fn call(uri: &str, method: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let app = router(AnalyzerConfig::default());
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call("/health", "GET", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_analyze_route() {
    let (status, body) = call("/analyze", "POST", SHOP_HAR).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["summary"]["totalRequests"], 5);
    assert_eq!(body["data"]["endpoints"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"]["patterns"][0]["type"], "failed_requests");
}

#[tokio::test]
async fn test_patterns_route_filters_by_severity() {
    let (status, body) = call("/patterns?severity=high", "POST", SHOP_HAR).await;
    assert_eq!(status, StatusCode::OK);

    let patterns = body["data"].as_array().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0]["severity"], "high");
}

#[tokio::test]
async fn test_patterns_route_rejects_unknown_severity() {
    let (status, body) = call("/patterns?severity=urgent", "POST", SHOP_HAR).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("urgent"));
}

#[tokio::test]
async fn test_malformed_har_is_bad_request() {
    let (status, body) = call("/analyze", "POST", "{ not a har").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_openapi_route_uses_query_title() {
    let (status, body) = call("/openapi?title=Shop&version=2.1.0", "POST", SHOP_HAR).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["info"]["title"], "Shop");
    assert_eq!(body["data"]["info"]["version"], "2.1.0");
}

#[tokio::test]
async fn test_summary_and_endpoints_routes() {
    let (status, body) = call("/summary", "POST", SHOP_HAR).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["statusClasses"]["2xx"], 4);

    let (status, body) = call("/endpoints", "POST", SHOP_HAR).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"][0]["method"].as_str().is_some());
}
