//! Tests for OpenAPI generation

use super::generator::PathTemplate;
use super::*;
use crate::endpoint::aggregate_endpoints;
use crate::exchange::CapturedExchange;
use crate::schema::{build_schema, SchemaNode, TypeTag};
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Schema Conversion
// ============================================================================

#[test]
fn test_scalar_conversion() {
    assert_eq!(
        schema_to_openapi(&SchemaNode::scalar("integer")),
        json!({"type": "integer"})
    );
    assert_eq!(
        schema_to_openapi(&SchemaNode::scalar("date-time")),
        json!({"type": "string", "format": "date-time"})
    );
    assert_eq!(
        schema_to_openapi(&SchemaNode::scalar("url")),
        json!({"type": "string", "format": "uri"})
    );
}

#[test]
fn test_union_becomes_any_of() {
    let node = SchemaNode::Scalar(TypeTag::parse("string|integer"));
    assert_eq!(
        schema_to_openapi(&node),
        json!({"anyOf": [{"type": "integer"}, {"type": "string"}]})
    );
}

#[test]
fn test_null_becomes_nullable() {
    let node = SchemaNode::Scalar(TypeTag::parse("null|string"));
    assert_eq!(
        schema_to_openapi(&node),
        json!({"type": "string", "nullable": true})
    );

    let node = SchemaNode::Scalar(TypeTag::parse("null|integer|email"));
    assert_eq!(
        schema_to_openapi(&node),
        json!({
            "anyOf": [{"type": "integer"}, {"type": "string", "format": "email"}],
            "nullable": true
        })
    );

    assert_eq!(
        schema_to_openapi(&SchemaNode::scalar("null")),
        json!({"nullable": true})
    );
}

#[test]
fn test_structure_conversion() {
    let node = build_schema(&json!({"id": 1, "tags": ["a"], "empty": []}));
    let converted = schema_to_openapi(&node);

    assert_eq!(converted["type"], "object");
    assert_eq!(converted["properties"]["id"], json!({"type": "integer"}));
    assert_eq!(
        converted["properties"]["tags"],
        json!({"type": "array", "items": {"type": "string"}})
    );
    assert_eq!(
        converted["properties"]["empty"],
        json!({"type": "array", "items": {}})
    );

    let keys: Vec<_> = converted["properties"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["id", "tags", "empty"]);
}

#[test]
fn test_truncated_conversion() {
    let converted = schema_to_openapi(&SchemaNode::Truncated);
    assert_eq!(converted["type"], "object");
}

// ============================================================================
// Path Templates
// ============================================================================

#[test]
fn test_path_template_renames_duplicates() {
    let template = PathTemplate::parse("/a/{id}/b/{id}/c/{id}/{uuid}");
    assert_eq!(template.path, "/a/{id}/b/{id2}/c/{id3}/{uuid}");
    let names: Vec<_> = template.params.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["id", "id2", "id3", "uuid"]);
    assert_eq!(template.params[1].1, "{id}");
}

#[test]
fn test_path_template_without_params() {
    let template = PathTemplate::parse("/health");
    assert_eq!(template.path, "/health");
    assert!(template.params.is_empty());
}

// ============================================================================
// Document Generation
// ============================================================================

fn sample_endpoints() -> Vec<crate::endpoint::EndpointAggregate> {
    let exchanges = vec![
        CapturedExchange::new("GET", "https://api.test/users/1/orders/2?expand=items")
            .with_query_param("expand", "items")
            .with_response_body("application/json", r#"{"id": 2, "total": 9.5}"#),
        CapturedExchange::new("GET", "https://api.test/users/1/orders/3")
            .with_status(404)
            .with_response_body("application/json", r#"{"error": "missing"}"#),
        CapturedExchange::new("POST", "https://api.test/users")
            .with_request_body("application/json", r#"{"name": "x"}"#)
            .with_status(201),
        CapturedExchange::new("GET", "https://cdn.test/logo.png"),
        CapturedExchange::new("GET", "not a url"),
    ];
    aggregate_endpoints(&exchanges)
}

#[test]
fn test_generate_document_shape() {
    let options = OpenApiOptions::default()
        .with_title("Shop")
        .with_version("2.0.0");
    let doc = generate_openapi(&sample_endpoints(), &options);

    assert_eq!(doc["openapi"], OPENAPI_VERSION);
    assert_eq!(doc["info"]["title"], "Shop");
    assert_eq!(doc["info"]["version"], "2.0.0");
    assert!(doc["info"].get("description").is_none());
    assert_eq!(
        doc["servers"],
        json!([{"url": "https://api.test"}, {"url": "https://cdn.test"}])
    );

    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/users/{id}/orders/{id2}"));
    assert!(paths.contains_key("/users"));
    assert!(paths.contains_key("/{image}"));
    assert_eq!(paths.len(), 3);
}

#[test]
fn test_generate_operation_details() {
    let doc = generate_openapi(&sample_endpoints(), &OpenApiOptions::default());
    let get = &doc["paths"]["/users/{id}/orders/{id2}"]["get"];

    assert_eq!(get["operationId"], "getUsersIdOrdersId2");
    let params = get["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0]["name"], "id");
    assert_eq!(params[0]["in"], "path");
    assert_eq!(params[0]["schema"], json!({"type": "integer"}));
    assert_eq!(params[1]["name"], "id2");
    assert_eq!(params[2]["name"], "expand");
    assert_eq!(params[2]["in"], "query");
    assert_eq!(params[2]["example"], "items");

    assert_eq!(
        get["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/GetUsersIdOrdersId2Response"
    );
    assert_eq!(get["responses"]["404"]["description"], "Not Found");
    assert!(get["responses"]["404"].get("content").is_none());

    let schema = &doc["components"]["schemas"]["GetUsersIdOrdersId2Response"];
    assert_eq!(schema["properties"]["total"], json!({"type": "number"}));
    assert_eq!(
        schema["properties"]["error"],
        json!({"type": "string"})
    );
}

#[test]
fn test_generate_request_body() {
    let doc = generate_openapi(&sample_endpoints(), &OpenApiOptions::default());
    let post = &doc["paths"]["/users"]["post"];

    assert_eq!(
        post["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/PostUsersRequest"
    );
    assert_eq!(post["responses"]["201"]["description"], "Created");
    assert!(post.get("parameters").is_none());
}

#[test]
fn test_generate_empty() {
    let doc = generate_openapi(&[], &OpenApiOptions::default().with_description("none"));
    assert_eq!(doc["paths"], json!({}));
    assert_eq!(doc["servers"], json!([]));
    assert_eq!(doc["info"]["description"], "none");
}

#[test]
fn test_generate_operations_share_a_path() {
    let exchanges = vec![
        CapturedExchange::new("GET", "https://a.test/items/1"),
        CapturedExchange::new("DELETE", "https://a.test/items/2").with_status(204),
        CapturedExchange::new("GET", "https://b.test/items/3").with_status(500),
    ];
    let doc = generate_openapi(&aggregate_endpoints(&exchanges), &OpenApiOptions::default());

    let item = doc["paths"]["/items/{id}"].as_object().unwrap();
    assert_eq!(item.len(), 2);
    assert!(item["get"].is_object());
    assert!(item["delete"].is_object());
    assert_eq!(item["delete"]["operationId"], "deleteItemsId");

    // Same path and method on a second host keeps the first operation
    assert!(item["get"]["responses"].get("200").is_some());
    assert!(item["get"]["responses"].get("500").is_none());
}
