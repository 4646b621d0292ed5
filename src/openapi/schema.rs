//! SchemaNode → OpenAPI schema object

use crate::schema::{SchemaNode, TypeTag, DATE, DATE_TIME, EMAIL, OBJECT_ID, URL, UUID};
use crate::types::JsonObject;
use serde_json::{json, Value};

/// Convert an inferred schema into an OpenAPI 3.0 schema object.
///
/// Unions become `anyOf`; a `null` member becomes `nullable: true`.
pub fn schema_to_openapi(node: &SchemaNode) -> Value {
    match node {
        SchemaNode::Scalar(tag) => tag_to_openapi(tag),
        SchemaNode::Object(props) => {
            let properties: JsonObject = props
                .iter()
                .map(|(name, child)| (name.to_string(), schema_to_openapi(child)))
                .collect();
            json!({ "type": "object", "properties": properties })
        }
        SchemaNode::Array(items) => {
            let items = items.as_deref().map_or_else(|| json!({}), schema_to_openapi);
            json!({ "type": "array", "items": items })
        }
        SchemaNode::Truncated => json!({
            "type": "object",
            "description": "Nested too deeply to infer",
        }),
    }
}

fn tag_to_openapi(tag: &TypeTag) -> Value {
    let nullable = tag.contains("null");
    let mut members: Vec<Value> = tag
        .tags()
        .iter()
        .filter(|t| t.as_str() != "null")
        .map(|t| single_tag(t))
        .collect();

    let mut schema = match members.len() {
        0 => JsonObject::new(),
        1 => match members.pop() {
            Some(Value::Object(map)) => map,
            _ => JsonObject::new(),
        },
        _ => {
            let mut map = JsonObject::new();
            map.insert("anyOf".to_string(), Value::Array(members));
            map
        }
    };
    if nullable {
        schema.insert("nullable".to_string(), Value::Bool(true));
    }
    Value::Object(schema)
}

fn single_tag(tag: &str) -> Value {
    match tag {
        "array" => json!({ "type": "array", "items": {} }),
        "boolean" | "integer" | "number" | "string" | "object" => json!({ "type": tag }),
        DATE_TIME | DATE | EMAIL | UUID | OBJECT_ID => json!({ "type": "string", "format": tag }),
        URL => json!({ "type": "string", "format": "uri" }),
        _ => json!({ "type": "string" }),
    }
}
