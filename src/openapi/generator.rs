//! OpenAPI document generation

use super::schema::schema_to_openapi;
use crate::endpoint::{EndpointAggregate, ID_PLACEHOLDER, UUID_PLACEHOLDER};
use crate::exchange::raw_path;
use crate::types::{JsonObject, OrderedMap};
use axum::http::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

/// OpenAPI version emitted by the generator
pub const OPENAPI_VERSION: &str = "3.0.3";

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiOptions {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl Default for OpenApiOptions {
    fn default() -> Self {
        Self {
            title: "Inferred API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
        }
    }
}

impl OpenApiOptions {
    /// Set the document title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the API version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Build an OpenAPI 3.0.3 document from endpoint aggregates.
///
/// Aggregates whose pattern is not an absolute URL are skipped. When two
/// aggregates map to the same path and method (same path on different
/// hosts), the first one wins.
pub fn generate_openapi(endpoints: &[EndpointAggregate], options: &OpenApiOptions) -> Value {
    let mut servers: Vec<String> = Vec::new();
    let mut paths: OrderedMap<JsonObject> = OrderedMap::new();
    let mut schemas = JsonObject::new();
    let mut names = NameRegistry::default();

    for endpoint in endpoints {
        let Some(path) = raw_path(&endpoint.pattern) else {
            debug!("Skipping endpoint without absolute URL: {}", endpoint.pattern);
            continue;
        };
        let origin = &endpoint.pattern[..endpoint.pattern.len() - path.len()];
        if !servers.iter().any(|s| s == origin) {
            servers.push(origin.to_string());
        }

        let template = PathTemplate::parse(endpoint.path_template());
        let method = endpoint.method.to_ascii_lowercase();
        let operations = paths.get_or_insert_with(&template.path, JsonObject::new);
        if operations.contains_key(&method) {
            debug!("Duplicate operation {} {}, keeping first", method, template.path);
            continue;
        }

        let base_name = names.claim(&component_base(&endpoint.method, &template.path));
        let operation = build_operation(endpoint, &template, &base_name, &mut schemas);
        operations.insert(method, Value::Object(operation));
    }

    let mut info = JsonObject::new();
    info.insert("title".to_string(), json!(options.title));
    info.insert("version".to_string(), json!(options.version));
    if let Some(description) = &options.description {
        info.insert("description".to_string(), json!(description));
    }

    let paths: JsonObject = paths
        .into_iter()
        .map(|(path, ops)| (path, Value::Object(ops)))
        .collect();

    json!({
        "openapi": OPENAPI_VERSION,
        "info": info,
        "servers": servers.iter().map(|url| json!({ "url": url })).collect::<Vec<_>>(),
        "paths": paths,
        "components": { "schemas": schemas },
    })
}

fn build_operation(
    endpoint: &EndpointAggregate,
    template: &PathTemplate,
    base_name: &str,
    schemas: &mut JsonObject,
) -> JsonObject {
    let mut operation = JsonObject::new();
    operation.insert(
        "operationId".to_string(),
        json!(lower_first(base_name)),
    );
    operation.insert(
        "summary".to_string(),
        json!(format!("{} {}", endpoint.method, template.path)),
    );

    let mut parameters: Vec<Value> = template
        .params
        .iter()
        .map(|(name, placeholder)| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": placeholder_schema(placeholder),
            })
        })
        .collect();
    for (name, values) in endpoint.parameters.iter() {
        let mut param = json!({
            "name": name,
            "in": "query",
            "required": false,
            "schema": { "type": "string" },
        });
        if let Some(example) = values.iter().next() {
            param["example"] = json!(example);
        }
        parameters.push(param);
    }
    if !parameters.is_empty() {
        operation.insert("parameters".to_string(), Value::Array(parameters));
    }

    if let Some(schema) = &endpoint.request_schema {
        let name = format!("{base_name}Request");
        schemas.insert(name.clone(), schema_to_openapi(schema));
        operation.insert(
            "requestBody".to_string(),
            json!({
                "required": true,
                "content": { "application/json": { "schema": schema_ref(&name) } },
            }),
        );
    }

    let response_name = endpoint.response_schema.as_ref().map(|schema| {
        let name = format!("{base_name}Response");
        schemas.insert(name.clone(), schema_to_openapi(schema));
        name
    });

    let mut responses = JsonObject::new();
    for &status in &endpoint.status_codes {
        let mut response = JsonObject::new();
        response.insert("description".to_string(), json!(status_description(status)));
        if let Some(name) = response_name.as_deref().filter(|_| (200..300).contains(&status)) {
            response.insert(
                "content".to_string(),
                json!({ "application/json": { "schema": schema_ref(name) } }),
            );
        }
        responses.insert(status.to_string(), Value::Object(response));
    }
    if responses.is_empty() {
        responses.insert("default".to_string(), json!({ "description": "Response" }));
    }
    operation.insert("responses".to_string(), Value::Object(responses));

    operation
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn status_description(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| format!("Status {status}"), str::to_string)
}

fn placeholder_schema(placeholder: &str) -> Value {
    match placeholder {
        ID_PLACEHOLDER => json!({ "type": "integer" }),
        UUID_PLACEHOLDER => json!({ "type": "string", "format": "uuid" }),
        _ => json!({ "type": "string" }),
    }
}

// ============================================================================
// Path Templates
// ============================================================================

/// A path template with unique parameter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathTemplate {
    /// Path with placeholders renamed, e.g. `/a/{id}/b/{id2}`
    pub path: String,
    /// (parameter name, original placeholder)
    pub params: Vec<(String, String)>,
}

impl PathTemplate {
    /// Rename repeated placeholders `{id}`, `{id}` → `{id}`, `{id2}`
    pub fn parse(template: &str) -> Self {
        let mut seen: OrderedMap<usize> = OrderedMap::new();
        let mut params = Vec::new();
        let segments: Vec<String> = template
            .split('/')
            .map(|segment| {
                let Some(name) = segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .filter(|s| !s.is_empty())
                else {
                    return segment.to_string();
                };
                let count = seen.get_or_insert_with(name, || 0);
                *count += 1;
                let unique = if *count == 1 {
                    name.to_string()
                } else {
                    format!("{name}{count}")
                };
                params.push((unique.clone(), segment.to_string()));
                format!("{{{unique}}}")
            })
            .collect();

        Self {
            path: segments.join("/"),
            params,
        }
    }
}

// ============================================================================
// Component Names
// ============================================================================

/// `GET /users/{id}` → `GetUsersId`
fn component_base(method: &str, path: &str) -> String {
    let words: String = path
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    let words = if words.is_empty() { "Root".to_string() } else { words };
    format!("{}{}", capitalize(&method.to_ascii_lowercase()), words)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Hands out unique component names, suffixing repeats with 2, 3, ...
#[derive(Debug, Default)]
struct NameRegistry {
    used: OrderedMap<usize>,
}

impl NameRegistry {
    fn claim(&mut self, base: &str) -> String {
        let count = self.used.get_or_insert_with(base, || 0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{base}{count}")
        }
    }
}
