//! Endpoint aggregate types

use super::normalize::template_path;
use crate::schema::SchemaNode;
use crate::types::ValueSetMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// All exchanges sharing a method and normalized URL template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAggregate {
    /// Upper-cased request method
    pub method: String,
    /// Normalized URL template
    pub pattern: String,
    /// Host of the first contributing exchange
    pub domain: String,
    /// Raw path of the first contributing exchange
    pub path: String,
    /// Indices of contributing exchanges in the input list
    pub exchange_indices: Vec<usize>,
    /// Query parameter name → observed values
    pub parameters: ValueSetMap,
    /// Lower-cased request header name → observed values
    pub request_headers: ValueSetMap,
    /// Lower-cased response header name → observed values
    pub response_headers: ValueSetMap,
    /// Observed status codes
    pub status_codes: BTreeSet<u16>,
    /// Merged request body schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<SchemaNode>,
    /// Merged response body schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<SchemaNode>,
    pub total_calls: usize,
    /// Mean total time in ms
    pub avg_response_time: f64,
}

impl EndpointAggregate {
    /// Create an empty aggregate
    pub fn new(
        method: impl Into<String>,
        pattern: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            pattern: pattern.into(),
            domain: domain.into(),
            path: path.into(),
            exchange_indices: Vec::new(),
            parameters: ValueSetMap::new(),
            request_headers: ValueSetMap::new(),
            response_headers: ValueSetMap::new(),
            status_codes: BTreeSet::new(),
            request_schema: None,
            response_schema: None,
            total_calls: 0,
            avg_response_time: 0.0,
        }
    }

    /// Grouping key: method + template
    pub fn key(&self) -> String {
        endpoint_key(&self.method, &self.pattern)
    }

    /// Path part of the template
    pub fn path_template(&self) -> &str {
        template_path(&self.pattern)
    }

    /// Whether any body schema was inferred
    pub fn has_schema(&self) -> bool {
        self.request_schema.is_some() || self.response_schema.is_some()
    }
}

/// Grouping key for a method and template
pub fn endpoint_key(method: &str, pattern: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), pattern)
}
