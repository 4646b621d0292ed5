//! Schema inference from JSON values

use super::classify::classify;
use super::merge::merge_nodes;
use super::types::SchemaNode;
use serde_json::Value;
use tracing::debug;

/// Default maximum nesting depth before a subtree is truncated
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Schema builder with a nesting depth guard
#[derive(Debug, Clone, Copy)]
pub struct SchemaBuilder {
    /// Maximum depth for nested objects and arrays
    max_depth: usize,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set maximum depth for nested objects and arrays
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Build the schema of one JSON value
    pub fn build(&self, value: &Value) -> SchemaNode {
        self.build_at(value, 0)
    }

    /// Parse a JSON body and build its schema; unparsable text has no schema
    pub fn build_from_text(&self, text: &str) -> Option<SchemaNode> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Some(self.build(&value)),
            Err(e) => {
                debug!("Skipping schema for non-JSON body: {}", e);
                None
            }
        }
    }

    fn build_at(&self, value: &Value, depth: usize) -> SchemaNode {
        match value {
            Value::Object(_) | Value::Array(_) if depth >= self.max_depth => {
                debug!("Schema depth limit ({}) reached, truncating", self.max_depth);
                SchemaNode::Truncated
            }
            Value::Object(map) => SchemaNode::Object(
                map.iter()
                    .map(|(key, val)| (key.clone(), self.build_at(val, depth + 1)))
                    .collect(),
            ),
            Value::Array(arr) => {
                // Heterogeneous elements fold into one item schema
                let items = arr
                    .iter()
                    .map(|item| self.build_at(item, depth + 1))
                    .reduce(|acc, next| merge_nodes(&acc, &next));
                SchemaNode::Array(items.map(Box::new))
            }
            scalar => SchemaNode::scalar(classify(scalar)),
        }
    }
}

/// Build a schema from a single JSON value (convenience function)
pub fn build_schema(value: &Value) -> SchemaNode {
    SchemaBuilder::new().build(value)
}
