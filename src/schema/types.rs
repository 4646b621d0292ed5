//! Schema types

use crate::types::OrderedMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Separator between the members of a type-tag union
pub const UNION_DELIMITER: &str = "|";

/// Fixed ordering for well-known tags; anything else sorts after, alphabetically
const TAG_PRIORITY: [&str; 7] = [
    "null", "boolean", "integer", "number", "string", "array", "object",
];

fn tag_rank(tag: &str) -> usize {
    TAG_PRIORITY
        .iter()
        .position(|t| *t == tag)
        .unwrap_or(TAG_PRIORITY.len())
}

/// A scalar type tag, possibly a union of several tags.
///
/// Members are always unique and kept in priority order, so two unions with
/// the same members compare and print identically regardless of how they
/// were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTag(Vec<String>);

impl TypeTag {
    /// A single tag
    pub fn single(tag: impl Into<String>) -> Self {
        Self(vec![tag.into()])
    }

    /// Parse a `|`-joined union such as `integer|string`
    pub fn parse(text: &str) -> Self {
        Self::from_tags(
            text.split(UNION_DELIMITER)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        )
    }

    fn from_tags(tags: impl IntoIterator<Item = String>) -> Self {
        let set: BTreeSet<String> = tags.into_iter().collect();
        let mut tags: Vec<String> = set.into_iter().collect();
        tags.sort_by(|a, b| tag_rank(a).cmp(&tag_rank(b)).then_with(|| a.cmp(b)));
        Self(tags)
    }

    /// Set union of both tags, re-ordered by priority
    #[must_use]
    pub fn union(&self, other: &TypeTag) -> TypeTag {
        Self::from_tags(self.0.iter().chain(other.0.iter()).cloned())
    }

    /// Member tags in priority order
    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_union(&self) -> bool {
        self.0.len() > 1
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(UNION_DELIMITER))
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inferred structure of a JSON value.
///
/// "No schema" is expressed as `Option<SchemaNode>::None`, never as an
/// empty object.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Scalar value (or a union of scalar/kind tags)
    Scalar(TypeTag),
    /// Object with properties in first-discovered order
    Object(OrderedMap<SchemaNode>),
    /// Array with a unified item schema; `None` when only empty arrays were seen
    Array(Option<Box<SchemaNode>>),
    /// Nesting exceeded the depth limit; structure below is unknown
    Truncated,
}

impl SchemaNode {
    /// Scalar node with a single tag
    pub fn scalar(tag: impl Into<String>) -> Self {
        SchemaNode::Scalar(TypeTag::single(tag))
    }

    /// Array node with an item schema
    pub fn array_of(items: SchemaNode) -> Self {
        SchemaNode::Array(Some(Box::new(items)))
    }

    /// Tags describing the node itself: scalar tags, or `object` / `array`
    pub fn kind_tag(&self) -> TypeTag {
        match self {
            SchemaNode::Scalar(tag) => tag.clone(),
            SchemaNode::Object(_) | SchemaNode::Truncated => TypeTag::single("object"),
            SchemaNode::Array(_) => TypeTag::single("array"),
        }
    }

    /// Properties of an object node
    pub fn properties(&self) -> Option<&OrderedMap<SchemaNode>> {
        match self {
            SchemaNode::Object(props) => Some(props),
            _ => None,
        }
    }

    /// Property of an object node
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties().and_then(|p| p.get(name))
    }

    /// Item schema of an array node
    pub fn items(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Array(items) => items.as_deref(),
            _ => None,
        }
    }

    /// Scalar tag, if this is a scalar node
    pub fn type_tag(&self) -> Option<&TypeTag> {
        match self {
            SchemaNode::Scalar(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, SchemaNode::Truncated)
    }

    /// Nesting depth (scalars are 0)
    pub fn depth(&self) -> usize {
        match self {
            SchemaNode::Scalar(_) | SchemaNode::Truncated => 0,
            SchemaNode::Object(props) => 1 + props.values().map(SchemaNode::depth).max().unwrap_or(0),
            SchemaNode::Array(items) => 1 + items.as_deref().map_or(0, SchemaNode::depth),
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaNode::Scalar(tag) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", tag)?;
                map.end()
            }
            SchemaNode::Object(props) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "object")?;
                map.serialize_entry("properties", props)?;
                map.end()
            }
            SchemaNode::Array(items) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "array")?;
                if let Some(items) = items {
                    map.serialize_entry("items", items)?;
                }
                map.end()
            }
            SchemaNode::Truncated => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "object")?;
                map.serialize_entry("truncated", &true)?;
                map.end()
            }
        }
    }
}
