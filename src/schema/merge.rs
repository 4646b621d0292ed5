//! Deep unification of schema trees

use super::types::SchemaNode;

/// Merge two optional schemas. An absent schema is the identity.
pub fn merge_schemas(a: Option<&SchemaNode>, b: Option<&SchemaNode>) -> Option<SchemaNode> {
    match (a, b) {
        (Some(a), Some(b)) => Some(merge_nodes(a, b)),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

/// Fold `next` into a running accumulator
pub fn merge_into(acc: &mut Option<SchemaNode>, next: SchemaNode) {
    *acc = match acc.take() {
        Some(current) => Some(merge_nodes(&current, &next)),
        None => Some(next),
    };
}

/// Merge two schemas.
///
/// - object + object: key union, shared keys merged recursively; `a`'s keys
///   come first, then keys only `b` has
/// - array + array: item schemas merged
/// - scalar + scalar: tag union in priority order
/// - mixed kinds: collapse to the union of both sides' kind tags
/// - anything + truncated: truncated
///
/// Recursion depth is bounded by the depth of the inputs, which the
/// builder caps.
pub fn merge_nodes(a: &SchemaNode, b: &SchemaNode) -> SchemaNode {
    match (a, b) {
        (SchemaNode::Truncated, _) | (_, SchemaNode::Truncated) => SchemaNode::Truncated,
        (SchemaNode::Object(a_props), SchemaNode::Object(b_props)) => {
            let mut merged = a_props.clone();
            for (key, b_prop) in b_props.iter() {
                if let Some(a_prop) = merged.get_mut(key) {
                    *a_prop = merge_nodes(a_prop, b_prop);
                } else {
                    merged.insert(key, b_prop.clone());
                }
            }
            SchemaNode::Object(merged)
        }
        (SchemaNode::Array(a_items), SchemaNode::Array(b_items)) => {
            SchemaNode::Array(merge_schemas(a_items.as_deref(), b_items.as_deref()).map(Box::new))
        }
        (SchemaNode::Scalar(a_tag), SchemaNode::Scalar(b_tag)) => {
            SchemaNode::Scalar(a_tag.union(b_tag))
        }
        _ => SchemaNode::Scalar(a.kind_tag().union(&b.kind_tag())),
    }
}
