//! Schema inference module
//!
//! Infers structural schemas from JSON payloads and unifies them across
//! samples.
//!
//! # Features
//!
//! - **Type Classification**: Semantic tags for scalars (`date-time`, `uuid`, `email`, ...)
//! - **Schema Building**: Recursive structure with first-discovered key order
//! - **Schema Merging**: Deep unification with deterministic tag unions
//! - **Depth Guard**: Deep nesting degrades to a truncated node instead of overflowing

mod classify;
mod inference;
mod merge;
mod types;

pub use classify::{
    classify, classify_string, is_object_id, is_uuid, DATE, DATE_TIME, EMAIL, OBJECT_ID, URL, UUID,
};
pub use inference::{build_schema, SchemaBuilder, DEFAULT_MAX_DEPTH};
pub use merge::{merge_into, merge_nodes, merge_schemas};
pub use types::{SchemaNode, TypeTag, UNION_DELIMITER};
