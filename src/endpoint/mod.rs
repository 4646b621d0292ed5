//! Endpoint module
//!
//! Normalizes concrete URLs into templates (`/users/{id}`) and groups
//! exchanges into per-endpoint aggregates with merged body schemas.

mod aggregate;
mod normalize;
mod types;

pub use aggregate::{aggregate_endpoints, aggregate_endpoints_with};
pub use normalize::{
    normalize_segment, normalize_url, template_path, ID_PLACEHOLDER, OBJECT_ID_PLACEHOLDER,
    TOKEN_PLACEHOLDER, UUID_PLACEHOLDER,
};
pub use types::{endpoint_key, EndpointAggregate};

#[cfg(test)]
mod tests;
