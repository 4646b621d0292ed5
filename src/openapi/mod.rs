//! OpenAPI module
//!
//! Renders endpoint aggregates as an OpenAPI 3.0.3 document.

mod generator;
mod schema;

pub use generator::{generate_openapi, OpenApiOptions, OPENAPI_VERSION};
pub use schema::schema_to_openapi;

#[cfg(test)]
mod tests;
