//! CLI module
//!
//! Command-line interface for analyzing HAR captures.
//!
//! # Commands
//!
//! - `analyze` - Summary, endpoints and findings in one report
//! - `endpoints` - Inferred endpoints with schemas
//! - `patterns` - Ranked findings, filterable by severity and type
//! - `openapi` - OpenAPI document for the inferred endpoints
//! - `summary` - Batch statistics
//! - `validate` - Check an analyzer configuration file
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, MAX_BODY_BYTES};
