//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HAR traffic analyzer
#[derive(Parser, Debug)]
#[command(name = "har-insights")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Analyzer configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full report: summary, endpoints and findings
    Analyze {
        /// HAR file to analyze
        har: PathBuf,
    },

    /// List inferred endpoints
    Endpoints {
        /// HAR file to analyze
        har: PathBuf,
    },

    /// List findings
    Patterns {
        /// HAR file to analyze
        har: PathBuf,

        /// Severities to keep (comma-separated: high,medium,low)
        #[arg(long)]
        severity: Option<String>,

        /// Pattern types to keep (comma-separated, empty = all)
        #[arg(long = "type")]
        pattern_type: Option<String>,
    },

    /// Generate an OpenAPI document
    Openapi {
        /// HAR file to analyze
        har: PathBuf,

        /// Document title
        #[arg(long, default_value = "Inferred API")]
        title: String,

        /// API version
        #[arg(long = "api-version", default_value = "1.0.0")]
        api_version: String,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Batch statistics
    Summary {
        /// HAR file to analyze
        har: PathBuf,
    },

    /// Validate the analyzer configuration
    Validate,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
