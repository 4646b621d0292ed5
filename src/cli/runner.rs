//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, AnalyzerConfig};
use crate::engine::Analyzer;
use crate::error::{Result, ResultExt};
use crate::exchange::CapturedExchange;
use crate::har::load_har;
use crate::openapi::{generate_openapi, OpenApiOptions};
use crate::patterns::PatternFilter;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Analyze { har } => self.analyze(har),
            Commands::Endpoints { har } => self.endpoints(har),
            Commands::Patterns {
                har,
                severity,
                pattern_type,
            } => self.patterns(har, severity.as_deref(), pattern_type.as_deref()),
            Commands::Openapi {
                har,
                title,
                api_version,
                output,
            } => {
                let options = OpenApiOptions::default()
                    .with_title(title)
                    .with_version(api_version);
                self.openapi(har, &options, output.as_deref())
            }
            Commands::Summary { har } => self.summary(har),
            Commands::Validate => self.validate(),
            Commands::Serve { port } => {
                let config = self.load_config()?;
                crate::cli::serve(config, *port).await
            }
        }
    }

    /// Load analyzer configuration, or defaults when no file was given
    fn load_config(&self) -> Result<AnalyzerConfig> {
        match &self.cli.config {
            Some(path) => {
                let config = load_config(path)?;
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => Ok(AnalyzerConfig::default()),
        }
    }

    fn analyzer(&self) -> Result<Analyzer> {
        Ok(Analyzer::new(self.load_config()?))
    }

    fn load_exchanges(&self, har: &Path) -> Result<Vec<CapturedExchange>> {
        let exchanges = load_har(har)?;
        if self.cli.verbose {
            info!("Loaded {} exchanges from {}", exchanges.len(), har.display());
        }
        Ok(exchanges)
    }

    /// Full report
    fn analyze(&self, har: &Path) -> Result<()> {
        let analyzer = self.analyzer()?;
        let exchanges = self.load_exchanges(har)?;
        self.output(&analyzer.analyze(&exchanges))
    }

    /// Endpoint aggregates
    fn endpoints(&self, har: &Path) -> Result<()> {
        let analyzer = self.analyzer()?;
        let exchanges = self.load_exchanges(har)?;
        self.output(&analyzer.endpoints(&exchanges))
    }

    /// Ranked, filtered findings
    fn patterns(&self, har: &Path, severity: Option<&str>, types: Option<&str>) -> Result<()> {
        let filter = PatternFilter::parse(severity, types)?;
        let analyzer = self.analyzer()?;
        let exchanges = self.load_exchanges(har)?;
        self.output(&analyzer.filtered_patterns(&exchanges, &filter))
    }

    /// OpenAPI document, to stdout or a file
    fn openapi(&self, har: &Path, options: &OpenApiOptions, output: Option<&Path>) -> Result<()> {
        let analyzer = self.analyzer()?;
        let exchanges = self.load_exchanges(har)?;
        let document = generate_openapi(&analyzer.endpoints(&exchanges), options);

        match output {
            Some(path) => {
                let text = serde_json::to_string_pretty(&document)?;
                fs::write(path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote OpenAPI document to {}", path.display());
                Ok(())
            }
            None => self.output(&document),
        }
    }

    /// Batch statistics
    fn summary(&self, har: &Path) -> Result<()> {
        let analyzer = self.analyzer()?;
        let exchanges = self.load_exchanges(har)?;
        self.output(&analyzer.summary(&exchanges))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        let source = self
            .cli
            .config
            .as_ref()
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
        self.output(&json!({
            "valid": true,
            "source": source,
            "config": config,
        }))
    }

    /// Print a value in the selected format
    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
