use crate::config::FetchConfig;
use crate::domain::model::{JsonStyle, SelectionPolicy};
use crate::utils::error::{FeedError, Result};
use std::path::Path;
use clap::Parser;

/// Every flag is optional: with no arguments the tool writes the five pulsars
/// with the latest reference epoch to `pulsars.json` in the working directory.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "pulsar-feed")]
#[command(about = "Fetch pulsar records from the ATNF catalogue into a JSON file")]
pub struct CliConfig {
    /// TOML configuration file; flags given here take precedence over it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Row selection policy
    #[arg(long, value_enum)]
    pub policy: Option<SelectionPolicy>,

    /// Catalogue fields to request
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Catalogue condition, e.g. "P0 < 0.01"; pass "" to disable the policy default
    #[arg(long)]
    pub condition: Option<String>,

    /// Maximum number of records written
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output file, or "-" for stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Indented JSON
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Catalogue query form URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Catalogue version requested from the query form
    #[arg(long)]
    pub catalogue_version: Option<String>,

    /// Abort the catalogue request after this many seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Show the resolved configuration and query URL without fetching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,

    /// Emit JSON log lines instead of the compact format
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入配置檔（若有指定）並套用命令列覆蓋設定
    pub fn load(&self) -> Result<FetchConfig> {
        let mut config = match &self.config {
            Some(path) if !Path::new(path).is_file() => {
                return Err(FeedError::MissingConfigError {
                    field: format!("--config {}", path),
                });
            }
            Some(path) => FetchConfig::from_file(path)?,
            None => FetchConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut FetchConfig) {
        if let Some(policy) = self.policy {
            config.query.policy = policy;
        }
        if let Some(fields) = &self.fields {
            config.query.fields = Some(fields.clone());
        }
        if let Some(condition) = &self.condition {
            config.query.condition = Some(condition.clone());
        }
        if let Some(limit) = self.limit {
            config.query.limit = Some(limit);
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if self.pretty {
            config.output.style = Some(JsonStyle::Pretty);
        } else if self.compact {
            config.output.style = Some(JsonStyle::Compact);
        }
        if let Some(endpoint) = &self.endpoint {
            config.catalogue.endpoint = endpoint.clone();
        }
        if let Some(version) = &self.catalogue_version {
            config.catalogue.version = version.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.catalogue.timeout_seconds = Some(timeout);
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}
