use crate::adapters::atnf::{DEFAULT_ENDPOINT, DEFAULT_VERSION};
use crate::core::ConfigProvider;
use crate::domain::model::{JsonStyle, OutputTarget, SelectionPolicy};
use crate::utils::error::{FeedError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Everything one refresh needs. Unset values fall back to the policy defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub catalogue: CatalogueConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    pub endpoint: String,
    pub version: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            version: DEFAULT_VERSION.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub policy: SelectionPolicy,
    pub fields: Option<Vec<String>>,
    /// An empty string disables the policy's default condition.
    pub condition: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File path relative to the working directory, or `-` for stdout.
    pub path: String,
    pub style: Option<JsonStyle>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: OutputTarget::DEFAULT_FILE.to_string(),
            style: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl FetchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FeedError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FeedError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PSRCAT_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("valid regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.catalogue.timeout_seconds.map(Duration::from_secs)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for FetchConfig {
    fn policy(&self) -> SelectionPolicy {
        self.query.policy
    }

    fn fields(&self) -> Vec<String> {
        self.query
            .fields
            .clone()
            .unwrap_or_else(|| self.query.policy.default_fields())
    }

    fn condition(&self) -> Option<String> {
        match &self.query.condition {
            Some(condition) if condition.trim().is_empty() => None,
            Some(condition) => Some(condition.clone()),
            None => self.query.policy.default_condition(),
        }
    }

    fn limit(&self) -> usize {
        self.query
            .limit
            .unwrap_or_else(|| self.query.policy.default_limit())
    }

    fn output(&self) -> OutputTarget {
        OutputTarget::parse(&self.output.path)
    }

    fn json_style(&self) -> JsonStyle {
        self.output
            .style
            .unwrap_or_else(|| self.query.policy.default_style())
    }
}

impl Validate for FetchConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_catalogue_endpoint("catalogue.endpoint", &self.catalogue.endpoint)?;
        validation::validate_catalogue_version("catalogue.version", &self.catalogue.version)?;

        if let Some(timeout) = self.catalogue.timeout_seconds {
            validation::validate_timeout("catalogue.timeout_seconds", timeout)?;
        }

        validation::validate_field_names("query.fields", &self.fields())?;
        validation::validate_record_limit("query.limit", self.limit())?;
        validation::validate_output_target("output.path", &self.output.path)?;

        Ok(())
    }
}
