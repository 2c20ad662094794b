use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Catalogue request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Catalogue returned HTTP {status} for {url}")]
    CatalogueStatusError { status: u16, url: String },

    #[error("Malformed catalogue response: {message}")]
    MalformedResponseError { message: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Catalogue,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 遠端暫時性錯誤，下一次排程執行可能成功
    Medium,
    /// 資料處理錯誤
    High,
    /// 系統或配置錯誤，需要人工處理
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl FeedError {
    pub fn malformed(message: impl Into<String>) -> Self {
        FeedError::MalformedResponseError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FeedError::ApiError(_) | FeedError::CatalogueStatusError { .. } => {
                ErrorCategory::Network
            }
            FeedError::MalformedResponseError { .. } => ErrorCategory::Catalogue,
            FeedError::UrlError(_)
            | FeedError::ConfigValidationError { .. }
            | FeedError::InvalidConfigValueError { .. }
            | FeedError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FeedError::IoError(_) | FeedError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Catalogue => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FeedError::ApiError(_) => {
                "Check network connectivity and that the catalogue endpoint is reachable"
            }
            FeedError::CatalogueStatusError { status, .. } if *status >= 500 => {
                "The catalogue service is having trouble; the next scheduled run may succeed"
            }
            FeedError::CatalogueStatusError { .. } => {
                "Check the endpoint URL and catalogue version in the configuration"
            }
            FeedError::MalformedResponseError { .. } => {
                "Check the requested field names and the condition expression"
            }
            FeedError::IoError(_) => "Check that the output path exists and is writable",
            FeedError::SerializationError(_) => "Re-run with --verbose and inspect the records",
            FeedError::UrlError(_)
            | FeedError::ConfigValidationError { .. }
            | FeedError::InvalidConfigValueError { .. }
            | FeedError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line flags and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the pulsar catalogue: {}", self),
            ErrorCategory::Catalogue => {
                format!("The pulsar catalogue answered with something unexpected: {}", self)
            }
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => format!("Could not write the pulsar records: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
