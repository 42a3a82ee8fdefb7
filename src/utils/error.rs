use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Field source unavailable ({source_name}): {cause}")]
    SourceUnavailable { source_name: String, cause: String },

    #[error("Malformed field list at row {row}: {reason}")]
    SourceMalformed { row: usize, reason: String },

    #[error("Storage container unavailable: {message}")]
    ContainerUnavailable { message: String },

    #[error("Fetch failed for field {field_id}: {cause}")]
    FetchFailed { field_id: String, cause: String },

    #[error("Store failed for key {key}: {cause}")]
    StoreFailed { key: String, cause: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Storage,
    Network,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::SourceUnavailable { .. } | Self::SourceMalformed { .. } | Self::CsvError(_) => {
                ErrorCategory::Source
            }
            Self::ContainerUnavailable { .. } | Self::StoreFailed { .. } | Self::IoError(_) => {
                ErrorCategory::Storage
            }
            Self::FetchFailed { .. } | Self::ApiError(_) => ErrorCategory::Network,
            Self::ProcessingError { .. } | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Fatal before any work starts.
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigError { .. }
            | Self::ContainerUnavailable { .. } => ErrorSeverity::Critical,
            // Fatal, but only after a clean startup.
            Self::SourceUnavailable { .. } | Self::SourceMalformed { .. } | Self::CsvError(_) => {
                ErrorSeverity::High
            }
            // Per-field, isolated to one unit of work.
            Self::FetchFailed { .. } | Self::StoreFailed { .. } => ErrorSeverity::Medium,
            Self::ProcessingError { .. }
            | Self::ApiError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Set the {} environment variable and rerun", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {} and rerun", field)
            }
            Self::ConfigError { .. } => "Check the run configuration".to_string(),
            Self::SourceUnavailable { .. } => {
                "Check that CSV_URL points to a readable field list".to_string()
            }
            Self::SourceMalformed { .. } => {
                "Check that every row of the field list has the configured columns".to_string()
            }
            Self::ContainerUnavailable { .. } => {
                "Check storage credentials and that the bucket name is valid".to_string()
            }
            Self::FetchFailed { .. } | Self::ApiError(_) => {
                "Check the imagery API URL, key and network connectivity".to_string()
            }
            Self::StoreFailed { .. } | Self::IoError(_) => {
                "Check storage permissions and free space".to_string()
            }
            Self::CsvError(_) => "Check the field list format".to_string(),
            Self::ProcessingError { .. } => "Check the input band data".to_string(),
            Self::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => format!("Configuration is incomplete: {}", field),
            Self::FetchFailed { field_id, .. } => {
                format!("Could not download imagery for field {}", field_id)
            }
            Self::StoreFailed { key, .. } => format!("Could not store imagery at {}", key),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_are_per_field_severity() {
        let err = MonitorError::FetchFailed {
            field_id: "F1".to_string(),
            cause: "404 Not Found".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.to_string().contains("F1"));
    }

    #[test]
    fn missing_config_is_critical() {
        let err = MonitorError::MissingConfigError {
            field: "API_KEY".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("API_KEY"));
    }
}
