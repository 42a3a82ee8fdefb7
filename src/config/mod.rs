#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{
    validate_column_names, validate_non_empty_string, validate_range, validate_required_field,
    validate_s3_bucket_name, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Column names every field list must provide, in the canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["field_id", "date", "lat", "lon", "dim"];

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const MIN_CONCURRENT_REQUESTS: usize = 1;
const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Immutable run configuration, resolved once at process start and passed
/// by reference into every component. No component reads the environment
/// after this is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Ordered column names of the field list (`FIELDS_CSV`).
    pub fields_csv: Vec<String>,
    /// Imagery API credential (`API_KEY`).
    pub api_key: String,
    /// Imagery API base URL (`NASA_URL`).
    pub nasa_url: String,
    /// Object storage bucket (`BUCKET_NAME`).
    pub bucket_name: String,
    /// Field list location, local path or HTTP(S) URL (`CSV_URL`).
    pub csv_url: String,
    /// Switches to local filesystem storage (`USE_MOCK_S3`).
    pub use_mock_s3: bool,
    /// Local storage root (`MEDIA_ROOT`), required in mock mode.
    pub media_root: Option<PathBuf>,
    /// Worker pool size (`CONCURRENT_REQUESTS`), defaults to the host's
    /// available parallelism.
    pub concurrent_requests: usize,
    /// Per-request timeout toward the imagery API (`REQUEST_TIMEOUT_SECS`).
    #[serde(skip)]
    pub request_timeout: Duration,
}

impl MonitorConfig {
    /// Resolves and validates configuration from the environment. Fails
    /// before any network or storage call is made.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_overrides(None, None)
    }

    /// Same as [`MonitorConfig::from_env`], with per-invocation overrides
    /// applied before validation.
    pub fn from_env_with_overrides(
        csv_url: Option<String>,
        media_root: Option<PathBuf>,
    ) -> Result<Self> {
        let config = Self {
            fields_csv: env::var("FIELDS_CSV")
                .unwrap_or_else(|_| REQUIRED_COLUMNS.join(","))
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            api_key: require_env("API_KEY")?,
            nasa_url: require_env("NASA_URL")?,
            bucket_name: require_env("BUCKET_NAME")?,
            csv_url: match csv_url {
                Some(value) => value,
                None => require_env("CSV_URL")?,
            },
            use_mock_s3: env::var("USE_MOCK_S3")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            media_root: media_root.or_else(|| env::var("MEDIA_ROOT").ok().map(PathBuf::from)),
            concurrent_requests: env::var("CONCURRENT_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_parallelism),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_key", &self.api_key)?;
        validate_url("nasa_url", &self.nasa_url)?;
        validate_s3_bucket_name("bucket_name", &self.bucket_name)?;
        validate_non_empty_string("csv_url", &self.csv_url)?;
        validate_column_names("fields_csv", &self.fields_csv, &REQUIRED_COLUMNS)?;
        validate_range(
            "concurrent_requests",
            self.concurrent_requests,
            MIN_CONCURRENT_REQUESTS,
            MAX_CONCURRENT_REQUESTS,
        )?;

        if self.use_mock_s3 {
            let root = validate_required_field("media_root", &self.media_root)?;
            if root.as_os_str().is_empty() {
                return Err(MonitorError::InvalidConfigValueError {
                    field: "media_root".to_string(),
                    value: String::new(),
                    reason: "Local storage root cannot be empty in mock mode".to_string(),
                });
            }
        }

        tracing::debug!("✅ Monitor configuration validation passed");
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| MonitorError::MissingConfigError {
        field: name.to_string(),
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn default_parallelism() -> usize {
    // Clamped to the validated range so the default always passes
    // validation, whatever the host reports.
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(MIN_CONCURRENT_REQUESTS, MAX_CONCURRENT_REQUESTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> MonitorConfig {
        MonitorConfig {
            fields_csv: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            api_key: "demo-key".to_string(),
            nasa_url: "https://api.nasa.gov/planetary/earth/imagery".to_string(),
            bucket_name: "field-imagery".to_string(),
            csv_url: "fields.csv".to_string(),
            use_mock_s3: false,
            media_root: None,
            concurrent_requests: 4,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn empty_api_key_fails() {
        let mut config = base_config();
        config.api_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_nasa_url_fails() {
        let mut config = base_config();
        config.nasa_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn mock_mode_requires_media_root() {
        let mut config = base_config();
        config.use_mock_s3 = true;
        config.media_root = None;
        assert!(config.validate().is_err());

        config.media_root = Some(PathBuf::from("/tmp/imagery"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_required_column_fails() {
        let mut config = base_config();
        config.fields_csv = vec!["field_id".to_string(), "date".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_parallelism_always_validates() {
        let mut config = base_config();
        config.concurrent_requests = default_parallelism();
        assert!(config.validate().is_ok());
    }

    // The only test touching these environment variables; the rest of the
    // suite builds configs directly.
    #[test]
    fn from_env_reports_each_missing_mandatory_variable() {
        let mandatory = ["API_KEY", "NASA_URL", "BUCKET_NAME", "CSV_URL"];
        for name in mandatory {
            env::remove_var(name);
        }
        env::remove_var("FIELDS_CSV");
        env::remove_var("USE_MOCK_S3");
        env::remove_var("MEDIA_ROOT");
        env::remove_var("CONCURRENT_REQUESTS");
        env::remove_var("REQUEST_TIMEOUT_SECS");

        let values = [
            ("API_KEY", "demo-key"),
            ("NASA_URL", "https://api.nasa.gov/planetary/earth/imagery"),
            ("BUCKET_NAME", "field-imagery"),
            ("CSV_URL", "fields.csv"),
        ];

        // Each mandatory variable in turn is the first one missing.
        for (name, value) in values {
            match MonitorConfig::from_env_with_overrides(None, None) {
                Err(MonitorError::MissingConfigError { field }) => assert_eq!(field, name),
                other => panic!("expected MissingConfigError for {}, got {:?}", name, other),
            }
            env::set_var(name, value);
        }

        // With all four present, construction succeeds on defaults alone.
        let config = MonitorConfig::from_env_with_overrides(None, None).unwrap();
        assert_eq!(config.api_key, "demo-key");
        assert!(!config.use_mock_s3);
        assert!(config.concurrent_requests >= MIN_CONCURRENT_REQUESTS);
        assert!(config.concurrent_requests <= MAX_CONCURRENT_REQUESTS);

        for (name, _) in values {
            env::remove_var(name);
        }
    }

    #[test]
    fn parse_bool_accepts_common_forms() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("Yes"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
    }
}
