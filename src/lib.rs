pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::storage::{LocalStorage, S3Storage};
pub use config::MonitorConfig;
pub use crate::core::{fetcher::ImageFetcher, fields::CsvFieldSource, monitor::FieldMonitor};
pub use domain::model::{FieldFailure, FieldRecord, ImageArtifact, RunOutcome};
pub use domain::ports::{FieldSource, ImageStore};
pub use utils::error::{MonitorError, Result};
