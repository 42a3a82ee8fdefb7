pub mod context;
pub mod fetcher;
pub mod fields;
pub mod monitor;
pub mod ndvi;

pub use crate::domain::model::{FieldFailure, FieldRecord, ImageArtifact, RunOutcome};
pub use crate::domain::ports::{FieldSource, ImageStore};
pub use crate::utils::error::Result;
