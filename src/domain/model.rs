use serde::{Deserialize, Serialize};

/// One row of the field list: a geographic area plus the imagery request
/// parameters for it. Immutable once parsed; lives for a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRecord {
    pub field_id: String,
    /// ISO date (`YYYY-MM-DD`) of the requested imagery.
    pub date: String,
    pub lat: f64,
    pub lon: f64,
    /// Image side length in degrees.
    pub dim: f64,
}

impl FieldRecord {
    /// Storage key for this record's imagery. Deterministic for a given
    /// field id and date.
    pub fn storage_key(&self) -> String {
        image_key(&self.field_id, &self.date)
    }
}

pub fn image_key(field_id: &str, date: &str) -> String {
    format!("{}/{}_imagery.png", field_id, date)
}

/// One downloaded image, owned by the task that fetched it until it is
/// handed to the store.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    bytes: Vec<u8>,
}

impl ImageArtifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldFailure {
    pub field_id: String,
    pub error: String,
}

/// Aggregate result of one monitoring run. Failures are listed in field
/// source row order; a non-empty list means the run failed overall, but
/// every field that succeeded stays stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub attempted: usize,
    pub failures: Vec<FieldFailure>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
