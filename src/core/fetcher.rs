use crate::config::MonitorConfig;
use crate::domain::model::{FieldRecord, ImageArtifact};
use crate::utils::error::{MonitorError, Result};
use reqwest::Client;
use std::sync::Arc;

/// Downloads one image per field from the imagery API. Cheap to clone;
/// every field task gets its own handle over the shared connection pool.
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
    config: Arc<MonitorConfig>,
}

impl ImageFetcher {
    pub fn new(config: Arc<MonitorConfig>) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    /// Single-attempt GET against the imagery API. Any non-2xx status,
    /// connection failure or timeout fails this field only.
    pub async fn fetch(&self, field: &FieldRecord) -> Result<ImageArtifact> {
        let params = [
            ("api_key", self.config.api_key.clone()),
            ("date", field.date.clone()),
            ("lat", field.lat.to_string()),
            ("lon", field.lon.to_string()),
            ("dim", field.dim.to_string()),
        ];

        tracing::debug!("Requesting imagery for field {}", field.field_id);
        let mut response = self
            .client
            .get(&self.config.nasa_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| fetch_failed(field, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::FetchFailed {
                field_id: field.field_id.clone(),
                cause: format!("HTTP status {}", status),
            });
        }

        // Accumulate the body chunk by chunk; the API does not always
        // announce a content length up front.
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| fetch_failed(field, e))? {
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!("Fetched {} bytes for field {}", bytes.len(), field.field_id);
        Ok(ImageArtifact::new(bytes))
    }
}

fn fetch_failed(field: &FieldRecord, error: reqwest::Error) -> MonitorError {
    MonitorError::FetchFailed {
        field_id: field.field_id.clone(),
        cause: error.to_string(),
    }
}
