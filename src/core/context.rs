use crate::domain::ports::ImageStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// Scoped setup around one monitoring run: ensures the storage container
/// exists before any field task starts, and releases the shared handle on
/// every exit path via drop.
#[derive(Debug)]
pub struct RunContext<S: ImageStore> {
    storage: Arc<S>,
}

impl<S: ImageStore> RunContext<S> {
    pub async fn enter(storage: Arc<S>) -> Result<Self> {
        storage.ensure_container().await?;
        tracing::debug!("Storage context ready");
        Ok(Self { storage })
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

impl<S: ImageStore> Drop for RunContext<S> {
    fn drop(&mut self) {
        tracing::debug!("Storage context released");
    }
}
