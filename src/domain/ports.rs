use crate::domain::model::FieldRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Storage capability for one run: bound either to an S3 bucket or to a
/// local directory tree. Selected once at startup and shared read-only
/// across all field tasks.
pub trait ImageStore: Send + Sync {
    /// Idempotent create-if-absent of the backing container.
    fn ensure_container(&self) -> impl std::future::Future<Output = Result<()>> + Send;

    fn put(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Produces the ordered field list for a run.
#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn load(&self) -> Result<Vec<FieldRecord>>;
}
