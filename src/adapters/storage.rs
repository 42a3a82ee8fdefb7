use crate::domain::ports::ImageStore;
use crate::utils::error::{MonitorError, Result};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::Client as S3Client;
use std::path::{Path, PathBuf};

/// Object storage backend, one object per image key in a single bucket.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ImageStore for S3Storage {
    async fn ensure_container(&self) -> Result<()> {
        let result = self
            .client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!("Created bucket {}", self.bucket);
                Ok(())
            }
            Err(err) => match err.into_service_error() {
                // Create-if-absent: an existing bucket is not an error.
                CreateBucketError::BucketAlreadyOwnedByYou(_)
                | CreateBucketError::BucketAlreadyExists(_) => {
                    tracing::debug!("Bucket {} already exists", self.bucket);
                    Ok(())
                }
                other => Err(MonitorError::ContainerUnavailable {
                    message: format!("Failed to create bucket {}: {}", self.bucket, other),
                }),
            },
        }
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| MonitorError::StoreFailed {
                key: key.to_string(),
                cause: e.to_string(),
            })?;

        Ok(())
    }
}

/// Filesystem backend used in mock mode and tests. Keys map to relative
/// paths under the root; missing parent directories are created on write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ImageStore for LocalStorage {
    async fn ensure_container(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| MonitorError::ContainerUnavailable {
                message: format!("Failed to create storage root {}: {}", self.root.display(), e),
            })
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(key);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MonitorError::StoreFailed {
                    key: key.to_string(),
                    cause: e.to_string(),
                })?;
        }

        tokio::fs::write(&full_path, data)
            .await
            .map_err(|e| MonitorError::StoreFailed {
                key: key.to_string(),
                cause: e.to_string(),
            })?;

        Ok(())
    }
}
