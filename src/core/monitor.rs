use crate::config::MonitorConfig;
use crate::core::context::RunContext;
use crate::core::fetcher::ImageFetcher;
use crate::domain::model::{FieldFailure, FieldRecord, RunOutcome};
use crate::domain::ports::{FieldSource, ImageStore};
use crate::utils::error::{MonitorError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Orchestrates one monitoring run: ensures the storage container, loads
/// the field list and fans out one fetch-and-store task per field.
///
/// Fields are isolated from each other: a failed fetch or store is recorded
/// in the outcome and never cancels or affects sibling tasks. Only
/// configuration, source and container errors abort the run.
pub struct FieldMonitor<S: ImageStore + 'static, F: FieldSource> {
    config: Arc<MonitorConfig>,
    storage: Arc<S>,
    source: F,
    fetcher: ImageFetcher,
}

impl<S: ImageStore + 'static, F: FieldSource> FieldMonitor<S, F> {
    pub fn new(config: Arc<MonitorConfig>, storage: Arc<S>, source: F) -> Result<Self> {
        let fetcher = ImageFetcher::new(Arc::clone(&config))?;
        Ok(Self {
            config,
            storage,
            source,
            fetcher,
        })
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let context = RunContext::enter(Arc::clone(&self.storage)).await?;

        // Source errors are fatal: nothing has been fetched yet, so there
        // is no partial outcome to report.
        let fields = self.source.load().await?;
        let attempted = fields.len();
        tracing::info!("Monitoring {} fields", attempted);

        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_requests));
        let mut tasks = JoinSet::new();

        for (index, field) in fields.into_iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let storage = Arc::clone(context.storage());
            let sem = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let field_id = field.field_id.clone();
                let result = match sem.acquire().await {
                    Ok(_permit) => process_field(&fetcher, storage.as_ref(), &field).await,
                    Err(err) => Err(MonitorError::ProcessingError {
                        message: format!("worker pool closed before field was scheduled: {}", err),
                    }),
                };
                (index, field_id, result)
            });
        }

        // Join every task regardless of individual outcome; completion
        // order is arbitrary, reporting order is restored below.
        let mut failures: Vec<(usize, FieldFailure)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, field_id, Ok(()))) => {
                    tracing::info!("Image for field {} uploaded successfully.", field_id);
                }
                Ok((index, field_id, Err(err))) => {
                    tracing::error!(
                        "Error in getting image for field {} with error {}",
                        field_id,
                        err
                    );
                    failures.push((
                        index,
                        FieldFailure {
                            field_id,
                            error: err.to_string(),
                        },
                    ));
                }
                Err(join_err) => {
                    tracing::warn!(error = %join_err, "Field task panicked");
                    failures.push((
                        usize::MAX,
                        FieldFailure {
                            field_id: "<unknown>".to_string(),
                            error: join_err.to_string(),
                        },
                    ));
                }
            }
        }

        failures.sort_by_key(|(index, _)| *index);
        Ok(RunOutcome {
            attempted,
            failures: failures.into_iter().map(|(_, failure)| failure).collect(),
        })
    }
}

/// One field's unit of work: fetch strictly precedes store, and a store
/// failure is as fatal for this field as a fetch failure.
async fn process_field<S: ImageStore>(
    fetcher: &ImageFetcher,
    storage: &S,
    field: &FieldRecord,
) -> Result<()> {
    let artifact = fetcher.fetch(field).await?;
    storage.put(&field.storage_key(), artifact.as_bytes()).await
}
