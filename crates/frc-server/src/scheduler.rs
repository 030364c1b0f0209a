//! Background job scheduler.
//!
//! The only recurring job purges expired cache entries so the partition files
//! do not grow between writes.

use std::sync::Arc;

use frc_cache::Cache;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler with the cache cleanup job registered.
///
/// The returned handle must be kept alive for the lifetime of the process.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    cleanup_cron: &str,
    cache: Arc<Cache>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_cleanup_job(&scheduler, cleanup_cron, cache).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_cleanup_job(
    scheduler: &JobScheduler,
    cron: &str,
    cache: Arc<Cache>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let cache = Arc::clone(&cache);
        Box::pin(async move {
            let removed = tokio::task::spawn_blocking(move || cache.cleanup_expired()).await;
            match removed {
                Ok(removed) => tracing::info!(removed, "scheduler: expired cache entries purged"),
                Err(e) => tracing::error!(error = %e, "scheduler: cache cleanup task failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: cache cleanup job registered");
    Ok(())
}
