use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};

use crate::error::AppError;
use crate::tracking::TrackingStore;

/// Starts the activity log sweep scheduler
///
/// Runs every five minutes and purges activity entries older than the
/// configured max age. The flagged set is untouched; its lifecycle belongs
/// to the review records.
///
/// # Arguments
/// - `store`: Tracking store to sweep
pub async fn start_scheduler(store: Arc<TrackingStore>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
        let store = store.clone();

        Box::pin(async move {
            run_once(&store, Utc::now());
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Tracking sweep scheduler started");

    Ok(())
}

/// One sweep pass. Returns the number of entries removed.
pub fn run_once(store: &TrackingStore, now: DateTime<Utc>) -> usize {
    let removed = store.sweep(now);
    if removed > 0 {
        debug!("Swept {} stale activity entries", removed);
    }
    removed
}
