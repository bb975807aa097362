use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::ReviewSettings;
use crate::data::{mute_record::MuteRecordRepository, review_record::ReviewRecordRepository};
use crate::error::AppError;
use crate::model::mute::UpsertMuteRecordParam;
use crate::model::review::ReviewOutcome;
use crate::service::alert;
use crate::service::gateway::ModerationGateway;
use crate::service::review::parse_ids;
use crate::tracking::TrackingStore;

/// Starts the review expiry reconciliation scheduler
///
/// Runs every minute and applies the default action to every pending review
/// whose deadline has passed: the mute is extended and the review is closed.
///
/// # Arguments
/// - `db`: Database connection
/// - `gateway`: Moderation gateway for platform side effects
/// - `store`: Tracking store holding the flagged set
/// - `settings`: Review timing configuration
pub async fn start_scheduler(
    db: DatabaseConnection,
    gateway: Arc<dyn ModerationGateway>,
    store: Arc<TrackingStore>,
    settings: ReviewSettings,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = db.clone();
        let gateway = gateway.clone();
        let store = store.clone();
        let settings = settings.clone();

        Box::pin(async move {
            if let Err(e) = run_once(&db, gateway.as_ref(), &store, &settings, Utc::now()).await {
                error!("Error reconciling expired reviews: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Review expiry scheduler started");

    Ok(())
}

/// One reconciliation pass over expired reviews.
///
/// Per-record failures are logged and do not stop the pass.
///
/// # Returns
/// - `Ok(count)`: Number of reviews the default action was applied to
/// - `Err(AppError)`: Failed to query expired reviews
pub async fn run_once(
    db: &DatabaseConnection,
    gateway: &dyn ModerationGateway,
    store: &TrackingStore,
    settings: &ReviewSettings,
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    let expired = ReviewRecordRepository::new(db).get_expired(now).await?;

    let mut applied = 0;
    for record in expired {
        match apply_default(db, gateway, store, settings, &record, now).await {
            Ok(true) => applied += 1,
            Ok(false) => {}
            Err(e) => {
                error!(
                    "Failed to apply default action for review {}: {}",
                    record.review_id, e
                );
            }
        }
    }

    if applied > 0 {
        info!("Applied the default action to {} expired review(s)", applied);
    }

    Ok(applied)
}

/// Applies the default action to one expired review.
///
/// Claims the record first; losing the claim to a concurrent manual
/// resolution is a normal no-op. The mute is re-applied before being
/// extended so a restart that lost the role assignment still converges.
async fn apply_default(
    db: &DatabaseConnection,
    gateway: &dyn ModerationGateway,
    store: &TrackingStore,
    settings: &ReviewSettings,
    record: &entity::review_record::Model,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let (realm_id, actor_id) = parse_ids(record)?;
    let review_id = record
        .review_id
        .parse::<u64>()
        .map_err(|_| AppError::NotFound(format!("malformed review id {}", record.review_id)))?;

    if !ReviewRecordRepository::new(db).claim(review_id).await? {
        return Ok(false);
    }

    if let Err(error) = gateway
        .mute(realm_id, actor_id, "spam review expired: extending mute")
        .await
    {
        warn!("Could not re-apply mute to actor {}: {}", actor_id, error);
    }

    let unmute_at = now + settings.default_mute;
    if let Err(error) = MuteRecordRepository::new(db)
        .upsert(UpsertMuteRecordParam {
            actor_id,
            realm_id,
            unmute_at,
        })
        .await
    {
        // The claim already removed the review; do not leave the actor
        // flagged with nothing left to resolve.
        store.unflag(realm_id, actor_id);
        if let Err(e) = gateway
            .post_ops_alert(&format!(
                "Review {review_id}: failed to record the extended mute for \
                 <@{actor_id}>: {error}. Moderate manually."
            ))
            .await
        {
            warn!("Failed to post ops alert for review {}: {}", review_id, e);
        }
        return Err(error.into());
    }

    store.unflag(realm_id, actor_id);

    if let Err(error) = gateway
        .post_staff_notice(&alert::default_action_notice(actor_id, unmute_at))
        .await
    {
        warn!("Failed to post default action notice for review {}: {}", review_id, error);
    }

    let summary = alert::resolution_summary(ReviewOutcome::ExpiredDefaultApplied, actor_id, None);
    if let Err(error) = gateway.update_review_alert(review_id, &summary).await {
        warn!("Failed to update alert for review {}: {}", review_id, error);
    }
    if let Err(error) = gateway.audit_log(&summary).await {
        warn!("Failed to audit review {}: {}", review_id, error);
    }

    Ok(true)
}
