use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

use crate::config::ReviewSettings;
use crate::data::{mute_record::MuteRecordRepository, review_record::ReviewRecordRepository};
use crate::error::AppError;
use crate::model::mute::UpsertMuteRecordParam;
use crate::model::review::{Resolution, ReviewAction, ReviewOutcome};
use crate::service::alert;
use crate::service::gateway::ModerationGateway;
use crate::tracking::TrackingStore;

/// Resolves pending reviews: `Pending -> {Lifted, Confirmed, Banned}`.
///
/// The review record's deletion is the atomic claim; whoever deletes the row
/// applies the outcome, everyone else observes `AlreadyResolved`. Permission
/// checks happen in the interaction handler before this service runs.
pub struct ReviewService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn ModerationGateway,
    store: &'a TrackingStore,
    settings: &'a ReviewSettings,
}

impl<'a> ReviewService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        gateway: &'a dyn ModerationGateway,
        store: &'a TrackingStore,
        settings: &'a ReviewSettings,
    ) -> Self {
        Self {
            db,
            gateway,
            store,
            settings,
        }
    }

    /// Applies a reviewer's action to a pending review.
    ///
    /// # Arguments
    /// - `review_id`: The review (staff alert message ID)
    /// - `action`: Confirmed action to apply
    /// - `reviewer_id`: Acting staff member, recorded in the audit trail
    /// - `now`: Resolution time, basis for the extended mute
    ///
    /// # Returns
    /// - `Ok(Resolution::Applied(outcome))`: This call resolved the review
    /// - `Ok(Resolution::AlreadyResolved)`: Someone resolved it first
    /// - `Err(AppError)`: A platform action or database write failed
    pub async fn resolve(
        &self,
        review_id: u64,
        action: ReviewAction,
        reviewer_id: u64,
        now: DateTime<Utc>,
    ) -> Result<Resolution, AppError> {
        let review_repo = ReviewRecordRepository::new(self.db);

        let Some(record) = review_repo.get_by_id(review_id).await? else {
            debug!("Review {} already resolved", review_id);
            return Ok(Resolution::AlreadyResolved);
        };

        let (realm_id, actor_id) = parse_ids(&record)?;

        if !review_repo.claim(review_id).await? {
            debug!("Review {} claimed by a concurrent resolver", review_id);
            return Ok(Resolution::AlreadyResolved);
        }

        let outcome = match self.apply(action, realm_id, actor_id, now).await {
            Ok(outcome) => outcome,
            Err(error) => {
                self.recover_failed_action(review_id, realm_id, actor_id, action, &error)
                    .await;
                return Err(error);
            }
        };

        self.store.unflag(realm_id, actor_id);

        let summary = alert::resolution_summary(outcome, actor_id, Some(reviewer_id));
        if let Err(error) = self.gateway.update_review_alert(review_id, &summary).await {
            warn!("Failed to update alert for review {}: {}", review_id, error);
        }
        if let Err(error) = self.gateway.audit_log(&summary).await {
            warn!("Failed to audit review {}: {}", review_id, error);
        }

        Ok(Resolution::Applied(outcome))
    }

    /// Applies the platform and database effects of one claimed action.
    async fn apply(
        &self,
        action: ReviewAction,
        realm_id: u64,
        actor_id: u64,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, AppError> {
        let mute_repo = MuteRecordRepository::new(self.db);
        match action {
            ReviewAction::Lift => {
                self.gateway
                    .unmute(realm_id, actor_id, "spam review: false positive")
                    .await?;
                mute_repo.delete(realm_id, actor_id).await?;
                Ok(ReviewOutcome::LiftedFalsePositive)
            }
            ReviewAction::Confirm => {
                mute_repo
                    .upsert(UpsertMuteRecordParam {
                        actor_id,
                        realm_id,
                        unmute_at: now + self.settings.default_mute,
                    })
                    .await?;
                Ok(ReviewOutcome::ConfirmedExtended)
            }
            ReviewAction::Ban => {
                if let Err(error) = self
                    .gateway
                    .direct_message(actor_id, &alert::ban_notice())
                    .await
                {
                    debug!("Could not notify actor {} before ban: {}", actor_id, error);
                }
                self.gateway
                    .ban(realm_id, actor_id, "confirmed spam")
                    .await?;
                mute_repo.delete(realm_id, actor_id).await?;
                Ok(ReviewOutcome::Banned)
            }
        }
    }

    /// The claim already deleted the review record, so a failed action must
    /// not leave the actor flagged with nothing left to resolve. The flag is
    /// cleared and staff are pointed at the failure; the containment mute
    /// stays in place.
    async fn recover_failed_action(
        &self,
        review_id: u64,
        realm_id: u64,
        actor_id: u64,
        action: ReviewAction,
        error: &AppError,
    ) {
        self.store.unflag(realm_id, actor_id);

        let note = format!(
            "Review {review_id}: {} of <@{actor_id}> failed: {error}. \
             The mute stays in place; moderate manually.",
            action.as_str()
        );
        if let Err(e) = self.gateway.post_ops_alert(&note).await {
            warn!("Failed to post ops alert for review {}: {}", review_id, e);
        }
        if let Err(e) = self.gateway.update_review_alert(review_id, &note).await {
            warn!("Failed to update alert for review {}: {}", review_id, e);
        }
    }
}

/// Snowflakes are stored as strings; unparseable ones mean the record did
/// not come from this application.
pub(crate) fn parse_ids(record: &entity::review_record::Model) -> Result<(u64, u64), AppError> {
    let realm_id = record
        .realm_id
        .parse::<u64>()
        .map_err(|_| AppError::NotFound(format!("review {} has a malformed realm id", record.review_id)))?;
    let actor_id = record
        .actor_id
        .parse::<u64>()
        .map_err(|_| AppError::NotFound(format!("review {} has a malformed actor id", record.review_id)))?;
    Ok((realm_id, actor_id))
}
