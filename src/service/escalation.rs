use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, warn};

use crate::config::ReviewSettings;
use crate::data::{mute_record::MuteRecordRepository, review_record::ReviewRecordRepository};
use crate::detection::{self, DetectionConfig, DetectionResult};
use crate::error::AppError;
use crate::model::activity::ActivityEvent;
use crate::model::mute::UpsertMuteRecordParam;
use crate::model::review::CreateReviewRecordParam;
use crate::service::alert;
use crate::service::gateway::ModerationGateway;
use crate::service::retry::{with_retry, RetryPolicy};
use crate::tracking::TrackingStore;

/// Runs detection over drained activity events and escalates matches.
///
/// Escalation applies containment, notifies the actor, posts the staff
/// alert, and persists the durable review state. The flagged set guarantees
/// at most one open escalation per actor per realm.
pub struct EscalationEngine {
    db: DatabaseConnection,
    gateway: Arc<dyn ModerationGateway>,
    store: Arc<TrackingStore>,
    detection: DetectionConfig,
    review: ReviewSettings,
    retry: RetryPolicy,
}

impl EscalationEngine {
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn ModerationGateway>,
        store: Arc<TrackingStore>,
        detection: DetectionConfig,
        review: ReviewSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            db,
            gateway,
            store,
            detection,
            review,
            retry,
        }
    }

    /// Processes one drained batch: record each event, evaluate the actor,
    /// escalate on a match. Escalation failures are logged per event and
    /// never stop the batch.
    pub async fn process(&self, events: Vec<ActivityEvent>, now: DateTime<Utc>) {
        for event in events {
            self.store.record(&event);

            if self.store.is_flagged(event.realm_id, event.actor_id) {
                continue;
            }

            let Some(detection) = detection::evaluate(
                &self.store,
                event.realm_id,
                event.actor_id,
                now,
                &self.detection,
            ) else {
                continue;
            };

            if let Err(e) = self.escalate(&event, &detection, now).await {
                error!("Escalation failed for actor {}: {}", event.actor_id, e);
            }
        }
    }

    /// Escalates one detection: flag, mute, DM, staff alert, persist, audit.
    ///
    /// # Returns
    /// - `Ok(true)`: Escalation completed
    /// - `Ok(false)`: Nothing done; the actor was already flagged or the bot
    ///   lacks the permission to contain them
    /// - `Err(AppError)`: A delivery or persistence step failed after
    ///   retries; any partial containment has been rolled back
    pub async fn escalate(
        &self,
        event: &ActivityEvent,
        detection: &DetectionResult,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let realm_id = event.realm_id;
        let actor_id = event.actor_id;

        if !self.store.flag(realm_id, actor_id) {
            debug!("Actor {} already under escalation", actor_id);
            return Ok(false);
        }

        let reason = format!("Automatic mute: {} spam pattern", detection.kind());
        let mute = with_retry(&self.retry, "apply containment mute", || {
            self.gateway.mute(realm_id, actor_id, &reason)
        })
        .await;

        match mute {
            Ok(()) => {}
            Err(AppError::PermissionDenied(what)) => {
                warn!(
                    "Cannot contain actor {} in realm {}: missing permission to {}",
                    actor_id, realm_id, what
                );
                self.store.unflag(realm_id, actor_id);
                return Ok(false);
            }
            Err(error) => {
                self.store.unflag(realm_id, actor_id);
                self.notify_ops(&format!(
                    "Containment of <@{actor_id}> failed: {error}"
                ))
                .await;
                return Err(error);
            }
        }

        if let Err(error) = self.gateway.direct_message(actor_id, &alert::actor_notice()).await {
            debug!("Could not notify actor {} by DM: {}", actor_id, error);
        }

        let expires_at = now + self.review.deadline;
        let content = alert::review_alert(actor_id, detection, expires_at);
        let review_id = match with_retry(&self.retry, "post review alert", || {
            self.gateway.post_review_alert(&content)
        })
        .await
        {
            Ok(review_id) => review_id,
            Err(error) => {
                self.rollback(realm_id, actor_id, "the staff alert could not be posted")
                    .await;
                return Err(error);
            }
        };

        let db = &self.db;
        let unmute_at = now + self.review.default_mute;
        let persisted = with_retry(&self.retry, "persist review state", || {
            let pattern_kind = detection.kind().to_string();
            async move {
                MuteRecordRepository::new(db)
                    .upsert(UpsertMuteRecordParam {
                        actor_id,
                        realm_id,
                        unmute_at,
                    })
                    .await?;
                ReviewRecordRepository::new(db)
                    .create(CreateReviewRecordParam {
                        review_id,
                        actor_id,
                        realm_id,
                        created_at: now,
                        expires_at,
                        pattern_kind,
                    })
                    .await?;
                Ok::<(), AppError>(())
            }
        })
        .await;

        if let Err(error) = persisted {
            self.rollback(realm_id, actor_id, "the review state could not be persisted")
                .await;
            return Err(error);
        }

        let summary = format!(
            "Automatically muted <@{actor_id}> in realm {realm_id} ({} pattern), review {review_id}",
            detection.kind()
        );
        if let Err(error) = self.gateway.audit_log(&summary).await {
            warn!("Failed to write audit entry for review {}: {}", review_id, error);
        }

        Ok(true)
    }

    /// Undoes a partial escalation so no actor stays contained without a
    /// review trail.
    async fn rollback(&self, realm_id: u64, actor_id: u64, why: &str) {
        if let Err(error) = MuteRecordRepository::new(&self.db)
            .delete(realm_id, actor_id)
            .await
        {
            warn!("Rollback: failed to delete mute record for {}: {}", actor_id, error);
        }
        if let Err(error) = self
            .gateway
            .unmute(realm_id, actor_id, "rolling back automatic mute")
            .await
        {
            warn!("Rollback: failed to unmute actor {}: {}", actor_id, error);
        }
        self.store.unflag(realm_id, actor_id);
        self.notify_ops(&format!(
            "Rolled back containment of <@{actor_id}>: {why}"
        ))
        .await;
    }

    async fn notify_ops(&self, content: &str) {
        if let Err(error) = self.gateway.post_ops_alert(content).await {
            warn!("Failed to post ops alert: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackingSettings;
    use crate::model::review::{Resolution, ReviewAction, ReviewOutcome};
    use crate::service::review::ReviewService;
    use crate::service::testing::{GatewayCall, RecordingGateway};
    use sea_orm::EntityTrait;
    use std::sync::atomic::Ordering;
    use std::time::Duration as StdDuration;
    use test_utils::builder::TestBuilder;

    fn burst_events(actor_id: u64, now: DateTime<Utc>) -> Vec<ActivityEvent> {
        (0..10)
            .map(|i| ActivityEvent {
                actor_id,
                realm_id: 1,
                channel_id: 42,
                content: format!("spam {i}"),
                timestamp: now + chrono::Duration::milliseconds(i * 50),
            })
            .collect()
    }

    async fn engine_with(
        gateway: Arc<RecordingGateway>,
    ) -> (EscalationEngine, DatabaseConnection, Arc<TrackingStore>) {
        let test = TestBuilder::new()
            .with_moderation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.unwrap();
        let store = Arc::new(TrackingStore::new(TrackingSettings::default()));
        let engine = EscalationEngine::new(
            db.clone(),
            gateway,
            store.clone(),
            DetectionConfig::default(),
            ReviewSettings::default(),
            RetryPolicy {
                attempts: 2,
                base_delay: StdDuration::from_millis(1),
            },
        );
        (engine, db, store)
    }

    #[tokio::test]
    async fn burst_escalates_with_full_trail() {
        let gateway = Arc::new(RecordingGateway::new());
        let (engine, db, store) = engine_with(gateway.clone()).await;
        let now = Utc::now();

        engine.process(burst_events(7, now), now + chrono::Duration::seconds(1)).await;

        let calls = gateway.calls();
        assert!(calls.contains(&GatewayCall::Mute {
            realm_id: 1,
            actor_id: 7
        }));
        assert!(calls.contains(&GatewayCall::DirectMessage { actor_id: 7 }));
        assert!(store.is_flagged(1, 7));

        let review_id = gateway.last_review_id();
        let record = entity::prelude::ReviewRecord::find_by_id(review_id.to_string())
            .one(&db)
            .await
            .unwrap()
            .expect("review record should exist");
        assert_eq!(record.actor_id, "7");
        assert_eq!(record.pattern_kind, "same_channel");

        let mute = entity::prelude::MuteRecord::find_by_id(("7".to_string(), "1".to_string()))
            .one(&db)
            .await
            .unwrap();
        assert!(mute.is_some());
    }

    #[tokio::test]
    async fn channel_spread_escalates_and_confirms_end_to_end() {
        let gateway = Arc::new(RecordingGateway::new());
        let (engine, db, store) = engine_with(gateway.clone()).await;
        let now = Utc::now();

        // One message in each of ten channels.
        let events: Vec<ActivityEvent> = (0..10)
            .map(|i| ActivityEvent {
                actor_id: 7,
                realm_id: 1,
                channel_id: 100 + i as u64,
                content: format!("spam {i}"),
                timestamp: now + chrono::Duration::milliseconds(i * 50),
            })
            .collect();
        engine.process(events, now + chrono::Duration::seconds(1)).await;

        let review_id = gateway.last_review_id();
        let record = entity::prelude::ReviewRecord::find_by_id(review_id.to_string())
            .one(&db)
            .await
            .unwrap()
            .expect("review record should exist");
        assert_eq!(record.pattern_kind, "multiple_channels");
        assert!(store.is_flagged(1, 7));

        let settings = ReviewSettings::default();
        let service = ReviewService::new(&db, gateway.as_ref(), &store, &settings);
        let resolution = service
            .resolve(review_id, ReviewAction::Confirm, 99, now)
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Applied(ReviewOutcome::ConfirmedExtended));
        assert!(!store.is_flagged(1, 7));
        let mute = entity::prelude::MuteRecord::find_by_id(("7".to_string(), "1".to_string()))
            .one(&db)
            .await
            .unwrap()
            .expect("mute record should remain");
        assert_eq!(mute.unmute_at, now + settings.default_mute);
        assert!(entity::prelude::ReviewRecord::find()
            .all(&db)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn flagged_actor_is_not_escalated_twice() {
        let gateway = Arc::new(RecordingGateway::new());
        let (engine, _db, _store) = engine_with(gateway.clone()).await;
        let now = Utc::now();

        engine.process(burst_events(7, now), now + chrono::Duration::seconds(1)).await;
        engine.process(burst_events(7, now), now + chrono::Duration::seconds(2)).await;

        let alerts = gateway
            .calls()
            .iter()
            .filter(|c| matches!(c, GatewayCall::ReviewAlert { .. }))
            .count();
        assert_eq!(alerts, 1);
    }

    #[tokio::test]
    async fn permission_denied_aborts_without_trail() {
        let gateway = Arc::new(RecordingGateway::new());
        gateway.deny_mute.store(true, Ordering::SeqCst);
        let (engine, db, store) = engine_with(gateway.clone()).await;
        let now = Utc::now();

        engine.process(burst_events(7, now), now + chrono::Duration::seconds(1)).await;

        assert!(!store.is_flagged(1, 7));
        assert!(gateway
            .calls()
            .iter()
            .all(|c| !matches!(c, GatewayCall::ReviewAlert { .. })));
        let reviews = entity::prelude::ReviewRecord::find().all(&db).await.unwrap();
        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn alert_failure_rolls_back_containment() {
        let gateway = Arc::new(RecordingGateway::new());
        gateway.fail_alerts.store(u32::MAX, Ordering::SeqCst);
        let (engine, db, store) = engine_with(gateway.clone()).await;
        let now = Utc::now();

        engine.process(burst_events(7, now), now + chrono::Duration::seconds(1)).await;

        assert!(!store.is_flagged(1, 7));
        let calls = gateway.calls();
        assert!(calls.contains(&GatewayCall::Unmute {
            realm_id: 1,
            actor_id: 7
        }));
        assert!(calls.contains(&GatewayCall::OpsAlert));
        let reviews = entity::prelude::ReviewRecord::find().all(&db).await.unwrap();
        assert!(reviews.is_empty());
        let mutes = entity::prelude::MuteRecord::find().all(&db).await.unwrap();
        assert!(mutes.is_empty());
    }
}
