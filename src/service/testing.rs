//! Recording fake of the moderation gateway for service tests.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use serenity::async_trait;

use crate::error::AppError;
use crate::service::alert::AlertContent;
use crate::service::gateway::ModerationGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Mute { realm_id: u64, actor_id: u64 },
    Unmute { realm_id: u64, actor_id: u64 },
    Ban { realm_id: u64, actor_id: u64 },
    DirectMessage { actor_id: u64 },
    ReviewAlert { review_id: u64 },
    ReviewAlertUpdated { review_id: u64 },
    StaffNotice,
    OpsAlert,
    AuditLog,
}

/// In-memory [`ModerationGateway`] that records every call and can be told
/// to fail specific operations.
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    next_review_id: AtomicU64,
    /// Mute attempts fail with `PermissionDenied` while set.
    pub deny_mute: AtomicBool,
    /// Ban attempts fail with `PermissionDenied` while set.
    pub deny_ban: AtomicBool,
    /// Remaining alert posts that fail transiently.
    pub fail_alerts: AtomicU32,
    /// DMs fail while set (closed DMs).
    pub fail_dm: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_review_id: AtomicU64::new(900_000),
            deny_mute: AtomicBool::new(false),
            deny_ban: AtomicBool::new(false),
            fail_alerts: AtomicU32::new(0),
            fail_dm: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_review_id(&self) -> u64 {
        self.next_review_id.load(Ordering::SeqCst) - 1
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_alert_failure(&self) -> bool {
        self.fail_alerts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ModerationGateway for RecordingGateway {
    async fn mute(&self, realm_id: u64, actor_id: u64, _reason: &str) -> Result<(), AppError> {
        if self.deny_mute.load(Ordering::SeqCst) {
            return Err(AppError::PermissionDenied("add mute role".to_string()));
        }
        self.record(GatewayCall::Mute { realm_id, actor_id });
        Ok(())
    }

    async fn unmute(&self, realm_id: u64, actor_id: u64, _reason: &str) -> Result<(), AppError> {
        self.record(GatewayCall::Unmute { realm_id, actor_id });
        Ok(())
    }

    async fn ban(&self, realm_id: u64, actor_id: u64, _reason: &str) -> Result<(), AppError> {
        if self.deny_ban.load(Ordering::SeqCst) {
            return Err(AppError::PermissionDenied("ban member".to_string()));
        }
        self.record(GatewayCall::Ban { realm_id, actor_id });
        Ok(())
    }

    async fn direct_message(&self, actor_id: u64, _content: &str) -> Result<(), AppError> {
        if self.fail_dm.load(Ordering::SeqCst) {
            return Err(AppError::DeliveryFailed("dm closed".to_string()));
        }
        self.record(GatewayCall::DirectMessage { actor_id });
        Ok(())
    }

    async fn post_review_alert(&self, _alert: &AlertContent) -> Result<u64, AppError> {
        if self.take_alert_failure() {
            return Err(AppError::DeliveryFailed("alert post failed".to_string()));
        }
        let review_id = self.next_review_id.fetch_add(1, Ordering::SeqCst);
        self.record(GatewayCall::ReviewAlert { review_id });
        Ok(review_id)
    }

    async fn update_review_alert(&self, review_id: u64, _summary: &str) -> Result<(), AppError> {
        self.record(GatewayCall::ReviewAlertUpdated { review_id });
        Ok(())
    }

    async fn post_staff_notice(&self, _content: &str) -> Result<(), AppError> {
        self.record(GatewayCall::StaffNotice);
        Ok(())
    }

    async fn post_ops_alert(&self, _content: &str) -> Result<(), AppError> {
        self.record(GatewayCall::OpsAlert);
        Ok(())
    }

    async fn audit_log(&self, _entry: &str) -> Result<(), AppError> {
        self.record(GatewayCall::AuditLog);
        Ok(())
    }
}
