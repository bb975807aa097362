use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::model::review::ReviewAction;

/// A requested resolution waiting for its second confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub review_id: u64,
    pub action: ReviewAction,
    pub reviewer_id: u64,
    pub expires_at: DateTime<Utc>,
}

/// Two-step confirmation for review resolutions.
///
/// A reviewer pressing an action button receives a token bound to them with
/// a short TTL; only presenting that token back within the TTL performs the
/// action. Cancelling or letting the token lapse leaves the review pending
/// with no state change. Tokens are process-local, matching the lifetime of
/// the button interactions that carry them.
pub struct ConfirmationProtocol {
    ttl: Duration,
    counter: AtomicU64,
    pending: Mutex<HashMap<String, PendingAction>>,
}

impl ConfirmationProtocol {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            counter: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a requested action and returns its confirmation token.
    ///
    /// Expired tokens are pruned here so the map cannot grow past the set of
    /// confirmations requested within one TTL.
    pub fn request(
        &self,
        review_id: u64,
        action: ReviewAction,
        reviewer_id: u64,
        now: DateTime<Utc>,
    ) -> String {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|_, entry| entry.expires_at > now);

        let token = format!(
            "{review_id}-{}",
            self.counter.fetch_add(1, Ordering::Relaxed)
        );
        pending.insert(
            token.clone(),
            PendingAction {
                review_id,
                action,
                reviewer_id,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Consumes a token, returning the pending action it confirmed.
    ///
    /// Returns `None` for unknown or expired tokens and for a reviewer other
    /// than the one who requested the action (the token stays live for its
    /// owner in that case).
    pub fn take(
        &self,
        token: &str,
        reviewer_id: u64,
        now: DateTime<Utc>,
    ) -> Option<PendingAction> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());

        let entry = pending.get(token)?;
        if entry.expires_at <= now {
            pending.remove(token);
            return None;
        }
        if entry.reviewer_id != reviewer_id {
            return None;
        }
        pending.remove(token)
    }

    /// Discards a token without acting on it. Returns whether anything was
    /// cancelled.
    pub fn cancel(&self, token: &str, reviewer_id: u64) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.get(token).is_some_and(|e| e.reviewer_id == reviewer_id) {
            pending.remove(token);
            return true;
        }
        false
    }
}
