use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::config::TrackingSettings;
use crate::model::activity::{ActivityEvent, ActivityRecord};

/// In-memory per-actor activity logs plus the flagged-actor set.
///
/// All state is process-local and rebuilt from scratch on restart (the
/// flagged set is re-seeded from pending review records at startup). Both
/// maps are keyed by `(realm_id, actor_id)` so the same user in two guilds
/// is tracked independently.
pub struct TrackingStore {
    settings: TrackingSettings,
    logs: Mutex<HashMap<(u64, u64), VecDeque<ActivityRecord>>>,
    flagged: Mutex<HashSet<(u64, u64)>>,
}

impl TrackingStore {
    pub fn new(settings: TrackingSettings) -> Self {
        Self {
            settings,
            logs: Mutex::new(HashMap::new()),
            flagged: Mutex::new(HashSet::new()),
        }
    }

    /// Appends an event to the actor's log, evicting the oldest entry when
    /// the per-actor cap is reached.
    pub fn record(&self, event: &ActivityEvent) {
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        let log = logs
            .entry((event.realm_id, event.actor_id))
            .or_insert_with(|| VecDeque::with_capacity(self.settings.max_entries));

        if log.len() == self.settings.max_entries {
            log.pop_front();
        }
        log.push_back(ActivityRecord::from_event(event));
    }

    /// Returns the actor's entries with timestamps within `window` of `now`,
    /// oldest first.
    pub fn recent(
        &self,
        realm_id: u64,
        actor_id: u64,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Vec<ActivityRecord> {
        let cutoff = now - window;
        let logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        logs.get(&(realm_id, actor_id))
            .map(|log| {
                log.iter()
                    .filter(|record| record.timestamp >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Purges entries older than the configured max age and drops actors
    /// whose logs become empty. Returns the number of entries removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.settings.max_age;
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());

        let mut removed = 0;
        logs.retain(|_, log| {
            while log.front().is_some_and(|record| record.timestamp < cutoff) {
                log.pop_front();
                removed += 1;
            }
            !log.is_empty()
        });
        removed
    }

    /// Marks an actor as flagged. Returns false if they already were, which
    /// makes the check-and-set atomic for concurrent detections.
    pub fn flag(&self, realm_id: u64, actor_id: u64) -> bool {
        let mut flagged = self.flagged.lock().unwrap_or_else(|e| e.into_inner());
        flagged.insert((realm_id, actor_id))
    }

    /// Clears an actor's flag once their review record is resolved.
    pub fn unflag(&self, realm_id: u64, actor_id: u64) {
        let mut flagged = self.flagged.lock().unwrap_or_else(|e| e.into_inner());
        flagged.remove(&(realm_id, actor_id));
    }

    pub fn is_flagged(&self, realm_id: u64, actor_id: u64) -> bool {
        let flagged = self.flagged.lock().unwrap_or_else(|e| e.into_inner());
        flagged.contains(&(realm_id, actor_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(actor_id: u64, channel_id: u64, timestamp: DateTime<Utc>) -> ActivityEvent {
        ActivityEvent {
            actor_id,
            realm_id: 1,
            channel_id,
            content: "hello".to_string(),
            timestamp,
        }
    }

    fn store() -> TrackingStore {
        TrackingStore::new(TrackingSettings::default())
    }

    #[test]
    fn caps_per_actor_log_at_max_entries() {
        let store = store();
        let now = Utc::now();

        for i in 0..60 {
            store.record(&event(7, 1, now + Duration::milliseconds(i)));
        }

        let recent = store.recent(1, 7, now + Duration::seconds(1), Duration::seconds(5));
        assert_eq!(recent.len(), 50);
        // Oldest ten were evicted.
        assert_eq!(recent[0].timestamp, now + Duration::milliseconds(10));
    }

    #[test]
    fn recent_excludes_entries_outside_window() {
        let store = store();
        let now = Utc::now();

        store.record(&event(7, 1, now - Duration::seconds(6)));
        store.record(&event(7, 1, now - Duration::seconds(2)));
        store.record(&event(7, 1, now));

        let recent = store.recent(1, 7, now, Duration::seconds(5));
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn actors_are_scoped_per_realm() {
        let store = store();
        let now = Utc::now();

        let mut other_realm = event(7, 1, now);
        other_realm.realm_id = 2;
        store.record(&event(7, 1, now));
        store.record(&other_realm);

        assert_eq!(store.recent(1, 7, now, Duration::seconds(5)).len(), 1);
        assert_eq!(store.recent(2, 7, now, Duration::seconds(5)).len(), 1);
    }

    #[test]
    fn sweep_drops_stale_entries_and_empty_actors() {
        let store = store();
        let now = Utc::now();

        store.record(&event(7, 1, now - Duration::seconds(30)));
        store.record(&event(8, 1, now - Duration::seconds(30)));
        store.record(&event(8, 1, now));

        let removed = store.sweep(now);
        assert_eq!(removed, 2);
        assert!(store.recent(1, 7, now, Duration::seconds(60)).is_empty());
        assert_eq!(store.recent(1, 8, now, Duration::seconds(60)).len(), 1);
    }

    #[test]
    fn flag_is_check_and_set() {
        let store = store();

        assert!(store.flag(1, 7));
        assert!(!store.flag(1, 7));
        assert!(store.is_flagged(1, 7));

        store.unflag(1, 7);
        assert!(!store.is_flagged(1, 7));
        assert!(store.flag(1, 7));
    }
}
