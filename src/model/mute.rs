use chrono::{DateTime, Utc};

/// Parameters for creating or overwriting a mute record.
///
/// Upserting with a later `unmute_at` is how both staff confirmation and the
/// expiry default action extend an existing mute.
pub struct UpsertMuteRecordParam {
    pub actor_id: u64,
    pub realm_id: u64,
    pub unmute_at: DateTime<Utc>,
}
