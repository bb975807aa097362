use chrono::{DateTime, Utc};

/// Length of the content prefix stored per tracked message.
pub const FINGERPRINT_LEN: usize = 100;

/// An inbound message event as received from the platform gateway.
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    /// The user being evaluated for abusive behavior.
    pub actor_id: u64,
    /// The guild the activity happened in.
    pub realm_id: u64,
    /// The channel the message was posted to.
    pub channel_id: u64,
    /// Raw message content; only a fingerprint prefix is retained.
    pub content: String,
    /// Platform timestamp of the message.
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Whether the event carries the fields detection needs.
    ///
    /// Events without valid snowflakes are dropped at ingest rather than
    /// propagated to the detector.
    pub fn is_well_formed(&self) -> bool {
        self.actor_id != 0 && self.realm_id != 0 && self.channel_id != 0
    }
}

/// One entry in an actor's in-memory activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub timestamp: DateTime<Utc>,
    pub channel_id: u64,
    /// First [`FINGERPRINT_LEN`] characters of the message content.
    pub content_fingerprint: String,
}

impl ActivityRecord {
    /// Builds a record from an event, truncating the content to the
    /// fingerprint length on a character boundary.
    pub fn from_event(event: &ActivityEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            channel_id: event.channel_id,
            content_fingerprint: truncate_chars(&event.content, FINGERPRINT_LEN),
        }
    }
}

/// Truncates a string to at most `max` characters without splitting a char.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
