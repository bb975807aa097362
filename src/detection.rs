use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::model::activity::ActivityRecord;
use crate::tracking::TrackingStore;

/// Maximum sample fingerprints carried into a detection result for the
/// staff alert.
const MAX_SAMPLES: usize = 5;

/// Thresholds for the burst heuristics.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Sliding window the heuristics evaluate over.
    pub window: Duration,
    /// Messages in one channel within the window to count as a burst.
    pub same_channel_burst: usize,
    /// Distinct channels posted to within the window to count as a spread.
    pub channel_spread: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window: Duration::seconds(5),
            same_channel_burst: 10,
            channel_spread: 10,
        }
    }
}

/// A spam pattern matched for one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionResult {
    /// Rapid posting concentrated in one channel.
    SameChannelBurst {
        channel_id: u64,
        count: usize,
        samples: Vec<String>,
    },
    /// Rapid posting spread across many channels.
    MultiChannelBurst {
        distinct_channels: usize,
        total: usize,
        samples: Vec<String>,
    },
}

impl DetectionResult {
    /// Stable identifier persisted on the review record.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SameChannelBurst { .. } => "same_channel",
            Self::MultiChannelBurst { .. } => "multiple_channels",
        }
    }

    pub fn samples(&self) -> &[String] {
        match self {
            Self::SameChannelBurst { samples, .. } => samples,
            Self::MultiChannelBurst { samples, .. } => samples,
        }
    }
}

/// Evaluates the actor's recent activity against both burst heuristics.
///
/// The same-channel check wins when both thresholds are crossed by the same
/// window of activity. Fewer than two recent entries can never match, so a
/// single message is never flagged regardless of thresholds.
///
/// # Arguments
/// - `store` - Tracking store holding the actor's activity log
/// - `realm_id` / `actor_id` - Actor under evaluation
/// - `now` - Upper bound of the sliding window
/// - `config` - Threshold configuration
///
/// # Returns
/// - `Some(DetectionResult)` - A pattern matched
/// - `None` - Activity looks normal
pub fn evaluate(
    store: &TrackingStore,
    realm_id: u64,
    actor_id: u64,
    now: DateTime<Utc>,
    config: &DetectionConfig,
) -> Option<DetectionResult> {
    let recent = store.recent(realm_id, actor_id, now, config.window);
    if recent.len() < 2 {
        return None;
    }

    let mut per_channel: HashMap<u64, usize> = HashMap::new();
    for record in &recent {
        *per_channel.entry(record.channel_id).or_insert(0) += 1;
    }

    if let Some((&channel_id, &count)) = per_channel
        .iter()
        .max_by_key(|(_, count)| **count)
        .filter(|(_, count)| **count >= config.same_channel_burst)
    {
        // Samples come from the bursting channel only.
        return Some(DetectionResult::SameChannelBurst {
            channel_id,
            count,
            samples: collect_samples(recent.iter().filter(|r| r.channel_id == channel_id)),
        });
    }

    if per_channel.len() >= config.channel_spread {
        return Some(DetectionResult::MultiChannelBurst {
            distinct_channels: per_channel.len(),
            total: recent.len(),
            samples: collect_samples(recent.iter()),
        });
    }

    None
}

/// Most recent fingerprints first, capped at [`MAX_SAMPLES`].
fn collect_samples<'a, I>(records: I) -> Vec<String>
where
    I: DoubleEndedIterator<Item = &'a ActivityRecord>,
{
    records
        .rev()
        .take(MAX_SAMPLES)
        .map(|record| record.content_fingerprint.clone())
        .collect()
}
