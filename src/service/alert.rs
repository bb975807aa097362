//! Message text for staff alerts, actor notices, and audit entries.
//!
//! Everything here is pure string building so the wording is covered by
//! plain unit tests and the gateway only deals with delivery.

use chrono::{DateTime, Utc};

use crate::detection::DetectionResult;
use crate::model::review::ReviewOutcome;

/// Content of a staff review alert, rendered into an embed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertContent {
    pub title: String,
    pub description: String,
}

/// Builds the staff alert for a fresh detection.
///
/// # Arguments
/// - `actor_id`: Contained actor
/// - `detection`: The matched pattern, including sample fingerprints
/// - `expires_at`: When the default action fires if staff do not act
pub fn review_alert(
    actor_id: u64,
    detection: &DetectionResult,
    expires_at: DateTime<Utc>,
) -> AlertContent {
    let pattern_line = match detection {
        DetectionResult::SameChannelBurst {
            channel_id, count, ..
        } => format!("{count} messages in <#{channel_id}> within the detection window"),
        DetectionResult::MultiChannelBurst {
            distinct_channels,
            total,
            ..
        } => format!("{total} messages across {distinct_channels} channels within the detection window"),
    };

    let mut description = format!(
        "<@{actor_id}> has been muted automatically.\n\n**Pattern**: {pattern_line}\n"
    );

    let samples = detection.samples();
    if !samples.is_empty() {
        description.push_str("\n**Recent messages**:\n");
        for sample in samples {
            description.push_str(&format!("> {sample}\n"));
        }
    }

    description.push_str(&format!(
        "\nWithout staff action the mute is extended by the default duration <t:{}:R>.",
        expires_at.timestamp()
    ));

    AlertContent {
        title: "Spam detected".to_string(),
        description,
    }
}

/// DM sent to the actor when containment is applied.
pub fn actor_notice() -> String {
    "You have been temporarily muted for sending messages too quickly. \
     A staff member will review the mute shortly."
        .to_string()
}

/// DM sent to the actor just before a ban lands.
pub fn ban_notice() -> String {
    "You have been banned for spamming after staff review.".to_string()
}

/// Staff channel notice for the expiry default action.
pub fn default_action_notice(actor_id: u64, unmute_at: DateTime<Utc>) -> String {
    format!(
        "Review of <@{actor_id}> expired without staff action; the mute was \
         extended and lifts <t:{}:R>.",
        unmute_at.timestamp()
    )
}

/// One-line summary of a terminal resolution, used for the alert update and
/// the audit log.
pub fn resolution_summary(
    outcome: ReviewOutcome,
    actor_id: u64,
    reviewer_id: Option<u64>,
) -> String {
    let verdict = match outcome {
        ReviewOutcome::LiftedFalsePositive => format!("mute of <@{actor_id}> lifted (false positive)"),
        ReviewOutcome::ConfirmedExtended => format!("mute of <@{actor_id}> confirmed and extended"),
        ReviewOutcome::Banned => format!("<@{actor_id}> banned for confirmed spam"),
        ReviewOutcome::ExpiredDefaultApplied => {
            format!("review of <@{actor_id}> expired, mute extended by default")
        }
    };

    match reviewer_id {
        Some(reviewer_id) => format!("Resolved by <@{reviewer_id}>: {verdict}."),
        None => format!("Resolved automatically: {verdict}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_alert_names_the_channel_and_count() {
        let detection = DetectionResult::SameChannelBurst {
            channel_id: 42,
            count: 12,
            samples: vec!["buy now".to_string()],
        };
        let alert = review_alert(7, &detection, Utc::now());

        assert!(alert.description.contains("12 messages in <#42>"));
        assert!(alert.description.contains("> buy now"));
        assert!(alert.description.contains("<@7>"));
    }

    #[test]
    fn spread_alert_names_the_channel_count() {
        let detection = DetectionResult::MultiChannelBurst {
            distinct_channels: 10,
            total: 11,
            samples: vec![],
        };
        let alert = review_alert(7, &detection, Utc::now());

        assert!(alert.description.contains("11 messages across 10 channels"));
        assert!(!alert.description.contains("Recent messages"));
    }

    #[test]
    fn summaries_distinguish_reviewer_from_automatic() {
        let manual = resolution_summary(ReviewOutcome::Banned, 7, Some(99));
        assert!(manual.contains("<@99>"));
        assert!(manual.contains("<@7> banned"));

        let automatic = resolution_summary(ReviewOutcome::ExpiredDefaultApplied, 7, None);
        assert!(automatic.starts_with("Resolved automatically"));
    }
}
