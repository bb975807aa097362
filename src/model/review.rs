use chrono::{DateTime, Utc};

/// Parameters for creating a pending review record.
///
/// # Fields
/// - `review_id`: Discord message ID of the staff alert (1:1 with the review)
/// - `actor_id`: Discord ID of the contained user
/// - `realm_id`: Discord guild ID the containment is scoped to
/// - `created_at` / `expires_at`: review window boundaries
/// - `pattern_kind`: stable identifier of the detected pattern
pub struct CreateReviewRecordParam {
    pub review_id: u64,
    pub actor_id: u64,
    pub realm_id: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub pattern_kind: String,
}

/// A resolution action a reviewer can request on a pending review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// False positive: remove the containment.
    Lift,
    /// Confirmed spam: keep the mute for the default duration.
    Confirm,
    /// Confirmed spam, severe: ban the actor.
    Ban,
}

impl ReviewAction {
    /// Stable identifier used in button custom IDs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lift => "lift",
            Self::Confirm => "confirm",
            Self::Ban => "ban",
        }
    }

    /// Parses the identifier produced by [`Self::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lift" => Some(Self::Lift),
            "confirm" => Some(Self::Confirm),
            "ban" => Some(Self::Ban),
            _ => None,
        }
    }
}

/// Terminal state a review reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    LiftedFalsePositive,
    ConfirmedExtended,
    Banned,
    ExpiredDefaultApplied,
}

/// Result of attempting to resolve a review.
///
/// `AlreadyResolved` is the expected outcome for the loser of a race between
/// two reviewers, or between a reviewer and the reconciliation loop; it is a
/// user-visible no-op, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied(ReviewOutcome),
    AlreadyResolved,
}
