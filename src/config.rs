use chrono::Duration;

use crate::detection::DetectionConfig;
use crate::error::{config::ConfigError, AppError};

/// Application configuration loaded from the environment.
///
/// Required variables: `DATABASE_URL`, `DISCORD_BOT_TOKEN`, `MUTE_ROLE_ID`,
/// `STAFF_CHANNEL_ID`. Everything else is optional or has a compiled
/// default matching the detection heuristics' reference values.
pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    /// Role applied as containment.
    pub mute_role_id: u64,
    /// Review surface: channel where staff alerts are posted.
    pub staff_channel_id: u64,
    /// Actors holding this role are never tracked.
    pub whitelisted_role_id: Option<u64>,
    /// Messages in channels under this category are never tracked.
    pub whitelisted_category_id: Option<u64>,
    /// Operational alerts (retry exhaustion etc.), distinct from the review surface.
    pub ops_alert_channel_id: Option<u64>,
    /// Moderation audit log channel.
    pub audit_log_channel_id: Option<u64>,

    pub detection: DetectionConfig,
    pub queue: QueueSettings,
    pub review: ReviewSettings,
    pub tracking: TrackingSettings,
}

/// Ingest queue sizing and drain pacing.
#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Bounded queue capacity; events past this are dropped with a warning.
    pub capacity: usize,
    /// Maximum events processed per drain tick.
    pub drain_batch: usize,
    /// Drain tick interval.
    pub tick: std::time::Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            capacity: 1024,
            drain_batch: 10,
            tick: std::time::Duration::from_millis(100),
        }
    }
}

/// Review lifecycle timing.
#[derive(Debug, Clone)]
pub struct ReviewSettings {
    /// How long staff have before the default action fires.
    pub deadline: Duration,
    /// Mute duration applied by confirmation or the default action.
    pub default_mute: Duration,
    /// How long a two-step confirmation prompt stays valid.
    pub confirmation_ttl: Duration,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            deadline: Duration::hours(12),
            default_mute: Duration::days(1),
            confirmation_ttl: Duration::seconds(30),
        }
    }
}

/// In-memory tracking retention.
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    /// Per-actor log cap; oldest entries are dropped past this.
    pub max_entries: usize,
    /// Entries older than this are purged by the periodic sweep.
    pub max_age: Duration,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            max_entries: 50,
            max_age: Duration::seconds(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let detection = DetectionConfig {
            window: Duration::seconds(env_or("SPAM_WINDOW_SECONDS", 5)?),
            same_channel_burst: env_or("SPAM_BURST_COUNT", 10)?,
            channel_spread: env_or("SPAM_CHANNEL_SPREAD", 10)?,
        };

        let queue = QueueSettings {
            capacity: env_or("INGEST_QUEUE_CAPACITY", 1024)?,
            drain_batch: env_or("INGEST_DRAIN_BATCH", 10)?,
            tick: std::time::Duration::from_millis(env_or("INGEST_TICK_MS", 100)?),
        };

        let review = ReviewSettings {
            deadline: Duration::hours(env_or("REVIEW_DEADLINE_HOURS", 12)?),
            default_mute: Duration::hours(env_or("DEFAULT_MUTE_HOURS", 24)?),
            confirmation_ttl: Duration::seconds(env_or("CONFIRMATION_TTL_SECONDS", 30)?),
        };

        let tracking = TrackingSettings {
            max_entries: env_or("TRACKING_MAX_ENTRIES", 50)?,
            max_age: Duration::seconds(env_or("TRACKING_MAX_AGE_SECONDS", 10)?),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            mute_role_id: required_parsed("MUTE_ROLE_ID")?,
            staff_channel_id: required_parsed("STAFF_CHANNEL_ID")?,
            whitelisted_role_id: optional_parsed("WHITELISTED_ROLE_ID")?,
            whitelisted_category_id: optional_parsed("WHITELISTED_CATEGORY_ID")?,
            ops_alert_channel_id: optional_parsed("OPS_ALERT_CHANNEL_ID")?,
            audit_log_channel_id: optional_parsed("AUDIT_LOG_CHANNEL_ID")?,
            detection,
            queue,
            review,
            tracking,
        })
    }
}

fn required(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()).into())
}

fn required_parsed<T: std::str::FromStr>(name: &str) -> Result<T, AppError> {
    let value = required(name)?;
    value.parse::<T>().map_err(|_| {
        ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }
        .into()
    })
}

fn optional_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match std::env::var(name) {
        Err(_) => Ok(None),
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| {
                ConfigError::InvalidEnvVar {
                    name: name.to_string(),
                    value,
                }
                .into()
            }),
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    Ok(optional_parsed(name)?.unwrap_or(default))
}
