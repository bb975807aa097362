//! Application error types.
//!
//! This module provides the application's error hierarchy. The `AppError` enum
//! serves as the top-level error type that wraps infrastructure errors from
//! the database, Discord SDK, and scheduler, plus the domain failures the
//! escalation pipeline distinguishes between (permission denial vs. transient
//! delivery failure).

pub mod config;

use thiserror::Error;

use crate::error::config::ConfigError;

/// Top-level application error type.
///
/// Aggregates all error types that can occur in the application. Most
/// variants use `#[from]` for automatic conversion; the domain variants
/// (`PermissionDenied`, `DeliveryFailed`) are constructed explicitly where
/// the escalation pipeline needs to tell terminal failures from retryable
/// ones.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// The platform rejected a moderation action because the bot lacks the
    /// required permission or sits below the target in the role hierarchy.
    ///
    /// Terminal for the detection event that triggered it: retrying cannot
    /// help, and neither can a reviewer, since the bot itself is the one
    /// short on permissions.
    #[error("missing permission: {0}")]
    PermissionDenied(String),

    /// A delivery to the platform kept failing after bounded retries.
    #[error("delivery failed after retries: {0}")]
    DeliveryFailed(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Whether retrying the failed operation can possibly succeed.
    ///
    /// Permission denials and missing resources are terminal; everything
    /// else (network hiccups, 5xx responses, database contention) is worth
    /// another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::PermissionDenied(_) | Self::NotFound(_))
    }
}
