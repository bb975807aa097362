//! Discord bot integration.
//!
//! The bot feeds guild messages into the ingest queue and services the
//! review buttons on staff alerts. It runs on the main task while the drain
//! loop and schedulers run alongside it; the gateway services share a
//! separate HTTP client so moderation actions do not depend on the gateway
//! connection.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Channel metadata for category whitelisting
//! - `GUILD_MESSAGES` - Message events to track
//! - `MESSAGE_CONTENT` - Message text for content fingerprints (privileged
//!   intent, must be enabled in the Discord Developer Portal)

pub mod handler;
pub mod start;
