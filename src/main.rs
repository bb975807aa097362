mod bot;
mod config;
mod data;
mod detection;
mod error;
mod ingest;
mod model;
mod scheduler;
mod service;
mod startup;
mod tracking;

use std::sync::Arc;

use chrono::Utc;
use serenity::http::Http;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::service::confirmation::ConfirmationProtocol;
use crate::service::escalation::EscalationEngine;
use crate::service::gateway::{DiscordGateway, ModerationGateway};
use crate::service::retry::RetryPolicy;
use crate::tracking::TrackingStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    let db = startup::connect_to_database(&config).await?;

    let store = Arc::new(TrackingStore::new(config.tracking.clone()));
    startup::reseed_flagged(&db, &store).await?;

    // Dedicated HTTP client for moderation actions, independent of the
    // gateway connection the event handlers run on.
    let http = Arc::new(Http::new(&config.discord_bot_token));
    let gateway: Arc<dyn ModerationGateway> = Arc::new(DiscordGateway::new(http, &config));

    let (queue, mut receiver) = ingest::channel(config.queue.capacity);
    let protocol = Arc::new(ConfirmationProtocol::new(config.review.confirmation_ttl));

    info!("Starting spamguard");

    // Ingest drain loop: a fixed tick pulling bounded batches off the queue
    let engine = EscalationEngine::new(
        db.clone(),
        gateway.clone(),
        store.clone(),
        config.detection.clone(),
        config.review.clone(),
        RetryPolicy::default(),
    );
    let drain_batch = config.queue.drain_batch;
    let tick = config.queue.tick;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let events = receiver.drain(drain_batch);
            if !events.is_empty() {
                engine.process(events, Utc::now()).await;
            }
        }
    });

    scheduler::review_expiry::start_scheduler(
        db.clone(),
        gateway.clone(),
        store.clone(),
        config.review.clone(),
    )
    .await?;
    scheduler::tracking_sweep::start_scheduler(store.clone()).await?;

    bot::start::start_bot(config, db, queue, gateway, store, protocol).await
}
