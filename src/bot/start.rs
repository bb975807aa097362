use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents};
use tracing::info;

use crate::bot::handler::Handler;
use crate::config::Config;
use crate::error::AppError;
use crate::ingest::IngestQueue;
use crate::service::confirmation::ConfirmationProtocol;
use crate::service::gateway::ModerationGateway;
use crate::tracking::TrackingStore;

/// Builds and runs the Discord client. Blocks until shutdown.
///
/// # Arguments
/// - `config`: Application configuration
/// - `db`: Database connection
/// - `queue`: Ingest queue producer for the message handler
/// - `gateway`: Moderation gateway shared with the review services
/// - `store`: Tracking store
/// - `protocol`: Two-step confirmation state shared across interactions
pub async fn start_bot(
    config: Arc<Config>,
    db: DatabaseConnection,
    queue: IngestQueue,
    gateway: Arc<dyn ModerationGateway>,
    store: Arc<TrackingStore>,
    protocol: Arc<ConfirmationProtocol>,
) -> Result<(), AppError> {
    // MESSAGE_CONTENT is a privileged intent - must be enabled in the
    // Discord Developer Portal
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        db,
        config: config.clone(),
        queue,
        gateway,
        store,
        protocol,
    };

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    info!("Starting Discord bot...");

    // Start the bot (this blocks until shutdown)
    client.start().await?;

    Ok(())
}
