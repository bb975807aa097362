use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Interaction, Message, Ready};
use serenity::async_trait;

use crate::config::Config;
use crate::ingest::IngestQueue;
use crate::service::confirmation::ConfirmationProtocol;
use crate::service::gateway::ModerationGateway;
use crate::tracking::TrackingStore;

pub mod interaction;
pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub queue: IngestQueue,
    pub gateway: Arc<dyn ModerationGateway>,
    pub store: Arc<TrackingStore>,
    pub protocol: Arc<ConfirmationProtocol>,
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(self, ctx, message).await;
    }

    /// Called for button presses on staff alerts and confirmation prompts
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(self, ctx, interaction).await;
    }
}
