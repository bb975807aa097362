use serenity::all::{Channel, ChannelId, Context, Message};
use tracing::debug;

use crate::bot::handler::Handler;
use crate::model::activity::ActivityEvent;

/// Handle message creation in a channel.
///
/// Filters out everything detection should never see, then submits the rest
/// to the ingest queue. This path runs on the gateway dispatch task and must
/// never block; the queue submit is non-blocking by construction.
pub async fn handle_message(handler: &Handler, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    // Only track messages in guild channels (not DMs)
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let realm_id = guild_id.get();
    let actor_id = message.author.id.get();

    // Already under escalation; nothing new to learn until the review closes
    if handler.store.is_flagged(realm_id, actor_id) {
        return;
    }

    if let Some(member) = &message.member {
        if let Some(role_id) = handler.config.whitelisted_role_id {
            if member.roles.iter().any(|r| r.get() == role_id) {
                return;
            }
        }
        // Actors already muted cannot usefully be re-escalated
        if member.roles.iter().any(|r| r.get() == handler.config.mute_role_id) {
            return;
        }
    }

    if let Some(category_id) = handler.config.whitelisted_category_id {
        if channel_category(&ctx, message.channel_id).await == Some(category_id) {
            return;
        }
    }

    handler.queue.submit(ActivityEvent {
        actor_id,
        realm_id,
        channel_id: message.channel_id.get(),
        content: message.content.clone(),
        timestamp: message.timestamp.to_utc(),
    });
}

/// Resolves a channel's parent category, treating lookup failures as
/// uncategorized.
async fn channel_category(ctx: &Context, channel_id: ChannelId) -> Option<u64> {
    match channel_id.to_channel(ctx).await {
        Ok(Channel::Guild(channel)) => channel.parent_id.map(|id| id.get()),
        Ok(_) => None,
        Err(error) => {
            debug!("Could not resolve channel {}: {}", channel_id, error);
            None
        }
    }
}
