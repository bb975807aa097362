use serenity::all::{ActivityData, Context, Ready};
use tracing::info;

/// Handle the bot coming online
pub async fn handle_ready(ctx: Context, ready: Ready) {
    info!("{} is connected to Discord!", ready.user.name);

    ctx.set_activity(Some(ActivityData::watching("for spam")));
}
