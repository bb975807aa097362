//! Seam to all Discord side effects.
//!
//! Escalation and review logic only talk to the [`ModerationGateway`] trait;
//! [`DiscordGateway`] is the production implementation over the shared
//! Serenity HTTP client and the configured role/channel IDs.

use std::sync::Arc;

use serenity::all::{
    ButtonStyle, ChannelId, CreateActionRow, CreateButton, CreateEmbed, CreateMessage,
    EditMessage, GuildId, MessageId, RoleId, UserId,
};
use serenity::async_trait;
use serenity::http::{Http, HttpError};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::service::alert::AlertContent;

/// Custom ID prefix for review action buttons.
pub const BUTTON_PREFIX: &str = "spamguard";

#[async_trait]
pub trait ModerationGateway: Send + Sync {
    /// Applies the containment mute to an actor.
    async fn mute(&self, realm_id: u64, actor_id: u64, reason: &str) -> Result<(), AppError>;

    /// Removes the containment mute from an actor.
    async fn unmute(&self, realm_id: u64, actor_id: u64, reason: &str) -> Result<(), AppError>;

    /// Bans an actor from the realm.
    async fn ban(&self, realm_id: u64, actor_id: u64, reason: &str) -> Result<(), AppError>;

    /// Sends a direct message to an actor. Callers treat failure as
    /// best-effort; actors with closed DMs are common.
    async fn direct_message(&self, actor_id: u64, content: &str) -> Result<(), AppError>;

    /// Posts the review alert with action buttons to the staff channel and
    /// returns the message ID, which becomes the review ID.
    async fn post_review_alert(&self, alert: &AlertContent) -> Result<u64, AppError>;

    /// Replaces the alert's buttons with a resolution summary.
    async fn update_review_alert(&self, review_id: u64, summary: &str) -> Result<(), AppError>;

    /// Posts a plain notice to the staff channel.
    async fn post_staff_notice(&self, content: &str) -> Result<(), AppError>;

    /// Posts to the operational alert channel (retry exhaustion and the
    /// like), falling back to a log line when none is configured.
    async fn post_ops_alert(&self, content: &str) -> Result<(), AppError>;

    /// Writes a moderation audit entry.
    async fn audit_log(&self, entry: &str) -> Result<(), AppError>;
}

pub struct DiscordGateway {
    http: Arc<Http>,
    mute_role_id: RoleId,
    staff_channel_id: ChannelId,
    ops_alert_channel_id: Option<ChannelId>,
    audit_log_channel_id: Option<ChannelId>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, config: &Config) -> Self {
        Self {
            http,
            mute_role_id: RoleId::new(config.mute_role_id),
            staff_channel_id: ChannelId::new(config.staff_channel_id),
            ops_alert_channel_id: config.ops_alert_channel_id.map(ChannelId::new),
            audit_log_channel_id: config.audit_log_channel_id.map(ChannelId::new),
        }
    }
}

/// Maps a Serenity error onto the domain taxonomy: 403 responses become
/// `PermissionDenied` (terminal), everything else stays a Discord error and
/// is considered transient by the retry helper.
fn classify(error: serenity::Error, action: &str) -> AppError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response)) = error {
        if response.status_code.as_u16() == 403 {
            return AppError::PermissionDenied(action.to_string());
        }
    }
    AppError::from(error)
}

#[async_trait]
impl ModerationGateway for DiscordGateway {
    async fn mute(&self, realm_id: u64, actor_id: u64, reason: &str) -> Result<(), AppError> {
        self.http
            .add_member_role(
                GuildId::new(realm_id),
                UserId::new(actor_id),
                self.mute_role_id,
                Some(reason),
            )
            .await
            .map_err(|e| classify(e, "add mute role"))
    }

    async fn unmute(&self, realm_id: u64, actor_id: u64, reason: &str) -> Result<(), AppError> {
        self.http
            .remove_member_role(
                GuildId::new(realm_id),
                UserId::new(actor_id),
                self.mute_role_id,
                Some(reason),
            )
            .await
            .map_err(|e| classify(e, "remove mute role"))
    }

    async fn ban(&self, realm_id: u64, actor_id: u64, reason: &str) -> Result<(), AppError> {
        GuildId::new(realm_id)
            .ban_with_reason(&self.http, UserId::new(actor_id), 0, reason)
            .await
            .map_err(|e| classify(e, "ban member"))
    }

    async fn direct_message(&self, actor_id: u64, content: &str) -> Result<(), AppError> {
        let channel = UserId::new(actor_id).create_dm_channel(&self.http).await?;
        channel.id.say(&self.http, content).await?;
        Ok(())
    }

    async fn post_review_alert(&self, alert: &AlertContent) -> Result<u64, AppError> {
        let embed = CreateEmbed::new()
            .title(&alert.title)
            .description(&alert.description)
            .color(0xe74c3c);

        let buttons = CreateActionRow::Buttons(vec![
            CreateButton::new(format!("{BUTTON_PREFIX}:lift"))
                .label("Lift (false positive)")
                .style(ButtonStyle::Success),
            CreateButton::new(format!("{BUTTON_PREFIX}:confirm"))
                .label("Confirm mute")
                .style(ButtonStyle::Primary),
            CreateButton::new(format!("{BUTTON_PREFIX}:ban"))
                .label("Ban")
                .style(ButtonStyle::Danger),
        ]);

        let message = self
            .staff_channel_id
            .send_message(
                &self.http,
                CreateMessage::new().embed(embed).components(vec![buttons]),
            )
            .await
            .map_err(|e| classify(e, "post staff alert"))?;

        Ok(message.id.get())
    }

    async fn update_review_alert(&self, review_id: u64, summary: &str) -> Result<(), AppError> {
        let edit = EditMessage::new()
            .content(summary.to_string())
            .components(vec![]);

        self.http
            .edit_message(
                self.staff_channel_id,
                MessageId::new(review_id),
                &edit,
                vec![],
            )
            .await
            .map_err(|e| classify(e, "update staff alert"))?;
        Ok(())
    }

    async fn post_staff_notice(&self, content: &str) -> Result<(), AppError> {
        self.staff_channel_id
            .say(&self.http, content)
            .await
            .map_err(|e| classify(e, "post staff notice"))?;
        Ok(())
    }

    async fn post_ops_alert(&self, content: &str) -> Result<(), AppError> {
        let Some(channel_id) = self.ops_alert_channel_id else {
            tracing::warn!("Ops alert (no channel configured): {}", content);
            return Ok(());
        };
        channel_id
            .say(&self.http, content)
            .await
            .map_err(|e| classify(e, "post ops alert"))?;
        Ok(())
    }

    async fn audit_log(&self, entry: &str) -> Result<(), AppError> {
        info!("Audit: {}", entry);
        if let Some(channel_id) = self.audit_log_channel_id {
            channel_id
                .say(&self.http, entry)
                .await
                .map_err(|e| classify(e, "post audit entry"))?;
        }
        Ok(())
    }
}
