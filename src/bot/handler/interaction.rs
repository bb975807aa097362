use chrono::Utc;
use serenity::all::{
    ButtonStyle, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, Interaction, Permissions,
};
use tracing::{debug, error};

use crate::bot::handler::Handler;
use crate::model::review::{Resolution, ReviewAction, ReviewOutcome};
use crate::service::gateway::BUTTON_PREFIX;
use crate::service::review::ReviewService;

/// Handle component interactions on staff alerts.
///
/// Action buttons (`spamguard:lift|confirm|ban`) open an ephemeral two-step
/// confirmation prompt; the prompt's yes/no buttons carry the confirmation
/// token. The review ID is the alert message's own ID, so the buttons need
/// no payload of their own.
pub async fn handle_interaction(handler: &Handler, ctx: Context, interaction: Interaction) {
    let Interaction::Component(comp) = interaction else {
        return;
    };

    let Some(rest) = comp.data.custom_id.strip_prefix(&format!("{BUTTON_PREFIX}:")) else {
        return;
    };

    if let Some(action) = ReviewAction::parse(rest) {
        handle_action_request(handler, &ctx, &comp, action).await;
    } else if let Some(token) = rest.strip_prefix("yes:") {
        handle_confirm(handler, &ctx, &comp, token).await;
    } else if let Some(token) = rest.strip_prefix("no:") {
        handle_cancel(handler, &ctx, &comp, token).await;
    } else {
        debug!("Unknown component custom id: {}", comp.data.custom_id);
    }
}

/// First step: permission gate, then an ephemeral confirmation prompt.
async fn handle_action_request(
    handler: &Handler,
    ctx: &Context,
    comp: &ComponentInteraction,
    action: ReviewAction,
) {
    let permissions = comp
        .member
        .as_ref()
        .and_then(|m| m.permissions)
        .unwrap_or(Permissions::empty());

    let allowed = match action {
        ReviewAction::Ban => permissions.ban_members(),
        ReviewAction::Lift | ReviewAction::Confirm => permissions.moderate_members(),
    };
    if !allowed {
        let needed = match action {
            ReviewAction::Ban => "Ban Members",
            ReviewAction::Lift | ReviewAction::Confirm => "Moderate Members",
        };
        respond(ctx, comp, format!("You need the {needed} permission for this action.")).await;
        return;
    }

    let review_id = comp.message.id.get();
    let reviewer_id = comp.user.id.get();
    let token = handler
        .protocol
        .request(review_id, action, reviewer_id, Utc::now());

    let prompt = match action {
        ReviewAction::Lift => "Lift this mute as a false positive?",
        ReviewAction::Confirm => "Confirm the mute and extend it?",
        ReviewAction::Ban => "Ban this user?",
    };
    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(format!("{BUTTON_PREFIX}:yes:{token}"))
            .label("Yes")
            .style(ButtonStyle::Danger),
        CreateButton::new(format!("{BUTTON_PREFIX}:no:{token}"))
            .label("No")
            .style(ButtonStyle::Secondary),
    ]);

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(prompt)
            .components(vec![buttons])
            .ephemeral(true),
    );
    if let Err(e) = comp.create_response(&ctx.http, response).await {
        error!("Failed to send confirmation prompt: {}", e);
    }
}

/// Second step: consume the token and resolve the review.
async fn handle_confirm(handler: &Handler, ctx: &Context, comp: &ComponentInteraction, token: &str) {
    let reviewer_id = comp.user.id.get();
    let now = Utc::now();

    let Some(pending) = handler.protocol.take(token, reviewer_id, now) else {
        respond(
            ctx,
            comp,
            "This confirmation has expired or belongs to another reviewer.".to_string(),
        )
        .await;
        return;
    };

    let service = ReviewService::new(
        &handler.db,
        handler.gateway.as_ref(),
        &handler.store,
        &handler.config.review,
    );

    let content = match service
        .resolve(pending.review_id, pending.action, reviewer_id, now)
        .await
    {
        Ok(Resolution::Applied(ReviewOutcome::LiftedFalsePositive)) => {
            "Mute lifted.".to_string()
        }
        Ok(Resolution::Applied(ReviewOutcome::ConfirmedExtended)) => {
            "Mute confirmed and extended.".to_string()
        }
        Ok(Resolution::Applied(ReviewOutcome::Banned)) => "User banned.".to_string(),
        Ok(Resolution::Applied(ReviewOutcome::ExpiredDefaultApplied)) => {
            // Manual resolution never produces this outcome.
            "Review closed.".to_string()
        }
        Ok(Resolution::AlreadyResolved) => "This review was already resolved.".to_string(),
        Err(error) => {
            error!(
                "Failed to resolve review {}: {}",
                pending.review_id, error
            );
            "The action could not be applied; check the bot's permissions.".to_string()
        }
    };

    respond(ctx, comp, content).await;
}

async fn handle_cancel(handler: &Handler, ctx: &Context, comp: &ComponentInteraction, token: &str) {
    let cancelled = handler.protocol.cancel(token, comp.user.id.get());
    let content = if cancelled {
        "Cancelled, the review stays pending."
    } else {
        "Nothing to cancel."
    };
    respond(ctx, comp, content.to_string()).await;
}

async fn respond(ctx: &Context, comp: &ComponentInteraction, content: String) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    if let Err(error) = comp.create_response(&ctx.http, response).await {
        error!("Failed to respond to interaction: {}", error);
    }
}
