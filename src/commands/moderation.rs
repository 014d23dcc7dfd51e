use std::time::Duration;

use poise::serenity_prelude::{CreateEmbedFooter, Timestamp, UserId};
use poise::CreateReply;
use tracing::{debug, info};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::gateway;
use crate::constants::embeds;
use crate::constants::moderation::{
    CLEAR_NOTICE_SECONDS, DEFAULT_CLEAR_AMOUNT, NO_REASON, WARNINGS_SHOWN,
};
use crate::platform::OutgoingMessage;
use crate::services::moderation::actions;
use crate::services::moderation::mute_scheduler::{MuteRequest, UnmuteOutcome};
use crate::utils::formatting::{format_date, mention_user, truncate};

/// Discord's limit for an embed field value
const FIELD_LIMIT: usize = 1024;

/// Kick a member from the server
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "KICK_MEMBERS",
    category = "Moderation"
)]
pub async fn kick(
    ctx: Context<'_>,
    member: UserId,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());
    let gateway = gateway(ctx);

    match actions::kick(gateway.as_ref(), guild_id, member, &reason, &ctx.author().name).await {
        Ok(()) => {
            let embed = embeds::action_embed()
                .title("👢 Member Kicked")
                .description(format!("{} has been kicked from the server.", mention_user(member)))
                .field("Reason", truncate(&reason, FIELD_LIMIT), false)
                .field("Moderator", mention_user(ctx.author().id), true);
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            ctx.say(format!("❌ Failed to kick member: {}", e)).await?;
        }
    }

    Ok(())
}

/// Ban a member from the server
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    category = "Moderation"
)]
pub async fn ban(
    ctx: Context<'_>,
    member: UserId,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());
    let gateway = gateway(ctx);

    match actions::ban(gateway.as_ref(), guild_id, member, &reason, &ctx.author().name).await {
        Ok(()) => {
            let embed = embeds::severe_embed()
                .title("🔨 Member Banned")
                .description(format!("{} has been banned from the server.", mention_user(member)))
                .field("Reason", truncate(&reason, FIELD_LIMIT), false)
                .field("Moderator", mention_user(ctx.author().id), true);
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            ctx.say(format!("❌ Failed to ban member: {}", e)).await?;
        }
    }

    Ok(())
}

/// Mute a member for a duration (e.g. 10m, 1h)
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    category = "Moderation"
)]
pub async fn mute(
    ctx: Context<'_>,
    member: UserId,
    duration: Option<String>,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;
    let data = ctx.data();
    let duration_text = duration.unwrap_or_else(|| data.settings.default_mute_duration.clone());
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());

    let duration = match data.durations.parse_duration(&duration_text) {
        Ok(duration) => duration,
        Err(e) => {
            ctx.say(format!("❌ {}", e)).await?;
            return Ok(());
        }
    };

    let request = MuteRequest {
        guild_id,
        user_id: member,
        channel_id: ctx.channel_id(),
        duration,
        reason: reason.clone(),
        moderator: ctx.author().name.clone(),
    };

    match data.mutes.mute(gateway(ctx), request).await {
        Ok(record) => {
            let embed = embeds::action_embed()
                .title("🔇 Member Muted")
                .description(format!("{} has been muted.", mention_user(member)))
                .field("Duration", duration_text, true)
                .field("Unmutes", format!("<t:{}:R>", record.expires_at.timestamp()), true)
                .field("Reason", truncate(&reason, FIELD_LIMIT), false)
                .field("Moderator", mention_user(ctx.author().id), true);
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            ctx.say(format!("❌ Failed to mute member: {}", e)).await?;
        }
    }

    Ok(())
}

/// Unmute a member
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    category = "Moderation"
)]
pub async fn unmute(ctx: Context<'_>, member: UserId) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;
    let reason = format!("Unmuted by {}", ctx.author().name);
    let gateway = gateway(ctx);

    match ctx
        .data()
        .mutes
        .unmute(gateway.as_ref(), guild_id, member, &reason)
        .await
    {
        Ok(UnmuteOutcome::Unmuted(_)) => {
            let embed = embeds::success_embed()
                .title("🔊 Member Unmuted")
                .description(format!("{} has been unmuted.", mention_user(member)))
                .field("Moderator", mention_user(ctx.author().id), true)
                .timestamp(Timestamp::now());
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        Ok(UnmuteOutcome::NotMuted) => {
            ctx.say(format!("❌ {} is not muted.", mention_user(member)))
                .await?;
        }
        Err(e) => {
            ctx.say(format!("❌ Failed to unmute member: {}", e)).await?;
        }
    }

    Ok(())
}

/// Delete recent messages in this channel
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    category = "Moderation"
)]
pub async fn clear(ctx: Context<'_>, amount: Option<i64>) -> Result<(), Error> {
    let max = ctx.data().settings.max_bulk_delete;
    let amount = amount.unwrap_or(DEFAULT_CLEAR_AMOUNT);

    let Some(count) = actions::purge_count(amount, max) else {
        ctx.say(format!("❌ Please specify a number between 1 and {}.", max))
            .await?;
        return Ok(());
    };

    let gateway = gateway(ctx);
    let deleted = match actions::purge(gateway.as_ref(), ctx.channel_id(), count).await {
        // the command message is part of the purge
        Ok(deleted) => deleted.saturating_sub(1),
        Err(e) => {
            ctx.say(format!("❌ Failed to delete messages: {}", e)).await?;
            return Ok(());
        }
    };

    info!(
        "{} deleted {} messages in channel {}",
        ctx.author().name,
        deleted,
        ctx.channel_id()
    );

    let notice = ctx
        .say(format!("🗑️ Deleted {} message(s).", deleted))
        .await?
        .into_message()
        .await?;

    let http = ctx.serenity_context().http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(CLEAR_NOTICE_SECONDS)).await;
        if let Err(e) = notice.channel_id.delete_message(&http, notice.id).await {
            debug!("Could not remove clear notice {}: {:?}", notice.id, e);
        }
    });

    Ok(())
}

/// Warn a member
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    category = "Moderation"
)]
pub async fn warn(
    ctx: Context<'_>,
    member: UserId,
    #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());
    let guild_name = ctx
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| "the server".to_string());
    let shown_reason = truncate(&reason, FIELD_LIMIT);
    let data = ctx.data();
    let gateway = gateway(ctx);

    let outcome = actions::warn(
        gateway.as_ref(),
        &data.store,
        member,
        &reason,
        &ctx.author().name,
        |count| {
            OutgoingMessage::embed(
                embeds::warning_embed()
                    .title("⚠️ You've been warned")
                    .description(format!("You received a warning in {}", guild_name))
                    .field("Reason", shown_reason.clone(), false)
                    .field("Total Warnings", count.to_string(), true)
                    .footer(CreateEmbedFooter::new(
                        "Please follow the server rules to avoid further action.",
                    )),
            )
        },
    )
    .await;

    let mut embed = embeds::warning_embed()
        .title("⚠️ Warning Issued")
        .description(format!("{} has been warned.", mention_user(member)))
        .field("Reason", shown_reason.clone(), false)
        .field("Warning Count", outcome.count.to_string(), true)
        .field("Moderator", mention_user(ctx.author().id), true)
        .timestamp(Timestamp::now());

    if let Some(notice) =
        threshold_notice(member, outcome.count, data.settings.max_warnings_before_kick)
    {
        embed = embed.field("🚨 Warning Threshold Reached", notice, false);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;

    if !outcome.dm_delivered {
        ctx.say("⚠️ Could not send DM to user.").await?;
    }

    Ok(())
}

/// Show a member's recent warnings
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    category = "Moderation"
)]
pub async fn warnings(ctx: Context<'_>, member: UserId) -> Result<(), Error> {
    let store = &ctx.data().store;
    let total = store.warning_count(member);
    if total == 0 {
        ctx.say(format!("✅ {} has no warnings.", mention_user(member)))
            .await?;
        return Ok(());
    }

    let mut embed = embeds::warning_embed()
        .title("⚠️ Warnings")
        .description(format!("{}\nTotal warnings: {}", mention_user(member), total));

    for (position, warning) in store.recent_warnings(member, WARNINGS_SHOWN) {
        embed = embed.field(
            format!("Warning {}", position),
            format!(
                "**Reason:** {}\n**By:** {}\n**Date:** {}",
                truncate(&warning.reason, 900),
                warning.moderator,
                format_date(warning.timestamp)
            ),
            false,
        );
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Escalation hint once a member reaches the configured warning count.
/// A threshold of zero disables it.
fn threshold_notice(member: UserId, count: usize, threshold: usize) -> Option<String> {
    if threshold == 0 || count < threshold {
        return None;
    }

    Some(format!(
        "{} has {} warnings (threshold {}). Consider further action.",
        mention_user(member),
        count,
        threshold
    ))
}
