use serenity::all::{
    ChannelId, ChannelType, Context, CreateMessage, EditRole, GetMessages, GuildId, MessageId,
    PermissionOverwrite, PermissionOverwriteType, Permissions, ReactionType, RoleId,
    Timestamp, UserId,
};
use serenity::async_trait;
use tracing::{debug, warn};

use crate::platform::error::PlatformError;
use crate::platform::gateway::{OutgoingMessage, PlatformGateway};

/// Discord caps a single fetch / bulk delete at 100 messages
const DISCORD_BULK_LIMIT: usize = 100;

/// Bulk delete rejects messages older than two weeks; keep a minute of slack
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60 - 60;

/// `PlatformGateway` backed by a live serenity client
#[derive(Clone)]
pub struct DiscordGateway {
    ctx: Context,
}

impl DiscordGateway {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

/// Split `(id, unix timestamp)` pairs into ids that may be bulk-deleted and
/// ids too old for a bulk delete.
fn partition_by_age(
    messages: impl IntoIterator<Item = (MessageId, i64)>,
    now: i64,
) -> (Vec<MessageId>, Vec<MessageId>) {
    let mut recent = Vec::new();
    let mut old = Vec::new();
    for (id, sent_at) in messages {
        if now - sent_at < BULK_DELETE_MAX_AGE_SECS {
            recent.push(id);
        } else {
            old.push(id);
        }
    }
    (recent, old)
}

#[async_trait]
impl PlatformGateway for DiscordGateway {
    async fn lookup_role(
        &self,
        guild_id: GuildId,
        name: &str,
    ) -> Result<Option<RoleId>, PlatformError> {
        let roles = guild_id.roles(&self.ctx.http).await?;
        Ok(roles
            .values()
            .filter(|role| role.name == name)
            .map(|role| role.id)
            .min())
    }

    async fn create_role(
        &self,
        guild_id: GuildId,
        name: &str,
        permissions: Permissions,
        reason: &str,
    ) -> Result<RoleId, PlatformError> {
        let builder = EditRole::new()
            .name(name)
            .permissions(permissions)
            .audit_log_reason(reason);
        let role = guild_id.create_role(&self.ctx, builder).await?;
        debug!("Created role {} ({}) in guild {}", role.name, role.id, guild_id);
        Ok(role.id)
    }

    async fn restrict_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        deny: Permissions,
    ) -> Result<usize, PlatformError> {
        let channels = guild_id.channels(&self.ctx.http).await?;
        let mut updated = 0;
        let mut first_error = None;

        for channel_id in channels.keys() {
            let overwrite = PermissionOverwrite {
                allow: Permissions::empty(),
                deny,
                kind: PermissionOverwriteType::Role(role_id),
            };

            match channel_id.create_permission(&self.ctx, overwrite).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    warn!(
                        "Failed to restrict role {} on channel {}: {:?}",
                        role_id, channel_id, e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(updated),
        }
    }

    async fn grant_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.ctx
            .http
            .add_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn revoke_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.ctx
            .http
            .remove_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn kick_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        guild_id
            .kick_with_reason(&self.ctx.http, user_id, reason)
            .await?;
        Ok(())
    }

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        delete_message_days: u8,
        reason: &str,
    ) -> Result<(), PlatformError> {
        guild_id
            .ban_with_reason(&self.ctx.http, user_id, delete_message_days, reason)
            .await?;
        Ok(())
    }

    async fn delete_messages(
        &self,
        channel_id: ChannelId,
        count: usize,
    ) -> Result<usize, PlatformError> {
        let mut remaining = count;
        let mut before: Option<MessageId> = None;
        let mut deleted = 0;

        while remaining > 0 {
            let limit = remaining.min(DISCORD_BULK_LIMIT) as u8;
            let mut request = GetMessages::new().limit(limit);
            if let Some(before) = before {
                request = request.before(before);
            }

            let messages = channel_id.messages(&self.ctx.http, request).await?;
            if messages.is_empty() {
                break;
            }

            let fetched = messages.len();
            before = messages.last().map(|m| m.id);

            let (recent, old) = partition_by_age(
                messages.iter().map(|m| (m.id, m.timestamp.unix_timestamp())),
                Timestamp::now().unix_timestamp(),
            );
            match recent.as_slice() {
                [] => {}
                [id] => channel_id.delete_message(&self.ctx.http, *id).await?,
                ids => channel_id.delete_messages(&self.ctx.http, ids).await?,
            }
            deleted += recent.len();

            for id in old {
                channel_id.delete_message(&self.ctx.http, id).await?;
                deleted += 1;
            }

            remaining = remaining.saturating_sub(fetched);
            if fetched < limit as usize {
                break;
            }
        }

        Ok(deleted)
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, PlatformError> {
        let sent = channel_id
            .send_message(&self.ctx, build_message(message))
            .await?;
        Ok(sent.id)
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        channel_id
            .create_reaction(
                &self.ctx.http,
                message_id,
                ReactionType::Unicode(emoji.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn send_direct_message(
        &self,
        user_id: UserId,
        message: OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let dm_channel = user_id.create_dm_channel(&self.ctx).await?;
        dm_channel
            .send_message(&self.ctx, build_message(message))
            .await?;
        Ok(())
    }

    async fn channel_name(&self, channel_id: ChannelId) -> Result<Option<String>, PlatformError> {
        let cached = self
            .ctx
            .cache
            .channel(channel_id)
            .map(|channel| channel.name.clone());
        if cached.is_some() {
            return Ok(cached);
        }

        let channel = channel_id.to_channel(&self.ctx).await?;
        Ok(channel.guild().map(|channel| channel.name))
    }

    async fn find_text_channel(
        &self,
        guild_id: GuildId,
        names: &[String],
    ) -> Result<Option<ChannelId>, PlatformError> {
        let channels = guild_id.channels(&self.ctx.http).await?;

        Ok(names.iter().find_map(|name| {
            channels
                .values()
                .find(|channel| channel.kind == ChannelType::Text && &channel.name == name)
                .map(|channel| channel.id)
        }))
    }
}
