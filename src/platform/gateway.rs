use serenity::all::{ChannelId, CreateEmbed, GuildId, MessageId, Permissions, RoleId, UserId};
use serenity::async_trait;

use crate::platform::error::PlatformError;

/// A message the bot posts: plain content, an embed, or both
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    pub fn embed(embed: CreateEmbed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
        }
    }
}

/// Every action the bot performs against the messaging platform.
///
/// Each call is independent: a failure is returned to the caller and never
/// affects other in-flight calls.
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Find a guild role by exact name
    async fn lookup_role(&self, guild_id: GuildId, name: &str)
        -> Result<Option<RoleId>, PlatformError>;

    async fn create_role(
        &self,
        guild_id: GuildId,
        name: &str,
        permissions: Permissions,
        reason: &str,
    ) -> Result<RoleId, PlatformError>;

    /// Deny `deny` for `role_id` on every channel of the guild.
    /// Returns the number of channels updated, or the first failure once every
    /// channel has been attempted.
    async fn restrict_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        deny: Permissions,
    ) -> Result<usize, PlatformError>;

    async fn grant_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), PlatformError>;

    async fn revoke_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), PlatformError>;

    async fn kick_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError>;

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        delete_message_days: u8,
        reason: &str,
    ) -> Result<(), PlatformError>;

    /// Delete up to `count` most recent messages. Returns how many were deleted.
    /// Messages too old for a bulk delete are removed one by one.
    async fn delete_messages(&self, channel_id: ChannelId, count: usize)
        -> Result<usize, PlatformError>;

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, PlatformError>;

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError>;

    async fn send_direct_message(
        &self,
        user_id: UserId,
        message: OutgoingMessage,
    ) -> Result<(), PlatformError>;

    /// Name of a guild channel, if it is one
    async fn channel_name(&self, channel_id: ChannelId) -> Result<Option<String>, PlatformError>;

    /// First text channel matching one of `names`, in priority order
    async fn find_text_channel(
        &self,
        guild_id: GuildId,
        names: &[String],
    ) -> Result<Option<ChannelId>, PlatformError>;
}
