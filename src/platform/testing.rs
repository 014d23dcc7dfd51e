//! Recording in-memory gateway for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serenity::all::{ChannelId, GuildId, MessageId, Permissions, RoleId, UserId};
use serenity::async_trait;

use crate::platform::error::PlatformError;
use crate::platform::gateway::{OutgoingMessage, PlatformGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    LookupRole(GuildId, String),
    CreateRole(GuildId, String),
    RestrictRole(GuildId, RoleId),
    GrantRole(GuildId, UserId, RoleId),
    RevokeRole(GuildId, UserId, RoleId),
    Kick(GuildId, UserId, String),
    Ban(GuildId, UserId, String),
    DeleteMessages(ChannelId, usize),
    SendMessage(ChannelId, Option<String>, bool),
    AddReaction(ChannelId, MessageId, String),
    DirectMessage(UserId),
}

/// Which calls should fail
#[derive(Debug, Default)]
struct Failures {
    restrict: bool,
    grant: bool,
    revoke: bool,
    direct_message: bool,
    kick: bool,
    reactions: HashSet<String>,
}

#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    roles: Mutex<HashMap<(GuildId, String), RoleId>>,
    channel_names: Mutex<HashMap<ChannelId, String>>,
    failures: Mutex<Failures>,
    next_id: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    pub fn revokes(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::RevokeRole(..)))
    }

    pub fn grants(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::GrantRole(..)))
    }

    /// Contents of every plain-text message sent to channels
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                GatewayCall::SendMessage(_, Some(content), _) => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn with_role(self, guild_id: GuildId, name: &str, role_id: RoleId) -> Self {
        self.roles
            .lock()
            .unwrap()
            .insert((guild_id, name.to_string()), role_id);
        self
    }

    pub fn with_channel(self, channel_id: ChannelId, name: &str) -> Self {
        self.channel_names
            .lock()
            .unwrap()
            .insert(channel_id, name.to_string());
        self
    }

    pub fn fail_restrictions(&self, fail: bool) {
        self.failures.lock().unwrap().restrict = fail;
    }

    pub fn fail_grants(&self, fail: bool) {
        self.failures.lock().unwrap().grant = fail;
    }

    pub fn fail_revokes(&self, fail: bool) {
        self.failures.lock().unwrap().revoke = fail;
    }

    pub fn fail_direct_messages(&self, fail: bool) {
        self.failures.lock().unwrap().direct_message = fail;
    }

    pub fn fail_kicks(&self, fail: bool) {
        self.failures.lock().unwrap().kick = fail;
    }

    pub fn fail_reaction(&self, emoji: &str) {
        self.failures
            .lock()
            .unwrap()
            .reactions
            .insert(emoji.to_string());
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformGateway for MockGateway {
    async fn lookup_role(
        &self,
        guild_id: GuildId,
        name: &str,
    ) -> Result<Option<RoleId>, PlatformError> {
        self.record(GatewayCall::LookupRole(guild_id, name.to_string()));
        tokio::task::yield_now().await;
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&(guild_id, name.to_string()))
            .copied())
    }

    async fn create_role(
        &self,
        guild_id: GuildId,
        name: &str,
        _permissions: Permissions,
        _reason: &str,
    ) -> Result<RoleId, PlatformError> {
        self.record(GatewayCall::CreateRole(guild_id, name.to_string()));
        tokio::task::yield_now().await;
        let role_id = RoleId::new(self.next_id());
        self.roles
            .lock()
            .unwrap()
            .insert((guild_id, name.to_string()), role_id);
        Ok(role_id)
    }

    async fn restrict_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        _deny: Permissions,
    ) -> Result<usize, PlatformError> {
        self.record(GatewayCall::RestrictRole(guild_id, role_id));
        if self.failures.lock().unwrap().restrict {
            return Err(PlatformError::RateLimited("You are being rate limited".into()));
        }
        Ok(3)
    }

    async fn grant_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        _reason: &str,
    ) -> Result<(), PlatformError> {
        self.record(GatewayCall::GrantRole(guild_id, user_id, role_id));
        if self.failures.lock().unwrap().grant {
            return Err(PlatformError::PermissionDenied("Missing Permissions".into()));
        }
        Ok(())
    }

    async fn revoke_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        _reason: &str,
    ) -> Result<(), PlatformError> {
        self.record(GatewayCall::RevokeRole(guild_id, user_id, role_id));
        if self.failures.lock().unwrap().revoke {
            return Err(PlatformError::NotFound("Unknown Member".into()));
        }
        Ok(())
    }

    async fn kick_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.record(GatewayCall::Kick(guild_id, user_id, reason.to_string()));
        if self.failures.lock().unwrap().kick {
            return Err(PlatformError::PermissionDenied("Missing Permissions".into()));
        }
        Ok(())
    }

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        _delete_message_days: u8,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.record(GatewayCall::Ban(guild_id, user_id, reason.to_string()));
        Ok(())
    }

    async fn delete_messages(
        &self,
        channel_id: ChannelId,
        count: usize,
    ) -> Result<usize, PlatformError> {
        self.record(GatewayCall::DeleteMessages(channel_id, count));
        Ok(count)
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, PlatformError> {
        self.record(GatewayCall::SendMessage(
            channel_id,
            message.content,
            message.embed.is_some(),
        ));
        Ok(MessageId::new(self.next_id()))
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), PlatformError> {
        self.record(GatewayCall::AddReaction(
            channel_id,
            message_id,
            emoji.to_string(),
        ));
        if self.failures.lock().unwrap().reactions.contains(emoji) {
            return Err(PlatformError::RateLimited("You are being rate limited".into()));
        }
        Ok(())
    }

    async fn send_direct_message(
        &self,
        user_id: UserId,
        _message: OutgoingMessage,
    ) -> Result<(), PlatformError> {
        self.record(GatewayCall::DirectMessage(user_id));
        if self.failures.lock().unwrap().direct_message {
            return Err(PlatformError::PermissionDenied(
                "Cannot send messages to this user".into(),
            ));
        }
        Ok(())
    }

    async fn channel_name(&self, channel_id: ChannelId) -> Result<Option<String>, PlatformError> {
        Ok(self.channel_names.lock().unwrap().get(&channel_id).cloned())
    }

    async fn find_text_channel(
        &self,
        _guild_id: GuildId,
        names: &[String],
    ) -> Result<Option<ChannelId>, PlatformError> {
        let channels = self.channel_names.lock().unwrap();
        Ok(names.iter().find_map(|name| {
            channels
                .iter()
                .find(|(_, channel_name)| *channel_name == name)
                .map(|(id, _)| *id)
        }))
    }
}
