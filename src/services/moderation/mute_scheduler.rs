//! Timed mutes.
//!
//! Every mutation of a guild's mute state (role resolution, grant, record
//! replacement, expiry check-and-revoke, explicit unmute) runs under that
//! guild's async mutex. Deferred expiries are plain tokio timers that are never
//! removed: a timer that fires for a record that was superseded or cancelled
//! finds a different (or no) record identity and does nothing.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use serenity::all::{ChannelId, GuildId, Permissions, RoleId, UserId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::moderation::{MUTED_ROLE_DENY, MUTED_ROLE_REASON};
use crate::platform::{OutgoingMessage, PlatformError, PlatformGateway};
use crate::services::moderation::actions;
use crate::services::moderation::store::{CancellationFlag, ModerationStore, MuteRecord};
use crate::utils::formatting::mention_user;

/// A validated request to mute a member
#[derive(Debug, Clone)]
pub struct MuteRequest {
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// Where the automatic-unmute notice is posted
    pub channel_id: ChannelId,
    pub duration: Duration,
    pub reason: String,
    pub moderator: String,
}

#[derive(Debug)]
pub enum UnmuteOutcome {
    Unmuted(MuteRecord),
    NotMuted,
}

#[derive(Clone)]
pub struct MuteScheduler {
    store: Arc<ModerationStore>,
    guild_locks: Arc<DashMap<GuildId, Arc<Mutex<()>>>>,
    /// Guilds whose muted role exists but still lacks its channel overwrites
    unrestricted: Arc<DashSet<GuildId>>,
    role_name: Arc<str>,
}

impl MuteScheduler {
    pub fn new(store: Arc<ModerationStore>, role_name: impl Into<String>) -> Self {
        Self {
            store,
            guild_locks: Arc::new(DashMap::new()),
            unrestricted: Arc::new(DashSet::new()),
            role_name: Arc::from(role_name.into()),
        }
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    fn guild_lock(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        self.guild_locks.entry(guild_id).or_default().clone()
    }

    /// Mute a member, replacing any mute they already have in this guild.
    ///
    /// Nothing is recorded or scheduled unless the role grant succeeds.
    pub async fn mute(
        &self,
        gateway: Arc<dyn PlatformGateway>,
        request: MuteRequest,
    ) -> Result<MuteRecord, PlatformError> {
        let guild_id = request.guild_id;
        let user_id = request.user_id;

        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let role_id = self.resolve_muted_role(gateway.as_ref(), guild_id).await?;

        // Always attempted: the member may have lost the role outside the bot
        actions::grant_muted_role(gateway.as_ref(), guild_id, user_id, role_id, &request.reason)
            .await?;

        let muted_at = Utc::now();
        let expires_at = chrono::Duration::from_std(request.duration)
            .ok()
            .and_then(|d| muted_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let record = MuteRecord {
            id: Uuid::new_v4(),
            guild_id,
            user_id,
            role_id,
            channel_id: request.channel_id,
            reason: request.reason,
            moderator: request.moderator,
            muted_at,
            expires_at,
            cancelled: CancellationFlag::default(),
        };

        if let Some(previous) = self.store.set_mute(record.clone()) {
            previous.cancelled.cancel();
            debug!(
                "Mute {} for user {} in guild {} superseded by {}",
                previous.id, user_id, guild_id, record.id
            );
        }

        self.schedule_expiry(gateway, &record, request.duration);

        info!(
            "{} was muted by {} until {} (mute {}). Reason: {}",
            user_id, record.moderator, record.expires_at, record.id, record.reason
        );

        Ok(record)
    }

    /// Lift a member's mute now. A member without a mute record is left untouched.
    pub async fn unmute(
        &self,
        gateway: &dyn PlatformGateway,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<UnmuteOutcome, PlatformError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let Some(record) = self.store.get_mute(user_id, guild_id) else {
            return Ok(UnmuteOutcome::NotMuted);
        };

        actions::revoke_muted_role(gateway, guild_id, user_id, record.role_id, reason).await?;

        self.store.clear_mute_if(user_id, guild_id, record.id);
        record.cancelled.cancel();

        info!("{} was unmuted (mute {}). Reason: {}", user_id, record.id, reason);

        Ok(UnmuteOutcome::Unmuted(record))
    }

    pub fn active_mute(&self, guild_id: GuildId, user_id: UserId) -> Option<MuteRecord> {
        self.store.get_mute(user_id, guild_id)
    }

    /// Look up the guild's muted role, creating it when missing.
    ///
    /// A role is only handed out once its send/speak overwrites are in place;
    /// a failed restriction is retried on the next mute in that guild.
    /// Caller holds the guild lock.
    async fn resolve_muted_role(
        &self,
        gateway: &dyn PlatformGateway,
        guild_id: GuildId,
    ) -> Result<RoleId, PlatformError> {
        let role_id = match gateway.lookup_role(guild_id, &self.role_name).await? {
            Some(role_id) => role_id,
            None => {
                let role_id = gateway
                    .create_role(guild_id, &self.role_name, Permissions::empty(), MUTED_ROLE_REASON)
                    .await?;
                info!("Created muted role {} in guild {}", role_id, guild_id);
                self.unrestricted.insert(guild_id);
                role_id
            }
        };

        if self.unrestricted.contains(&guild_id) {
            let channels = gateway
                .restrict_role(guild_id, role_id, MUTED_ROLE_DENY)
                .await
                .inspect_err(|e| {
                    warn!(
                        "Failed to restrict muted role {} in guild {}: {:?}",
                        role_id, guild_id, e
                    )
                })?;
            self.unrestricted.remove(&guild_id);
            info!(
                "Restricted muted role {} in guild {} on {} channels",
                role_id, guild_id, channels
            );
        }

        Ok(role_id)
    }

    fn schedule_expiry(
        &self,
        gateway: Arc<dyn PlatformGateway>,
        record: &MuteRecord,
        duration: Duration,
    ) {
        let scheduler = self.clone();
        let guild_id = record.guild_id;
        let user_id = record.user_id;
        let mute_id = record.id;
        let cancelled = record.cancelled.clone();

        tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            if cancelled.is_cancelled() {
                debug!("Mute {} was cancelled before it expired", mute_id);
                return;
            }

            scheduler
                .expire(gateway.as_ref(), guild_id, user_id, mute_id)
                .await;
        });
    }

    /// Deferred half of a mute. Returns whether a revoke was issued.
    async fn expire(
        &self,
        gateway: &dyn PlatformGateway,
        guild_id: GuildId,
        user_id: UserId,
        mute_id: Uuid,
    ) -> bool {
        let lock = self.guild_lock(guild_id);
        let guard = lock.lock().await;

        let record = match self.store.get_mute(user_id, guild_id) {
            Some(record) if record.id == mute_id && record.is_active() => record,
            _ => {
                debug!("Mute {} no longer current, skipping expiry", mute_id);
                return false;
            }
        };

        let revoked = actions::revoke_muted_role(
            gateway,
            guild_id,
            user_id,
            record.role_id,
            "Mute duration expired",
        )
        .await;

        self.store.clear_mute_if(user_id, guild_id, mute_id);
        record.cancelled.cancel();
        drop(guard);

        match revoked {
            Ok(()) => {
                info!("{} was automatically unmuted (mute {})", user_id, mute_id);
                let notice = OutgoingMessage::text(format!(
                    "🔊 {} has been automatically unmuted.",
                    mention_user(user_id)
                ));
                // failure already logged by notify
                let _ = actions::notify(gateway, record.channel_id, notice).await;
            }
            Err(e) => {
                warn!(
                    "Automatic unmute of {} in guild {} failed, dropping mute {}: {:?}",
                    user_id, guild_id, mute_id, e
                );
            }
        }

        true
    }
}
