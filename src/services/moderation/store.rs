use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use uuid::Uuid;

/// A warning issued to a member. Never modified once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub reason: String,
    pub moderator: String,
    pub timestamp: DateTime<Utc>,
}

/// Shared cancellation marker for a mute record and its deferred expiry
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An active timed mute
#[derive(Debug, Clone)]
pub struct MuteRecord {
    /// Identity of this mute; a replacing mute always gets a fresh id
    pub id: Uuid,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub role_id: RoleId,
    /// Channel the mute was issued in, used for the automatic-unmute notice
    pub channel_id: ChannelId,
    pub reason: String,
    pub moderator: String,
    pub muted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub cancelled: CancellationFlag,
}

impl MuteRecord {
    pub fn is_active(&self) -> bool {
        !self.cancelled.is_cancelled()
    }
}

/// Process-lifetime moderation state: warnings per user, active mutes per (guild, user)
#[derive(Debug, Default)]
pub struct ModerationStore {
    warnings: DashMap<UserId, Vec<Warning>>,
    mutes: DashMap<(GuildId, UserId), MuteRecord>,
}

impl ModerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a warning and return the user's new total
    pub fn add_warning(&self, user_id: UserId, reason: &str, moderator: &str) -> usize {
        let mut warnings = self.warnings.entry(user_id).or_default();
        warnings.push(Warning {
            reason: reason.to_string(),
            moderator: moderator.to_string(),
            timestamp: Utc::now(),
        });
        warnings.len()
    }

    /// All warnings for a user, oldest first
    pub fn list_warnings(&self, user_id: UserId) -> Vec<Warning> {
        self.warnings
            .get(&user_id)
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// The last `limit` warnings with their 1-based position in the full list
    pub fn recent_warnings(&self, user_id: UserId, limit: usize) -> Vec<(usize, Warning)> {
        let warnings = self.list_warnings(user_id);
        let skip = warnings.len().saturating_sub(limit);
        warnings
            .into_iter()
            .enumerate()
            .skip(skip)
            .map(|(index, warning)| (index + 1, warning))
            .collect()
    }

    pub fn warning_count(&self, user_id: UserId) -> usize {
        self.warnings.get(&user_id).map(|w| w.len()).unwrap_or(0)
    }

    /// Store a mute record, returning the one it replaced
    pub fn set_mute(&self, record: MuteRecord) -> Option<MuteRecord> {
        self.mutes.insert((record.guild_id, record.user_id), record)
    }

    pub fn clear_mute(&self, user_id: UserId, guild_id: GuildId) -> Option<MuteRecord> {
        self.mutes.remove(&(guild_id, user_id)).map(|(_, record)| record)
    }

    /// Remove the record only if it is still the mute identified by `id`
    pub fn clear_mute_if(&self, user_id: UserId, guild_id: GuildId, id: Uuid) -> Option<MuteRecord> {
        self.mutes
            .remove_if(&(guild_id, user_id), |_, record| record.id == id)
            .map(|(_, record)| record)
    }

    pub fn get_mute(&self, user_id: UserId, guild_id: GuildId) -> Option<MuteRecord> {
        self.mutes.get(&(guild_id, user_id)).map(|r| r.clone())
    }

    pub fn active_mutes(&self) -> usize {
        self.mutes.len()
    }
}
