use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};
use tracing::{debug, error, info, warn};

use crate::constants::moderation::BAN_DELETE_MESSAGE_DAYS;
use crate::platform::{OutgoingMessage, PlatformError, PlatformGateway};
use crate::services::moderation::store::ModerationStore;

/// Grant the muted role to a member
pub async fn grant_muted_role(
    gateway: &dyn PlatformGateway,
    guild_id: GuildId,
    user_id: UserId,
    role_id: RoleId,
    reason: &str,
) -> Result<(), PlatformError> {
    match gateway.grant_role(guild_id, user_id, role_id, reason).await {
        Ok(()) => {
            debug!("Granted role {} to user {} in guild {}", role_id, user_id, guild_id);
            Ok(())
        }
        Err(e) => {
            error!("Failed to grant role {} to user {}: {:?}", role_id, user_id, e);
            Err(e)
        }
    }
}

/// Revoke the muted role from a member
pub async fn revoke_muted_role(
    gateway: &dyn PlatformGateway,
    guild_id: GuildId,
    user_id: UserId,
    role_id: RoleId,
    reason: &str,
) -> Result<(), PlatformError> {
    match gateway.revoke_role(guild_id, user_id, role_id, reason).await {
        Ok(()) => {
            debug!("Revoked role {} from user {} in guild {}", role_id, user_id, guild_id);
            Ok(())
        }
        Err(e) => {
            error!("Failed to revoke role {} from user {}: {:?}", role_id, user_id, e);
            Err(e)
        }
    }
}

pub async fn kick(
    gateway: &dyn PlatformGateway,
    guild_id: GuildId,
    user_id: UserId,
    reason: &str,
    moderator: &str,
) -> Result<(), PlatformError> {
    gateway
        .kick_member(guild_id, user_id, reason)
        .await
        .inspect_err(|e| error!("Failed to kick {}: {:?}", user_id, e))?;

    info!("{} was kicked by {}. Reason: {}", user_id, moderator, reason);
    Ok(())
}

pub async fn ban(
    gateway: &dyn PlatformGateway,
    guild_id: GuildId,
    user_id: UserId,
    reason: &str,
    moderator: &str,
) -> Result<(), PlatformError> {
    gateway
        .ban_member(guild_id, user_id, BAN_DELETE_MESSAGE_DAYS, reason)
        .await
        .inspect_err(|e| error!("Failed to ban {}: {:?}", user_id, e))?;

    info!("{} was banned by {}. Reason: {}", user_id, moderator, reason);
    Ok(())
}

/// Messages a `clear` of `amount` removes, counting the command message itself.
/// `None` when `amount` is outside `1..=max`.
pub fn purge_count(amount: i64, max: usize) -> Option<usize> {
    let amount = usize::try_from(amount).ok()?;
    (1..=max).contains(&amount).then_some(amount + 1)
}

/// Bulk-delete the most recent `count` messages of a channel
pub async fn purge(
    gateway: &dyn PlatformGateway,
    channel_id: ChannelId,
    count: usize,
) -> Result<usize, PlatformError> {
    let deleted = gateway
        .delete_messages(channel_id, count)
        .await
        .inspect_err(|e| error!("Failed to delete messages in {}: {:?}", channel_id, e))?;

    debug!("Deleted {} message(s) in channel {}", deleted, channel_id);
    Ok(deleted)
}

/// Result of issuing a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnOutcome {
    /// Total warnings for the member, including this one
    pub count: usize,
    /// Whether the member could be notified by DM
    pub dm_delivered: bool,
}

/// Record a warning, then notify the member by DM.
///
/// The warning stays recorded when the DM cannot be delivered.
pub async fn warn(
    gateway: &dyn PlatformGateway,
    store: &ModerationStore,
    user_id: UserId,
    reason: &str,
    moderator: &str,
    build_dm: impl FnOnce(usize) -> OutgoingMessage,
) -> WarnOutcome {
    let count = store.add_warning(user_id, reason, moderator);
    info!("{} was warned by {}. Reason: {}", user_id, moderator, reason);

    let dm_delivered = match gateway.send_direct_message(user_id, build_dm(count)).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Could not DM user {} about warning: {:?}", user_id, e);
            false
        }
    };

    WarnOutcome {
        count,
        dm_delivered,
    }
}

/// Post a message to a channel, logging on failure
pub async fn notify(
    gateway: &dyn PlatformGateway,
    channel_id: ChannelId,
    message: OutgoingMessage,
) -> Result<MessageId, PlatformError> {
    gateway
        .send_message(channel_id, message)
        .await
        .inspect_err(|e| warn!("Failed to send message to channel {}: {:?}", channel_id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{GatewayCall, MockGateway};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_warning_survives_failed_dm() {
        let gateway = MockGateway::new();
        gateway.fail_direct_messages(true);
        let store = ModerationStore::new();

        let outcome = warn(&gateway, &store, UserId::new(42), "spam", "alice", |count| {
            OutgoingMessage::text(format!("warning #{}", count))
        })
        .await;

        assert_eq!(
            outcome,
            WarnOutcome {
                count: 1,
                dm_delivered: false
            }
        );
        assert_eq!(store.warning_count(UserId::new(42)), 1);
    }

    #[tokio::test]
    async fn test_warn_counts_and_notifies() {
        let gateway = MockGateway::new();
        let store = ModerationStore::new();

        warn(&gateway, &store, UserId::new(42), "a", "alice", |_| OutgoingMessage::default()).await;
        let outcome =
            warn(&gateway, &store, UserId::new(42), "b", "bob", |_| OutgoingMessage::default()).await;

        assert_eq!(outcome.count, 2);
        assert!(outcome.dm_delivered);
        assert_eq!(
            gateway.count(|c| *c == GatewayCall::DirectMessage(UserId::new(42))),
            2
        );
    }

    #[tokio::test]
    async fn test_kick_failure_is_reported() {
        let gateway = MockGateway::new();
        gateway.fail_kicks(true);

        let result = kick(&gateway, GuildId::new(7), UserId::new(42), "rude", "alice").await;
        let err = assert_err!(result);
        assert!(matches!(err, PlatformError::PermissionDenied(_)));
    }

    #[test]
    fn test_purge_count_bounds() {
        assert_eq!(purge_count(10, 100), Some(11));
        assert_eq!(purge_count(100, 100), Some(101));
        assert_eq!(purge_count(1, 50), Some(2));
        assert_eq!(purge_count(0, 100), None);
        assert_eq!(purge_count(-3, 100), None);
        assert_eq!(purge_count(51, 50), None);
    }

    #[tokio::test]
    async fn test_purge_returns_deleted_count() {
        let gateway = MockGateway::new();
        let deleted = assert_ok!(purge(&gateway, ChannelId::new(5), 11).await);
        assert_eq!(deleted, 11);
    }
}
