use serenity::all::Permissions;

/// Moderation defaults (can be overridden via env vars)
pub const DEFAULT_MUTE_DURATION: &str = "10m";
pub const DEFAULT_MUTED_ROLE_NAME: &str = "Muted";
pub const DEFAULT_MAX_BULK_DELETE: usize = 100;
pub const DEFAULT_MAX_WARNINGS_BEFORE_KICK: usize = 3;

/// Discord refuses to bulk-fetch more than this many messages per request
pub const BULK_DELETE_HARD_LIMIT: usize = 100;

/// Permissions the muted role loses on every channel
pub const MUTED_ROLE_DENY: Permissions = Permissions::SEND_MESSAGES.union(Permissions::SPEAK);

/// Audit log reason used when the muted role has to be created
pub const MUTED_ROLE_REASON: &str = "Auto-created muted role";

/// Days of message history removed when banning
pub const BAN_DELETE_MESSAGE_DAYS: u8 = 1;

pub const NO_REASON: &str = "No reason provided";

/// `clear` without an amount
pub const DEFAULT_CLEAR_AMOUNT: i64 = 10;

/// How long the "Deleted N messages" notice stays up
pub const CLEAR_NOTICE_SECONDS: u64 = 3;

/// Most recent warnings shown by `warnings`
pub const WARNINGS_SHOWN: usize = 5;
