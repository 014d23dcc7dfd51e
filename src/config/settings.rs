use std::env;

use crate::constants::moderation::{
    BULK_DELETE_HARD_LIMIT, DEFAULT_MAX_BULK_DELETE, DEFAULT_MAX_WARNINGS_BEFORE_KICK,
    DEFAULT_MUTED_ROLE_NAME, DEFAULT_MUTE_DURATION,
};
use crate::services::moderation::duration::parse_seconds;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_STATUS: &str = "pandaudit.com | !help";
const DEFAULT_AUTO_REACT_CHANNELS: &str = "blog-updates";
const DEFAULT_AUTO_REACT_EMOJIS: &str = "👍,💬,🔖";
const DEFAULT_WELCOME_CHANNELS: &str = "welcome,general,introductions";

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub command_prefix: String,
    /// Shown as the bot's "watching" activity
    pub bot_status: String,
    /// Duration string used when `mute` is given none
    pub default_mute_duration: String,
    /// Upper bound for mutes in seconds, unbounded when unset
    pub max_mute_seconds: Option<u64>,
    pub max_bulk_delete: usize,
    pub max_warnings_before_kick: usize,
    pub muted_role_name: String,
    /// Channel names whose messages get auto-reactions
    pub auto_react_channels: Vec<String>,
    /// Reactions added in order
    pub auto_react_emojis: Vec<String>,
    /// Candidate welcome channels, first match wins
    pub welcome_channels: Vec<String>,
    pub showcase_channel: String,
    pub blog_updates_channel: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let discord_token =
            var("DISCORD_BOT_TOKEN").ok_or("DISCORD_BOT_TOKEN environment variable not set")?;

        let command_prefix = var("BOT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let bot_status = var("BOT_STATUS").unwrap_or_else(|| DEFAULT_STATUS.to_string());

        let default_mute_duration =
            var("DEFAULT_MUTE_DURATION").unwrap_or_else(|| DEFAULT_MUTE_DURATION.to_string());
        let default_mute_seconds = parse_seconds(&default_mute_duration)
            .map_err(|e| format!("DEFAULT_MUTE_DURATION {:?}: {}", default_mute_duration, e))?;

        let max_mute_seconds = match var("MAX_MUTE_DURATION") {
            Some(raw) => Some(
                parse_seconds(&raw).map_err(|e| format!("MAX_MUTE_DURATION {:?}: {}", raw, e))?,
            ),
            None => None,
        };

        if let Some(max) = max_mute_seconds {
            if default_mute_seconds > max {
                return Err(format!(
                    "DEFAULT_MUTE_DURATION {} exceeds MAX_MUTE_DURATION",
                    default_mute_duration
                ));
            }
        }

        let max_bulk_delete = var("MAX_BULK_DELETE")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BULK_DELETE)
            .clamp(1, BULK_DELETE_HARD_LIMIT);

        let max_warnings_before_kick = var("MAX_WARNINGS_BEFORE_KICK")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_WARNINGS_BEFORE_KICK);

        let muted_role_name =
            var("MUTED_ROLE_NAME").unwrap_or_else(|| DEFAULT_MUTED_ROLE_NAME.to_string());

        let auto_react_channels = split_list(
            &var("AUTO_REACT_CHANNELS").unwrap_or_else(|| DEFAULT_AUTO_REACT_CHANNELS.to_string()),
        );

        let auto_react_emojis = split_list(
            &var("AUTO_REACT_EMOJIS").unwrap_or_else(|| DEFAULT_AUTO_REACT_EMOJIS.to_string()),
        );

        let welcome_channels = split_list(
            &var("WELCOME_CHANNELS").unwrap_or_else(|| DEFAULT_WELCOME_CHANNELS.to_string()),
        );

        let showcase_channel = var("SHOWCASE_CHANNEL").unwrap_or_else(|| "showcase".to_string());
        let blog_updates_channel =
            var("BLOG_UPDATES_CHANNEL").unwrap_or_else(|| "blog-updates".to_string());

        Ok(Self {
            discord_token,
            command_prefix,
            bot_status,
            default_mute_duration,
            max_mute_seconds,
            max_bulk_delete,
            max_warnings_before_kick,
            muted_role_name,
            auto_react_channels,
            auto_react_emojis,
            welcome_channels,
            showcase_channel,
            blog_updates_channel,
        })
    }
}

/// Comma separated list, blanks dropped
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
