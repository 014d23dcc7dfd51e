use std::fmt;
use std::sync::Arc;

use crate::bot::error::Error;
use crate::config::Settings;
use crate::services::moderation::duration::DurationParser;
use crate::services::moderation::mute_scheduler::MuteScheduler;
use crate::services::moderation::store::ModerationStore;

pub type Context<'a> = poise::Context<'a, Arc<Data>, Error>;

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    /// Warnings and active mutes for the lifetime of the process
    pub store: Arc<ModerationStore>,
    pub mutes: MuteScheduler,
    pub durations: DurationParser,
}

impl Data {
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(ModerationStore::new());
        let mutes = MuteScheduler::new(store.clone(), settings.muted_role_name.clone());
        let durations = DurationParser::new(settings.max_mute_seconds);

        Self {
            settings,
            store,
            mutes,
            durations,
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("prefix", &self.settings.command_prefix)
            .field("active_mutes", &self.store.active_mutes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl Data {
    /// Default settings with a placeholder token
    pub(crate) fn for_tests() -> Arc<Self> {
        let settings = Settings::from_lookup(|key| match key {
            "DISCORD_BOT_TOKEN" => Some("token".to_string()),
            _ => None,
        })
        .expect("settings");
        Arc::new(Self::new(settings))
    }
}
