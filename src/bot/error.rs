use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("This command can only be used in a server.")]
    GuildOnly,
}
