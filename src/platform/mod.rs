pub mod discord;
pub mod error;
pub mod gateway;

#[cfg(test)]
pub mod testing;

pub use discord::DiscordGateway;
pub use error::PlatformError;
pub use gateway::{OutgoingMessage, PlatformGateway};
