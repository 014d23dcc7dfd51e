pub mod embeds;
pub mod links;
pub mod moderation;
