pub mod general;
pub mod moderation;

use std::sync::Arc;

use crate::bot::data::{Context, Data};
use crate::bot::error::Error;
use crate::platform::{DiscordGateway, PlatformGateway};

/// Every prefix command the bot registers
pub fn all() -> Vec<poise::Command<Arc<Data>, Error>> {
    vec![
        moderation::kick(),
        moderation::ban(),
        moderation::mute(),
        moderation::unmute(),
        moderation::clear(),
        moderation::warn(),
        moderation::warnings(),
        general::help(),
        general::about(),
        general::latest(),
        general::ping(),
        general::invite(),
        general::stats(),
    ]
}

/// Platform gateway over the invoking context's client
pub fn gateway(ctx: Context<'_>) -> Arc<dyn PlatformGateway> {
    Arc::new(DiscordGateway::new(ctx.serenity_context().clone()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use poise::serenity_prelude::Permissions;

    use super::*;

    #[test]
    fn test_command_names_are_unique() {
        let commands = all();
        let names: HashSet<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), commands.len());
        assert_eq!(commands.len(), 13);
    }

    #[test]
    fn test_each_command_is_gated_by_its_own_permission() {
        let expected = [
            ("kick", Permissions::KICK_MEMBERS),
            ("ban", Permissions::BAN_MEMBERS),
            ("mute", Permissions::MANAGE_MESSAGES),
            ("unmute", Permissions::MANAGE_MESSAGES),
            ("clear", Permissions::MANAGE_MESSAGES),
            ("warn", Permissions::MANAGE_MESSAGES),
            ("warnings", Permissions::MANAGE_MESSAGES),
            ("help", Permissions::empty()),
            ("about", Permissions::empty()),
            ("latest", Permissions::empty()),
            ("ping", Permissions::empty()),
            ("invite", Permissions::empty()),
            ("stats", Permissions::empty()),
        ];

        let commands = all();
        for (name, permissions) in expected {
            let command = commands
                .iter()
                .find(|c| c.name == name)
                .unwrap_or_else(|| panic!("{} is registered", name));
            assert_eq!(command.required_permissions, permissions, "{}", name);
        }
    }

    #[test]
    fn test_server_only_commands() {
        for command in all() {
            let server_only = command.category.as_deref() == Some("Moderation")
                || command.name == "stats";
            assert_eq!(command.guild_only, server_only, "{}", command.name);
        }
    }
}
