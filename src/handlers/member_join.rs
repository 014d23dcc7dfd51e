use serenity::all::{CreateEmbedFooter, GuildId, Member, UserId};
use tracing::{debug, info, warn};

use crate::bot::data::Data;
use crate::constants::embeds::{self, bullet_list};
use crate::constants::links::WEBSITE_URL;
use crate::platform::{OutgoingMessage, PlatformGateway};
use crate::utils::formatting::{channel_ref, mention_user};

/// Who joined, as far as the welcome message is concerned
#[derive(Debug, Clone)]
pub struct NewMember {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub name: String,
    pub avatar_url: String,
}

impl From<&Member> for NewMember {
    fn from(member: &Member) -> Self {
        Self {
            guild_id: member.guild_id,
            user_id: member.user.id,
            name: member.user.name.clone(),
            avatar_url: member.user.face(),
        }
    }
}

/// Post a welcome embed in the first configured welcome channel that exists.
pub async fn handle_member_join(gateway: &dyn PlatformGateway, data: &Data, member: NewMember) {
    info!("New member joined: {}", member.name);

    let channel_id = match gateway
        .find_text_channel(member.guild_id, &data.settings.welcome_channels)
        .await
    {
        Ok(Some(channel_id)) => channel_id,
        Ok(None) => {
            debug!("No welcome channel in guild {}", member.guild_id);
            return;
        }
        Err(e) => {
            warn!("Failed to look up welcome channel: {:?}", e);
            return;
        }
    };

    let prefix = &data.settings.command_prefix;
    let latest_posts = format!("Check out our latest posts at [pandaudit.com]({})", WEBSITE_URL);
    let showcase = format!(
        "Share your automation wins in {}",
        channel_ref(&data.settings.showcase_channel)
    );
    let help = format!("`{}help` - See all commands", prefix);
    let latest = format!("`{}latest` - Get the latest blog post", prefix);
    let about = format!("`{}about` - Learn about PANDAUDIT", prefix);

    let embed = embeds::standard_embed()
        .title("Welcome to PANDAUDIT Community! 👋")
        .description(format!(
            "Hey {}, welcome to our community of data analytics enthusiasts!",
            mention_user(member.user_id)
        ))
        .field(
            "🚀 Get Started",
            bullet_list(&[&latest_posts, "Ask questions in the help channels", &showcase]),
            false,
        )
        .field("💡 Quick Commands", bullet_list(&[&help, &latest, &about]), false)
        .thumbnail(member.avatar_url)
        .footer(CreateEmbedFooter::new("Happy learning! 🎉"));

    if let Err(e) = gateway
        .send_message(channel_id, OutgoingMessage::embed(embed))
        .await
    {
        warn!("Failed to send welcome message: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{GatewayCall, MockGateway};
    use serenity::all::ChannelId;

    const GUILD: GuildId = GuildId::new(7);

    fn newcomer() -> NewMember {
        NewMember {
            guild_id: GUILD,
            user_id: UserId::new(42),
            name: "carol".to_string(),
            avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_welcome_goes_to_first_matching_channel() {
        let mock = MockGateway::new()
            .with_channel(ChannelId::new(10), "general")
            .with_channel(ChannelId::new(11), "welcome");

        handle_member_join(&mock, &Data::for_tests(), newcomer()).await;
        assert_eq!(
            mock.calls(),
            vec![GatewayCall::SendMessage(ChannelId::new(11), None, true)]
        );
    }

    #[tokio::test]
    async fn test_no_welcome_channel() {
        let mock = MockGateway::new().with_channel(ChannelId::new(10), "random");

        handle_member_join(&mock, &Data::for_tests(), newcomer()).await;
        assert!(mock.calls().is_empty());
    }
}
