use serenity::all::{ChannelId, Message, MessageId};
use tracing::{debug, info, warn};

use crate::bot::data::Data;
use crate::platform::PlatformGateway;

/// The parts of a created message the bot acts on
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_is_bot: bool,
}

impl From<&Message> for IncomingMessage {
    fn from(message: &Message) -> Self {
        Self {
            channel_id: message.channel_id,
            message_id: message.id,
            author_is_bot: message.author.bot,
        }
    }
}

/// Commands are dispatched by the framework; this only covers auto-reactions.
pub async fn handle_message(gateway: &dyn PlatformGateway, data: &Data, message: IncomingMessage) {
    if message.author_is_bot {
        return;
    }

    auto_react(gateway, data, &message).await;
}

/// React to every message in the configured channels.
/// Each reaction is attempted even when an earlier one failed.
async fn auto_react(gateway: &dyn PlatformGateway, data: &Data, message: &IncomingMessage) {
    let settings = &data.settings;
    if settings.auto_react_channels.is_empty() || settings.auto_react_emojis.is_empty() {
        return;
    }

    let channel_name = match gateway.channel_name(message.channel_id).await {
        Ok(Some(name)) => name,
        Ok(None) => return,
        Err(e) => {
            debug!("Could not resolve channel {}: {:?}", message.channel_id, e);
            return;
        }
    };

    if !settings.auto_react_channels.contains(&channel_name) {
        return;
    }

    let mut added = 0;
    for emoji in &settings.auto_react_emojis {
        match gateway
            .add_reaction(message.channel_id, message.message_id, emoji)
            .await
        {
            Ok(()) => added += 1,
            Err(e) => warn!(
                "Failed to add reaction {} in {}: {:?}",
                emoji, channel_name, e
            ),
        }
    }

    info!("Added {} reaction(s) to message in {}", added, channel_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{GatewayCall, MockGateway};

    fn message(channel_id: ChannelId) -> IncomingMessage {
        IncomingMessage {
            channel_id,
            message_id: MessageId::new(321),
            author_is_bot: false,
        }
    }

    fn reactions(mock: &MockGateway) -> Vec<String> {
        mock.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::AddReaction(_, _, emoji) => Some(emoji),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reacts_in_blog_updates() {
        let blog = ChannelId::new(600);
        let mock = MockGateway::new().with_channel(blog, "blog-updates");

        handle_message(&mock, &Data::for_tests(), message(blog)).await;
        assert_eq!(reactions(&mock), vec!["👍", "💬", "🔖"]);
    }

    #[tokio::test]
    async fn test_failed_reaction_does_not_stop_the_rest() {
        let blog = ChannelId::new(600);
        let mock = MockGateway::new().with_channel(blog, "blog-updates");
        mock.fail_reaction("💬");

        handle_message(&mock, &Data::for_tests(), message(blog)).await;
        assert_eq!(reactions(&mock), vec!["👍", "💬", "🔖"]);
    }

    #[tokio::test]
    async fn test_no_reactions_elsewhere() {
        let general = ChannelId::new(601);
        let mock = MockGateway::new().with_channel(general, "general");

        handle_message(&mock, &Data::for_tests(), message(general)).await;
        assert!(reactions(&mock).is_empty());
    }

    #[tokio::test]
    async fn test_bot_messages_are_ignored() {
        let blog = ChannelId::new(600);
        let mock = MockGateway::new().with_channel(blog, "blog-updates");
        let mut incoming = message(blog);
        incoming.author_is_bot = true;

        handle_message(&mock, &Data::for_tests(), incoming).await;
        assert!(mock.calls().is_empty());
    }
}
