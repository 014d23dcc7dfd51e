use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, ActivityData, FullEvent};
use tracing::{debug, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::handlers::member_join::{self, NewMember};
use crate::handlers::message::{self, IncomingMessage};
use crate::platform::DiscordGateway;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!(
                "Bot logged in as {} (ID: {})",
                data_about_bot.user.name, data_about_bot.user.id
            );
            info!("Connected to {} guild(s)", data_about_bot.guilds.len());

            ctx.set_activity(Some(ActivityData::watching(&data.settings.bot_status)));
            info!("Bot is ready!");
        }

        FullEvent::GuildMemberAddition { new_member } => {
            let gateway = DiscordGateway::new(ctx.clone());
            member_join::handle_member_join(&gateway, data, NewMember::from(new_member)).await;
        }

        FullEvent::Message { new_message } => {
            let gateway = DiscordGateway::new(ctx.clone());
            message::handle_message(&gateway, data, IncomingMessage::from(new_message)).await;
        }

        FullEvent::GuildDelete { incomplete, .. } => {
            debug!("Guild {} removed", incomplete.id);
        }

        _ => {}
    }

    Ok(())
}
