use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GatewayIntents};
use tracing::{error, info, warn};

use crate::bot::data::{Context, Data};
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::handlers::event_handler::event_handler;

pub async fn run(settings: Settings) -> Result<(), Error> {
    let token = settings.discord_token.clone();
    let prefix = settings.command_prefix.clone();
    let data = Arc::new(Data::new(settings));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Bot connected as {}", ready.user.name);
                info!("Muted role name: {}", data.mutes.role_name());
                Ok(data)
            })
        })
        .build();

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}

/// Turn framework failures into the replies members see
async fn on_error(error: poise::FrameworkError<'_, Arc<Data>, Error>) {
    match error {
        poise::FrameworkError::UnknownCommand { ctx, msg, prefix, .. } => {
            if let Err(e) = msg.channel_id.say(ctx, unknown_command_reply(prefix)).await {
                warn!("Failed to reply to unknown command: {:?}", e);
            }
        }
        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            let prefix = &ctx.data().settings.command_prefix;
            let command = &ctx.command().name;

            let reply = match input {
                Some(input) => {
                    info!("Invalid argument {:?} for {}: {}", input, command, error);
                    invalid_argument_reply(prefix, command)
                }
                None => {
                    let supplied = match ctx {
                        poise::Context::Prefix(prefix_ctx) => {
                            prefix_ctx.args.split_whitespace().count()
                        }
                        poise::Context::Application(_) => 0,
                    };
                    let parameters = ctx
                        .command()
                        .parameters
                        .iter()
                        .map(|p| (p.name.as_str(), p.required));
                    let missing = missing_parameter(parameters, supplied).unwrap_or("argument");
                    missing_argument_reply(prefix, command, missing)
                }
            };
            say(ctx, reply).await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            say(ctx, "❌ You don't have permission to use this command.".to_string()).await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            say(ctx, format!("❌ {}", Error::GuildOnly)).await;
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command {}: {:?}", ctx.command().name, error);
            say(ctx, "❌ An error occurred while processing the command.".to_string()).await;
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Event handler error in {}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        err => {
            error!("Framework error: {:?}", err);
        }
    }
}

async fn say(ctx: Context<'_>, reply: String) {
    if let Err(e) = ctx.say(reply).await {
        warn!("Failed to send error reply in {}: {:?}", ctx.channel_id(), e);
    }
}

fn unknown_command_reply(prefix: &str) -> String {
    format!(
        "❌ Command not found. Use `{}help` to see available commands.",
        prefix
    )
}

fn missing_argument_reply(prefix: &str, command: &str, parameter: &str) -> String {
    format!(
        "❌ Missing required argument: {}\nUse `{}help {}` for usage.",
        parameter, prefix, command
    )
}

fn invalid_argument_reply(prefix: &str, command: &str) -> String {
    format!(
        "❌ Invalid argument provided. Use `{}help {}` for usage.",
        prefix, command
    )
}

/// First required parameter the supplied arguments did not reach
fn missing_parameter<'a>(
    parameters: impl IntoIterator<Item = (&'a str, bool)>,
    supplied: usize,
) -> Option<&'a str> {
    parameters
        .into_iter()
        .enumerate()
        .find(|(index, (_, required))| *required && *index >= supplied)
        .map(|(_, (name, _))| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters_of(name: &str) -> Vec<(String, bool)> {
        commands::all()
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| {
                c.parameters
                    .iter()
                    .map(|p| (p.name.clone(), p.required))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn missing_for(name: &str, supplied: usize) -> Option<String> {
        let parameters = parameters_of(name);
        missing_parameter(parameters.iter().map(|(n, r)| (n.as_str(), *r)), supplied)
            .map(str::to_string)
    }

    #[test]
    fn test_missing_member_is_named() {
        assert_eq!(missing_for("kick", 0).as_deref(), Some("member"));
        assert_eq!(missing_for("mute", 0).as_deref(), Some("member"));
        assert_eq!(missing_for("warnings", 0).as_deref(), Some("member"));
    }

    #[test]
    fn test_optional_parameters_are_never_missing() {
        assert_eq!(missing_for("mute", 1), None);
        assert_eq!(missing_for("clear", 0), None);
        assert_eq!(missing_for("help", 0), None);
    }

    #[test]
    fn test_missing_parameter_skips_supplied_ones() {
        let parameters = [("channel", true), ("limit", false), ("reason", true)];
        assert_eq!(missing_parameter(parameters, 0), Some("channel"));
        assert_eq!(missing_parameter(parameters, 1), Some("reason"));
        assert_eq!(missing_parameter(parameters, 3), None);
    }

    #[test]
    fn test_error_replies() {
        assert_eq!(
            unknown_command_reply("!"),
            "❌ Command not found. Use `!help` to see available commands."
        );
        assert_eq!(
            missing_argument_reply("!", "kick", "member"),
            "❌ Missing required argument: member\nUse `!help kick` for usage."
        );
        assert_eq!(
            invalid_argument_reply("?", "clear"),
            "❌ Invalid argument provided. Use `?help clear` for usage."
        );
    }
}
