use std::sync::Arc;

use chrono::DateTime;
use poise::serenity_prelude::{ChannelType, CreateEmbedFooter, OnlineStatus, Timestamp};
use poise::CreateReply;

use crate::bot::data::{Context, Data};
use crate::bot::error::Error;
use crate::constants::embeds::{self, bullet_list};
use crate::constants::links::{
    ABOUT_URL, AVATAR_URL, BLOG_URL, CHEATSHEET_URL, STORIES_URL, WEBSITE_URL,
};
use crate::utils::formatting::{channel_ref, format_date, format_number};

type Command = poise::Command<Arc<Data>, Error>;

/// `<required>` and `[optional]` arguments after the command name
pub fn usage(prefix: &str, command: &Command) -> String {
    let mut line = format!("`{}{}", prefix, command.name);
    for parameter in &command.parameters {
        if parameter.required {
            line.push_str(&format!(" <{}>", parameter.name));
        } else {
            line.push_str(&format!(" [{}]", parameter.name));
        }
    }
    line.push('`');
    line
}

fn category_listing(prefix: &str, commands: &[Command], category: &str) -> String {
    commands
        .iter()
        .filter(|command| command.category.as_deref() == Some(category))
        .map(|command| {
            format!(
                "{} - {}",
                usage(prefix, command),
                command.description.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Show all commands, or usage for one
#[poise::command(prefix_command, category = "General")]
pub async fn help(ctx: Context<'_>, command: Option<String>) -> Result<(), Error> {
    let prefix = ctx.data().settings.command_prefix.as_str();
    let commands = &ctx.framework().options().commands;

    if let Some(name) = command {
        let name = name.trim_start_matches(prefix).to_lowercase();
        match commands.iter().find(|c| c.name == name) {
            Some(found) => {
                let embed = embeds::standard_embed()
                    .title(format!("📖 Help: {}", found.name))
                    .description(found.description.clone().unwrap_or_default())
                    .field("Usage", usage(prefix, found), false);
                ctx.send(CreateReply::default().embed(embed)).await?;
            }
            None => {
                ctx.say(format!("❌ Command `{}` not found.", name)).await?;
            }
        }
        return Ok(());
    }

    let embed = embeds::standard_embed()
        .title("🤖 PANDAUDIT Bot Commands")
        .description(format!(
            "Here are all available commands. Use `{}help <command>` for detailed information.",
            prefix
        ))
        .field(
            "🛡️ Moderation Commands",
            category_listing(prefix, commands, "Moderation"),
            false,
        )
        .field(
            "💬 General Commands",
            category_listing(prefix, commands, "General"),
            false,
        )
        .field(
            "🔗 Links",
            format!(
                "[Website]({}) • [Blog]({}) • [Support]({})",
                WEBSITE_URL, BLOG_URL, ABOUT_URL
            ),
            false,
        )
        .footer(CreateEmbedFooter::new(format!(
            "PANDAUDIT Bot • Prefix: {}",
            prefix
        )));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// About PANDAUDIT
#[poise::command(prefix_command, category = "General")]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::standard_embed()
        .title("📊 About PANDAUDIT")
        .url(WEBSITE_URL)
        .description("Empowering finance professionals with data analytics and automation.")
        .field(
            "🎯 Our Mission",
            "We help accounting and finance professionals navigate the evolving data analytics \
             landscape with practical guides, real-world examples, and actionable insights.",
            false,
        )
        .field(
            "💡 What We Cover",
            bullet_list(&[
                "Data Analytics & Visualization",
                "Process Automation",
                "Modern Tools (Python, pandas, Excel)",
                "Real-world Finance Use Cases",
                "Career Development",
            ]),
            false,
        )
        .field(
            "🔗 Links",
            format!(
                "[Website]({}) • [Blog]({}) • [Success Stories]({}) • [Quick Reference]({})",
                WEBSITE_URL, BLOG_URL, STORIES_URL, CHEATSHEET_URL
            ),
            false,
        )
        .thumbnail(AVATAR_URL)
        .footer(CreateEmbedFooter::new(
            "Join our community of data-driven finance professionals!",
        ));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Link to the latest blog posts
#[poise::command(prefix_command, category = "General")]
pub async fn latest(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::success_embed()
        .title("📰 Latest from PANDAUDIT")
        .url(BLOG_URL)
        .description("Check out our latest insights on data analytics and automation!")
        .field("🔗 Visit Blog", format!("[pandaudit.com/blog]({})", BLOG_URL), false)
        .field(
            "📱 Stay Updated",
            format!(
                "New posts are automatically shared in {}!",
                channel_ref(&ctx.data().settings.blog_updates_channel)
            ),
            false,
        )
        .footer(CreateEmbedFooter::new("💬 Share your thoughts after reading!"));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Check the bot's latency
#[poise::command(prefix_command, category = "General")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    // zero until the shard has seen a heartbeat ack
    let latency = ctx.ping().await;
    let latency = if latency.is_zero() {
        "N/A".to_string()
    } else {
        format!("{:.2}ms", latency.as_secs_f64() * 1000.0)
    };

    let embed = embeds::success_embed()
        .title("🏓 Pong!")
        .description("Bot is online and responding.")
        .field("⏱️ Latency", latency, true)
        .field("📊 Status", "✅ Online", true)
        .field("🖥️ Servers", ctx.cache().guilds().len().to_string(), true)
        .timestamp(Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Links for inviting others to the community
#[poise::command(prefix_command, category = "General")]
pub async fn invite(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::standard_embed()
        .title("🔗 Join the PANDAUDIT Community")
        .description(
            "Connect with finance professionals exploring data analytics and automation.",
        )
        .field("🌐 Website", format!("[pandaudit.com]({})", WEBSITE_URL), false)
        .field("📝 Blog", format!("[pandaudit.com/blog]({})", BLOG_URL), true)
        .field(
            "📚 Resources",
            format!("[Quick Reference]({})", CHEATSHEET_URL),
            true,
        )
        .field(
            "💡 Share This Server",
            "Invite colleagues interested in data analytics to this Discord community!",
            false,
        );

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Server statistics
#[poise::command(prefix_command, guild_only, category = "General")]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    // The cache guard must be gone before the reply is awaited
    let embed = {
        let guild = ctx.guild().ok_or(Error::GuildOnly)?;
        let channels_of = |kind: ChannelType| {
            guild
                .channels
                .values()
                .filter(|channel| channel.kind == kind)
                .count()
        };
        let online = guild
            .presences
            .values()
            .filter(|presence| presence.status != OnlineStatus::Offline)
            .count();
        let created = DateTime::from_timestamp(guild.id.created_at().unix_timestamp(), 0)
            .map(format_date)
            .unwrap_or_else(|| "Unknown".to_string());

        let mut embed = embeds::standard_embed()
            .title(format!("📊 {} Statistics", guild.name))
            .field("👥 Total Members", format_number(guild.member_count as i64), true)
            .field("🟢 Online", format_number(online as i64), true)
            .field("📅 Created", created, true)
            .field("💬 Text Channels", channels_of(ChannelType::Text).to_string(), true)
            .field("🔊 Voice Channels", channels_of(ChannelType::Voice).to_string(), true)
            .field("🎭 Roles", guild.roles.len().to_string(), true)
            .timestamp(Timestamp::now());

        if let Some(icon_url) = guild.icon_url() {
            embed = embed.thumbnail(icon_url);
        }
        embed
    };

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
