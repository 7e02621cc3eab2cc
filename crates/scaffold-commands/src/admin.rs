//! Commands restricted to a guild's administrators.

use crate::embeds::{error_embed, success_embed};
use crate::framework::{Command, Context, Error};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use scaffold_common::{ChannelId, GuildId};
use tracing::info;

/// Commands of the admin module.
pub fn commands() -> Vec<Command> {
    vec![bind_log_channel()]
}

/// Bind the channel for bot logs in this guild.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "ADMINISTRATOR",
    category = "Admin"
)]
pub async fn bind_log_channel(
    ctx: Context<'_>,
    #[description = "Channel the bot should post its logs in"]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    ctx.defer().await?;

    let guild_id = ctx.guild_id().ok_or("bind_log_channel can only be used in a guild")?;
    let bound = ctx
        .data()
        .guilds
        .bind_log_channel(GuildId(guild_id.get()), ChannelId(channel.id.get()))
        .await?;

    let embed = if bound {
        let author = ctx.author();
        info!(
            "{}[{}] bound {}[{}] for logging.",
            author.name, author.id, channel.name, channel.id
        );
        success_embed(format!("Bound <#{}> for logging.", channel.id))
    } else {
        error_embed("This server is not registered yet, so no log channel was bound.")
    };

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
