//! Commands only the bot owner can run.

use crate::embeds::{error_embed, success_embed};
use crate::framework::{Command, Context, Error};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use scaffold_common::logging::LOG_FILE_PREFIX;
use scaffold_common::latest_log_file;
use tracing::info;

/// Commands of the owner module.
pub fn commands() -> Vec<Command> {
    vec![owner()]
}

/// Activity shown in the bot's presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum StatusKind {
    /// "Playing ..."
    Playing,
    /// "Listening to ..."
    Listening,
    /// "Watching ..."
    Watching,
    /// "Competing in ..."
    Competing,
}

impl StatusKind {
    /// Activity payload for the gateway.
    pub fn activity(self, status: &str) -> serenity::ActivityData {
        match self {
            Self::Playing => serenity::ActivityData::playing(status),
            Self::Listening => serenity::ActivityData::listening(status),
            Self::Watching => serenity::ActivityData::watching(status),
            Self::Competing => serenity::ActivityData::competing(status),
        }
    }

    /// Verb phrase shown in front of the status text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Listening => "Listening to",
            Self::Watching => "Watching",
            Self::Competing => "Competing in",
        }
    }
}

/// Top-level command group for owner commands.
#[poise::command(
    slash_command,
    owners_only,
    category = "Owner",
    subcommands("set_status", "toggle", "download_log"),
    subcommand_required
)]
pub async fn owner(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Set the bot's presence/status.
#[poise::command(slash_command, owners_only, category = "Owner")]
pub async fn set_status(
    ctx: Context<'_>,
    #[description = "The type of activity for the status"] kind: StatusKind,
    #[description = "The status to set"] status: String,
) -> Result<(), Error> {
    ctx.serenity_context()
        .set_activity(Some(kind.activity(&status)));
    info!("Changing status to '{status}'");

    let message = format!("Changed status to\n> {} {status}", kind.label());
    ctx.send(CreateReply::default().embed(success_embed(message)))
        .await?;
    Ok(())
}

/// Flip the global example toggle.
#[poise::command(slash_command, owners_only, category = "Owner")]
pub async fn toggle(ctx: Context<'_>) -> Result<(), Error> {
    let enabled = ctx.data().settings.toggle().await?;
    let state = if enabled { "on" } else { "off" };

    ctx.send(CreateReply::default().embed(success_embed(format!("Toggle is now `{state}`"))))
        .await?;
    Ok(())
}

/// Download the current log file.
#[poise::command(slash_command, owners_only, category = "Owner")]
pub async fn download_log(ctx: Context<'_>) -> Result<(), Error> {
    let log_dir = ctx.data().log_dir();

    let reply = match latest_log_file(&log_dir, LOG_FILE_PREFIX)? {
        Some(path) => {
            CreateReply::default().attachment(serenity::CreateAttachment::path(&path).await?)
        }
        None => CreateReply::default().embed(error_embed(format!(
            "No log file found in {}",
            log_dir.display()
        ))),
    };

    ctx.send(reply.ephemeral(true)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        assert_eq!(StatusKind::Listening.label(), "Listening to");
        assert_eq!(StatusKind::Playing.label(), "Playing");
    }

    #[test]
    fn test_owner_group_shape() {
        let group = owner();
        assert!(group.owners_only);
        let names: Vec<_> = group.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["set_status", "toggle", "download_log"]);
    }
}
