//! Poise framework setup: shared data, hooks and error reporting.

use crate::embeds::error_embed;
use crate::events::event_handler;
use crate::http::HttpSession;
use poise::CreateReply;
use scaffold_common::TempWorkspace;
use scaffold_config::Config;
use scaffold_store::{GuildRegistry, SettingsStore};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Application data accessible in all commands and event handlers.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Global bot settings.
    pub settings: Arc<SettingsStore>,
    /// Per-guild records.
    pub guilds: Arc<GuildRegistry>,
    /// Scratch directory for downloads.
    pub workspace: Arc<TempWorkspace>,
    /// Shared outbound HTTP client.
    pub http: HttpSession,
}

impl Data {
    /// Directory holding the rotated log files.
    pub fn log_dir(&self) -> PathBuf {
        self.config.paths.log_dir.clone()
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("config", &self.config)
            .field("workspace", &self.workspace.path())
            .field("http_open", &self.http.is_open())
            .finish_non_exhaustive()
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// A command bound to [`Data`].
pub type Command = poise::Command<Data, Error>;

/// Framework options wiring the given commands to the shared hooks.
pub fn framework_options(commands: Vec<Command>) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands,
        on_error: |error| Box::pin(on_error(error)),
        pre_command: |ctx| Box::pin(pre_command(ctx)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    }
}

/// Global error handler for the framework.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup {
            error, framework, ..
        } => {
            // Without user data every later event would wait forever.
            error!("Failed to start bot: {:?}", error);
            framework.shard_manager().shutdown_all().await;
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Error in command '{}': {:?}",
                ctx.command().qualified_name,
                error
            );
            let reply = CreateReply::default().embed(error_embed(error.to_string()));
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to report command error: {e}");
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Error in event handler for {:?}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

async fn pre_command(ctx: Context<'_>) {
    let guild = ctx
        .guild_id()
        .map(|id| {
            let name = ctx.guild().map(|guild| guild.name.clone());
            (name.unwrap_or_else(|| "unknown".to_string()), id.get())
        });
    let author = ctx.author();
    let command = ctx.command();

    info!(
        "{}",
        invocation_line(
            guild.as_ref().map(|(name, id)| (name.as_str(), *id)),
            ctx.channel_id().get(),
            (&author.name, author.id.get()),
            command.category.as_deref(),
            &command.qualified_name,
        )
    );
}

/// Formats the audit line logged before every command.
pub fn invocation_line(
    guild: Option<(&str, u64)>,
    channel_id: u64,
    author: (&str, u64),
    category: Option<&str>,
    command: &str,
) -> String {
    let guild = guild.map_or_else(
        || "DM".to_string(),
        |(name, id)| format!("{name}[{id}]"),
    );
    let category = category.unwrap_or("General");
    format!(
        "{guild} | channel[{channel_id}] | {}[{}] | Invoked {category}::{command}",
        author.0, author.1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_line_in_guild() {
        let line = invocation_line(
            Some(("Test Guild", 42)),
            100,
            ("alice", 7),
            Some("Owner"),
            "owner toggle",
        );
        assert_eq!(
            line,
            "Test Guild[42] | channel[100] | alice[7] | Invoked Owner::owner toggle"
        );
    }

    #[test]
    fn test_invocation_line_in_dm() {
        let line = invocation_line(None, 5, ("bob", 9), None, "earth");
        assert!(line.starts_with("DM | channel[5]"));
        assert!(line.ends_with("Invoked General::earth"));
    }
}
