//! Gateway event handlers.

use crate::embeds::welcome_embed;
use crate::framework::{Data, Error};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use scaffold_common::{ChannelId, GuildId};
use scaffold_store::{GuildRegistry, JoinOutcome};
use tracing::{debug, info, warn};

/// Sends the greeting after the bot joins a guild.
#[async_trait]
pub trait WelcomeNotifier: Send + Sync {
    /// Posts the welcome embed to `channel`.
    async fn send_welcome(&self, channel: ChannelId, bot_name: &str) -> Result<(), Error>;
}

#[async_trait]
impl WelcomeNotifier for serenity::Http {
    async fn send_welcome(&self, channel: ChannelId, bot_name: &str) -> Result<(), Error> {
        serenity::ChannelId::new(channel.0)
            .send_message(self, serenity::CreateMessage::new().embed(welcome_embed(bot_name)))
            .await?;
        Ok(())
    }
}

/// Registers a newly joined guild and greets it in its system channel.
///
/// Nothing is sent when the guild was already registered or has no system
/// channel.
pub async fn handle_guild_join<N>(
    registry: &GuildRegistry,
    notifier: &N,
    guild_id: GuildId,
    name: &str,
    system_channel: Option<ChannelId>,
    bot_name: &str,
) -> Result<JoinOutcome, Error>
where
    N: WelcomeNotifier + ?Sized,
{
    info!("Joined {name}[{guild_id}]");

    let outcome = registry.on_join(guild_id, name, system_channel).await?;
    if !outcome.is_created() {
        return Ok(outcome);
    }
    info!("Created database entries for guild {name}[{guild_id}]");

    match system_channel {
        Some(channel) => notifier.send_welcome(channel, bot_name).await?,
        None => debug!("Guild {guild_id} has no system channel; skipping welcome"),
    }
    Ok(outcome)
}

/// Central event handler for Discord events.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if *is_new == Some(false) {
                debug!("Guild {} available from cache", guild.id);
                return Ok(());
            }
            let bot_name = ctx.cache.current_user().name.clone();
            handle_guild_join(
                &data.guilds,
                &*ctx.http,
                GuildId(guild.id.get()),
                &guild.name,
                guild.system_channel_id.map(|id| ChannelId(id.get())),
                &bot_name,
            )
            .await?;
        }
        serenity::FullEvent::GuildUpdate {
            old_data_if_available,
            new_data,
        } => {
            let renamed = old_data_if_available
                .as_ref()
                .map_or(true, |old| old.name != new_data.name);
            if renamed
                && data
                    .guilds
                    .on_rename(GuildId(new_data.id.get()), &new_data.name)
                    .await?
            {
                info!("{} | Changed guild name to {}", new_data.id, new_data.name);
            }
        }
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Bot ready event received for: {}", data_about_bot.user.name);
        }
        serenity::FullEvent::ShardStageUpdate { event } => {
            log_stage(event.shard_id.0, event.new);
        }
        _ => {}
    }
    Ok(())
}

fn log_stage(shard: u32, stage: serenity::ConnectionStage) {
    match stage {
        serenity::ConnectionStage::Connected => info!("CONNECTED TO DISCORD [shard {shard}]"),
        serenity::ConnectionStage::Connecting | serenity::ConnectionStage::Resuming => {
            info!("RECONNECTING TO DISCORD [shard {shard}]");
        }
        serenity::ConnectionStage::Disconnected => {
            warn!("DISCONNECTED FROM DISCORD [shard {shard}]");
        }
        other => debug!("Shard {shard} entered stage {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use scaffold_store::Database;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<ChannelId>>,
    }

    #[async_trait]
    impl WelcomeNotifier for Recorder {
        async fn send_welcome(&self, channel: ChannelId, _bot_name: &str) -> Result<(), Error> {
            self.sent.lock().push(channel);
            Ok(())
        }
    }

    fn registry() -> (Database, GuildRegistry) {
        let db = Database::temporary().unwrap();
        let registry = GuildRegistry::new(&db.namespace("test-scaffold-bot")).unwrap();
        (db, registry)
    }

    #[tokio::test]
    async fn test_no_welcome_without_system_channel() {
        let (_db, registry) = registry();
        let recorder = Recorder::default();

        let outcome = handle_guild_join(&registry, &recorder, GuildId(5), "Quiet", None, "bot")
            .await
            .unwrap();

        assert!(outcome.is_created());
        assert!(recorder.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_rejoin_is_not_greeted_twice() {
        let (_db, registry) = registry();
        let recorder = Recorder::default();

        for _ in 0..2 {
            handle_guild_join(
                &registry,
                &recorder,
                GuildId(5),
                "Loud",
                Some(ChannelId(9)),
                "bot",
            )
            .await
            .unwrap();
        }

        assert_eq!(*recorder.sent.lock(), vec![ChannelId(9)]);
        assert_eq!(registry.count(), 1);
    }
}
