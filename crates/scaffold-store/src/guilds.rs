//! Per-guild records.

use crate::database::Namespace;
use crate::document::Collection;
use crate::models::GuildRecord;
use crate::Result;
use scaffold_common::{ChannelId, GuildId};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Result of handling a guild join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new record was inserted.
    Created(GuildRecord),
    /// The guild already had a record; nothing changed.
    AlreadyRegistered(GuildRecord),
}

impl JoinOutcome {
    /// Whether the join created a record.
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Record the outcome refers to.
    pub const fn record(&self) -> &GuildRecord {
        match self {
            Self::Created(record) | Self::AlreadyRegistered(record) => record,
        }
    }
}

/// Service owning the `guilds` collection.
#[derive(Debug)]
pub struct GuildRegistry {
    collection: Collection<GuildRecord>,
    write_lock: Mutex<()>,
}

impl GuildRegistry {
    /// Opens the guilds collection in `namespace`.
    pub fn new(namespace: &Namespace) -> Result<Self> {
        Ok(Self {
            collection: namespace.collection()?,
            write_lock: Mutex::new(()),
        })
    }

    /// Record for `guild_id`, if one exists.
    pub fn find(&self, guild_id: GuildId) -> Result<Option<GuildRecord>> {
        self.collection.find_one(|record| record.guild_id == guild_id)
    }

    /// Every stored guild record.
    pub fn all(&self) -> Result<Vec<GuildRecord>> {
        self.collection.find_all()
    }

    /// Registers a guild the bot just joined.
    ///
    /// `default_channel` becomes the initial log channel.
    pub async fn on_join(
        &self,
        guild_id: GuildId,
        name: &str,
        default_channel: Option<ChannelId>,
    ) -> Result<JoinOutcome> {
        let _guard = self.write_lock.lock().await;

        if let Some(existing) = self.find(guild_id)? {
            debug!("Guild {guild_id} already registered");
            return Ok(JoinOutcome::AlreadyRegistered(existing));
        }

        let record = GuildRecord::new(guild_id, name, default_channel);
        self.collection.insert_one(&record).await?;
        info!("Registered guild {name} ({guild_id})");
        Ok(JoinOutcome::Created(record))
    }

    /// Updates the stored name. Returns `false` for an unknown guild.
    pub async fn on_rename(&self, guild_id: GuildId, new_name: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.find(guild_id)? else {
            debug!("Rename for unknown guild {guild_id} ignored");
            return Ok(false);
        };

        if record.name != new_name {
            info!("Guild {guild_id} renamed from {} to {new_name}", record.name);
            record.name = new_name.to_string();
            self.collection.save(&record).await?;
        }
        Ok(true)
    }

    /// Sets the log channel of a guild. Returns `false` for an unknown guild.
    pub async fn bind_log_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.find(guild_id)? else {
            debug!("Log channel bind for unknown guild {guild_id} ignored");
            return Ok(false);
        };

        record.bot_log_channel_id = Some(channel_id);
        self.collection.save(&record).await?;
        info!("Guild {guild_id} now logs to channel {channel_id}");
        Ok(true)
    }

    /// Number of stored guild records.
    pub fn count(&self) -> usize {
        self.collection.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn registry() -> (Database, GuildRegistry) {
        let db = Database::temporary().unwrap();
        let registry = GuildRegistry::new(&db.namespace("test-scaffold-bot")).unwrap();
        (db, registry)
    }

    #[tokio::test]
    async fn test_join_twice_keeps_one_record() {
        let (_db, registry) = registry();

        let first = registry
            .on_join(GuildId(42), "Test Guild", Some(ChannelId(100)))
            .await
            .unwrap();
        let second = registry
            .on_join(GuildId(42), "Test Guild", Some(ChannelId(100)))
            .await
            .unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(first.record(), second.record());
        assert_eq!(registry.count(), 1);
    }

    #[tokio::test]
    async fn test_join_without_default_channel() {
        let (_db, registry) = registry();
        registry.on_join(GuildId(7), "Quiet", None).await.unwrap();

        let record = registry.find(GuildId(7)).unwrap().unwrap();
        assert_eq!(record.bot_log_channel_id, None);
    }

    #[tokio::test]
    async fn test_rename_updates_only_name() {
        let (_db, registry) = registry();
        let created = registry
            .on_join(GuildId(42), "Test Guild", Some(ChannelId(100)))
            .await
            .unwrap();

        assert!(registry.on_rename(GuildId(42), "Renamed").await.unwrap());

        let record = registry.find(GuildId(42)).unwrap().unwrap();
        assert_eq!(record.name, "Renamed");
        assert_eq!(record.id, created.record().id);
        assert_eq!(record.bot_log_channel_id, Some(ChannelId(100)));
    }

    #[tokio::test]
    async fn test_rename_unknown_guild_is_noop() {
        let (_db, registry) = registry();
        registry.on_join(GuildId(1), "One", None).await.unwrap();

        assert!(!registry.on_rename(GuildId(2), "Two").await.unwrap());
        assert_eq!(registry.count(), 1);
        assert!(registry.find(GuildId(2)).unwrap().is_none());
        assert_eq!(registry.find(GuildId(1)).unwrap().unwrap().name, "One");
    }

    #[tokio::test]
    async fn test_bind_log_channel() {
        let (_db, registry) = registry();
        registry.on_join(GuildId(42), "Test Guild", None).await.unwrap();

        assert!(registry
            .bind_log_channel(GuildId(42), ChannelId(555))
            .await
            .unwrap());
        assert_eq!(
            registry.find(GuildId(42)).unwrap().unwrap().bot_log_channel_id,
            Some(ChannelId(555))
        );

        assert!(!registry
            .bind_log_channel(GuildId(43), ChannelId(555))
            .await
            .unwrap());
    }
}
