//! Persisted document models.

use crate::document::Document;
use scaffold_common::{ChannelId, GuildId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Global bot settings. Exactly one record is expected to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSettings {
    /// Primary key.
    pub id: Uuid,
    /// Example global switch flipped by the owner.
    pub toggle: bool,
}

impl BotSettings {
    /// Fresh settings with the toggle off.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            toggle: false,
        }
    }
}

impl Default for BotSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for BotSettings {
    const COLLECTION: &'static str = "settings";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// One record per guild the bot has joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRecord {
    /// Primary key.
    pub id: Uuid,
    /// Discord guild id, unique across records.
    pub guild_id: GuildId,
    /// Guild display name.
    pub name: String,
    /// Channel the bot posts its logs to, if any.
    pub bot_log_channel_id: Option<ChannelId>,
}

impl GuildRecord {
    /// New record for a guild that was just joined.
    pub fn new(guild_id: GuildId, name: impl Into<String>, log_channel: Option<ChannelId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            guild_id,
            name: name.into(),
            bot_log_channel_id: log_channel,
        }
    }
}

impl Document for GuildRecord {
    const COLLECTION: &'static str = "guilds";

    fn id(&self) -> Uuid {
        self.id
    }
}
