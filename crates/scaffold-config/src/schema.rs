//! Configuration schema definitions.

use crate::defaults::{default_log_dir, default_temp_root, LIVE_NAMESPACE, TEST_NAMESPACE};
use scaffold_common::{GuildId, ScaffoldError};
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for the bot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log at debug level instead of info.
    pub debug: bool,
    /// Let serenity/poise log at debug level.
    pub framework_logging: bool,
    /// Use the test database namespace.
    pub test_mode: bool,
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// NASA API configuration.
    pub nasa: NasaConfig,
    /// Filesystem locations.
    pub paths: PathsConfig,
}

/// Discord bot configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Guilds commands are registered in.
    pub test_guild_ids: Vec<GuildId>,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("test_guild_ids", &self.test_guild_ids)
            .finish()
    }
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URI, `sled://<path>` or a bare path.
    pub uri: String,
}

/// NASA API configuration.
#[derive(Clone)]
pub struct NasaConfig {
    /// API key for the EPIC image feed.
    pub api_key: String,
}

impl fmt::Debug for NasaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NasaConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Root under which the scratch workspace lives.
    pub temp_root: PathBuf,
    /// Directory for rotated log files.
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Database namespace selected by the test-mode flag.
    pub const fn namespace(&self) -> &'static str {
        if self.test_mode {
            TEST_NAMESPACE
        } else {
            LIVE_NAMESPACE
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        if self.discord.token.trim().is_empty() {
            return Err(ScaffoldError::validation_field(
                "Discord token cannot be empty",
                "DISCORD_BOT_TOKEN",
            ));
        }

        if self.discord.test_guild_ids.is_empty() {
            return Err(ScaffoldError::validation_field(
                "At least one test guild is required",
                "TEST_GUILD_ID",
            ));
        }

        if self.database.uri.trim().is_empty() {
            return Err(ScaffoldError::validation_field(
                "Database URI cannot be empty",
                "DATABASE_URI",
            ));
        }

        if self.nasa.api_key.trim().is_empty() {
            return Err(ScaffoldError::validation_field(
                "NASA API key cannot be empty",
                "NASA_KEY",
            ));
        }

        Ok(())
    }
}
