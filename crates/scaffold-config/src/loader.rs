//! Configuration loading from the process environment.

use crate::defaults::{default_log_dir, default_temp_root};
use crate::schema::{Config, DatabaseConfig, DiscordConfig, NasaConfig, PathsConfig};
use scaffold_common::{parse_flag, GuildId, ScaffoldError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing required configuration: {0}")]
    MissingVar(&'static str),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable that failed to parse
        var: &'static str,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Parsed configuration failed validation
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ScaffoldError),
}

impl From<ConfigError> for ScaffoldError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(inner) => inner,
            other => Self::config_with_source("cannot load configuration", other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `.env` (if present) and reads the configuration from the environment.
    pub fn load() -> Result<Config, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => {
                return Err(ConfigError::EnvParseError {
                    var: ".env",
                    source: Box::new(e),
                })
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::MissingVar(var));

        let debug = parse_flag(&required("DEBUG")?);
        let framework_logging = parse_flag(&required("FRAMEWORK_LOGGING")?);
        let test_mode = parse_flag(&required("TEST_MODE")?);
        let token = required("DISCORD_BOT_TOKEN")?;
        let test_guild_ids = parse_guild_ids(&required("TEST_GUILD_ID")?)?;
        let uri = required("DATABASE_URI")?;
        let api_key = required("NASA_KEY")?;

        let paths = PathsConfig {
            temp_root: lookup("BOT_TEMP_ROOT").map_or_else(default_temp_root, PathBuf::from),
            log_dir: lookup("BOT_LOG_DIR").map_or_else(default_log_dir, PathBuf::from),
        };

        let config = Config {
            debug,
            framework_logging,
            test_mode,
            discord: DiscordConfig {
                token,
                test_guild_ids,
            },
            database: DatabaseConfig { uri },
            nasa: NasaConfig { api_key },
            paths,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Parses a comma separated list of guild ids, skipping blanks.
fn parse_guild_ids(raw: &str) -> Result<Vec<GuildId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(GuildId)
                .map_err(|e| ConfigError::EnvParseError {
                    var: "TEST_GUILD_ID",
                    source: Box::new(e),
                })
        })
        .collect()
}
