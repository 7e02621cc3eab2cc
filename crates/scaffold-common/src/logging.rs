//! Structured logging infrastructure.
//!
//! Logs go to stdout and to a daily-rotated file in the log directory. The
//! returned [`LoggingGuard`] must be held for the lifetime of the process so
//! the non-blocking file writer flushes on exit.

use crate::error::{Result, ScaffoldError};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default file name prefix for rotated log files.
pub const LOG_FILE_PREFIX: &str = "scaffold-bot";

/// Extension used for rotated log files.
pub const LOG_FILE_SUFFIX: &str = "log";

/// Targets belonging to the bot framework stack.
const FRAMEWORK_TARGETS: &[&str] = &["serenity", "poise", "tungstenite", "reqwest", "hyper"];

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base level for the bot's own targets (e.g. "info", "debug")
    pub level: String,
    /// Whether framework crates log at debug instead of warn
    pub framework_logging: bool,
    /// Directory for rotated log files; `None` disables file output
    pub directory: Option<PathBuf>,
    /// File name prefix for rotated log files
    pub file_prefix: String,
    /// Whether to colorize stdout
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            framework_logging: false,
            directory: Some(PathBuf::from("log")),
            file_prefix: LOG_FILE_PREFIX.to_string(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Logging config derived from the bot's debug flags.
    pub fn from_flags(debug: bool, framework_logging: bool, directory: impl Into<PathBuf>) -> Self {
        Self {
            level: if debug { "debug" } else { "info" }.to_string(),
            framework_logging,
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    /// Directive string fed to the env filter.
    pub fn directives(&self) -> String {
        let framework_level = if self.framework_logging { "debug" } else { "warn" };
        let mut directives = vec![self.level.clone()];
        directives.extend(
            FRAMEWORK_TARGETS
                .iter()
                .map(|target| format!("{target}={framework_level}")),
        );
        directives.join(",")
    }
}

/// Keeps the background file writer alive.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_new(config.directives())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| ScaffoldError::config_with_source("invalid log filter", e))?;

    let stdout_layer = fmt::layer().with_target(true).with_ansi(config.ansi);

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(directory)
                .map_err(|e| ScaffoldError::config_with_source("cannot open log file", e))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ScaffoldError::config_with_source("logging already initialized", e))?;

    Ok(LoggingGuard { _file: guard })
}

/// Finds the log file currently being written to.
///
/// Rotated files are named `<prefix>.<YYYY-MM-DD>.log`. Names whose middle part
/// is not a date are ignored.
pub fn latest_log_file(directory: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut newest: Option<(NaiveDate, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(date) = entry.file_name().to_str().and_then(|name| log_date(name, prefix)) else {
            continue;
        };
        if newest.as_ref().map_or(true, |(current, _)| date > *current) {
            newest = Some((date, entry.path()));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

fn log_date(file_name: &str, prefix: &str) -> Option<NaiveDate> {
    let date = file_name
        .strip_prefix(prefix)?
        .strip_prefix('.')?
        .strip_suffix(LOG_FILE_SUFFIX)?
        .strip_suffix('.')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.framework_logging);
        assert_eq!(config.directory, Some(PathBuf::from("log")));
        assert_eq!(config.file_prefix, LOG_FILE_PREFIX);
    }

    #[test]
    fn test_directives_follow_flags() {
        let quiet = LoggingConfig::from_flags(false, false, "log");
        assert_eq!(
            quiet.directives(),
            "info,serenity=warn,poise=warn,tungstenite=warn,reqwest=warn,hyper=warn"
        );

        let loud = LoggingConfig::from_flags(true, true, "log");
        assert!(loud.directives().starts_with("debug,"));
        assert!(loud.directives().contains("serenity=debug"));
        assert!(EnvFilter::try_new(loud.directives()).is_ok());
    }

    #[test]
    fn test_latest_log_file_picks_newest_date() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "scaffold-bot.2026-10-12.log",
            "scaffold-bot.2026-10-14.log",
            "scaffold-bot.2026-10-13.log",
            "other.2027-01-01.log",
            "scaffold-bot.2026-10-15.txt",
            "scaffold-bot.latest.log",
        ] {
            fs::write(dir.path().join(name), b"line\n").unwrap();
        }
        fs::create_dir(dir.path().join("scaffold-bot.2030-01-01.log")).unwrap();

        let latest = latest_log_file(dir.path(), LOG_FILE_PREFIX).unwrap().unwrap();
        assert_eq!(latest.file_name().unwrap(), "scaffold-bot.2026-10-14.log");
    }

    #[test]
    fn test_log_date() {
        assert_eq!(
            log_date("scaffold-bot.2026-02-03.log", LOG_FILE_PREFIX),
            NaiveDate::from_ymd_opt(2026, 2, 3)
        );
        assert_eq!(log_date("scaffold-bot.2026-13-01.log", LOG_FILE_PREFIX), None);
        assert_eq!(log_date("scaffold-bot.log", LOG_FILE_PREFIX), None);
    }

    #[test]
    fn test_latest_log_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(latest_log_file(&missing, LOG_FILE_PREFIX).unwrap().is_none());
    }
}
