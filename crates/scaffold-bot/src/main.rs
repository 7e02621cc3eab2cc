//! Main entry point for scaffold-bot.

use anyhow::Context as _;
use scaffold_common::{init_logging, LoggingConfig};
use scaffold_config::ConfigLoader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;

    let logging = LoggingConfig::from_flags(
        config.debug,
        config.framework_logging,
        config.paths.log_dir.clone(),
    );
    let _logging_guard = init_logging(&logging).context("failed to initialize logging")?;

    info!("Starting scaffold-bot v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = scaffold_bot::run(config).await {
        error!("Bot stopped with an error: {e}");
        return Err(e.into());
    }

    Ok(())
}
