//! Application-wide error types using thiserror.

use poise::serenity_prelude as serenity;
use scaffold_common::ScaffoldError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Workspace, database or HTTP setup failed.
    #[error("Startup error: {0}")]
    Startup(#[from] ScaffoldError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
