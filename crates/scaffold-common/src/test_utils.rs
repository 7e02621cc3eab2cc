//! Test utilities and shared fixtures for the workspace crates.

use crate::{ChannelId, GuildId, TempWorkspace};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests once per test binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// A workspace rooted in a fresh temp dir; keep the `TempDir` alive alongside it.
pub fn create_test_workspace() -> (tempfile::TempDir, TempWorkspace) {
    let root = create_temp_dir();
    let workspace = TempWorkspace::ensure(root.path()).expect("Failed to create workspace");
    (root, workspace)
}

/// Discord-related test fixtures.
pub mod discord_fixtures {
    use super::{ChannelId, GuildId};

    /// Create a test guild ID.
    pub fn test_guild_id() -> GuildId {
        GuildId(42)
    }

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(100)
    }
}
