//! Default values for the optional settings.

use std::path::PathBuf;

/// Namespace of the live database.
pub const LIVE_NAMESPACE: &str = "scaffold-bot";

/// Namespace of the test database.
pub const TEST_NAMESPACE: &str = "test-scaffold-bot";

/// Directory the rotated log files are written to.
pub fn default_log_dir() -> PathBuf {
    PathBuf::from("log")
}

/// Root under which the scratch workspace is created.
pub fn default_temp_root() -> PathBuf {
    std::env::temp_dir()
}
