//! # Scaffold Common
//!
//! Shared types, errors, logging and the scratch workspace for scaffold-bot.
//!
//! This crate provides the foundational pieces used across all other crates
//! in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;
pub mod workspace;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, ScaffoldError};
pub use logging::{init_logging, latest_log_file, LoggingConfig, LoggingGuard};
pub use types::*;
pub use utils::*;
pub use workspace::{ClearReport, EntryKind, TempWorkspace, WORKSPACE_DIR_NAME};
