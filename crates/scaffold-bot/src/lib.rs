//! # Scaffold Bot
//!
//! Template Discord bot built on Poise.
//!
//! This is the main crate that orchestrates the application lifecycle: it
//! prepares the workspace, database and commands, runs the gateway client and
//! drives the hourly temp directory cleanup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod lifecycle;
pub mod scheduler;

pub use error::*;
pub use lifecycle::{prepare, run, Prepared};
pub use scheduler::{CleanupScheduler, SchedulerHandle, SchedulerState, Sweep, CLEANUP_INTERVAL};
