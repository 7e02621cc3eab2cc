//! # Scaffold Store
//!
//! Embedded document store for scaffold-bot.
//!
//! Documents are JSON values kept in sled trees. A tree is named
//! `<namespace>.<collection>`, so the live and test databases share one sled
//! file without seeing each other's records.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod database;
pub mod document;
pub mod guilds;
pub mod models;
pub mod settings;

pub use database::{Database, Namespace};
pub use document::{Collection, Document};
pub use guilds::{GuildRegistry, JoinOutcome};
pub use models::{BotSettings, GuildRecord};
pub use settings::SettingsStore;

/// Errors raised by the store.
pub type StoreError = scaffold_common::ScaffoldError;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
