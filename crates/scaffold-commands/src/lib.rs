//! # Scaffold Commands
//!
//! Discord command implementations using the Poise framework for scaffold-bot.
//!
//! This crate provides the slash commands, the gateway event handlers and the
//! shared [`Data`] every handler receives. Commands are grouped into modules
//! and collected by [`CommandRegistry`] at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod admin;
pub mod download;
pub mod earth;
pub mod embeds;
pub mod events;
pub mod framework;
pub mod http;
pub mod owner;
pub mod paginator;
pub mod registry;

pub use framework::*;
pub use http::HttpSession;
pub use registry::{builtin_modules, CommandModule, CommandRegistry, ModuleFailure, StartupReport};
