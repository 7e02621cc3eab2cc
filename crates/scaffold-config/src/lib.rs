//! # Scaffold Config
//!
//! Environment-sourced configuration for scaffold-bot.
//!
//! Every required variable must be present at startup; a missing or malformed
//! value aborts the process before any subsystem is touched.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
