//! Static command registry built once at startup.
//!
//! Commands are grouped into modules. A module whose commands cannot be
//! registered is recorded in the [`StartupReport`] and skipped while the other
//! modules still load.

use crate::framework::Command;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info};

/// A named group of commands.
#[derive(Debug, Clone, Copy)]
pub struct CommandModule {
    /// Module name used in logs and the startup report.
    pub name: &'static str,
    /// Builds the module's commands.
    pub commands: fn() -> Vec<Command>,
}

/// Modules shipped with the bot.
pub fn builtin_modules() -> Vec<CommandModule> {
    vec![
        CommandModule {
            name: "admin",
            commands: crate::admin::commands,
        },
        CommandModule {
            name: "general",
            commands: general_commands,
        },
        CommandModule {
            name: "owner",
            commands: crate::owner::commands,
        },
    ]
}

fn general_commands() -> Vec<Command> {
    vec![crate::download::download_file(), crate::earth::earth()]
}

/// Why a module could not be registered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The module provides no commands.
    #[error("module {0} provides no commands")]
    EmptyModule(&'static str),

    /// A command name is already taken.
    #[error("command '{name}' is already registered by module {existing}")]
    DuplicateCommand {
        /// Clashing command name.
        name: String,
        /// Module that registered it first.
        existing: &'static str,
    },
}

/// A module that failed to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    /// Module name.
    pub module: &'static str,
    /// Rendered failure reason.
    pub reason: String,
}

/// Outcome of building the registry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// Modules that registered every command.
    pub loaded: Vec<&'static str>,
    /// Modules that were skipped.
    pub failed: Vec<ModuleFailure>,
}

impl StartupReport {
    /// Whether every module loaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Name-indexed set of registered commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    owners: HashMap<String, &'static str>,
}

impl CommandRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every module, collecting failures instead of aborting.
    pub fn build(modules: &[CommandModule]) -> (Self, StartupReport) {
        let mut registry = Self::new();
        let mut report = StartupReport::default();

        for module in modules {
            match registry.register(module) {
                Ok(count) => {
                    info!("Loaded module {} ({count} commands)", module.name);
                    report.loaded.push(module.name);
                }
                Err(e) => {
                    error!("Failed to load module {}! {e}", module.name);
                    report.failed.push(ModuleFailure {
                        module: module.name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        (registry, report)
    }

    /// Registers one module. Either all of its commands are added or none.
    pub fn register(&mut self, module: &CommandModule) -> Result<usize, RegistryError> {
        let commands = (module.commands)();
        if commands.is_empty() {
            return Err(RegistryError::EmptyModule(module.name));
        }

        let mut seen = HashMap::new();
        for command in &commands {
            let taken_by = self
                .owners
                .get(&command.name)
                .copied()
                .or_else(|| seen.get(&command.name).copied());
            if let Some(existing) = taken_by {
                return Err(RegistryError::DuplicateCommand {
                    name: command.name.clone(),
                    existing,
                });
            }
            seen.insert(command.name.clone(), module.name);
        }

        let count = commands.len();
        self.owners.extend(seen);
        self.commands.extend(commands);
        Ok(count)
    }

    /// Whether a top-level command with this name is registered.
    #[cfg(test)]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    /// Module that registered `name`.
    #[cfg(test)]
    pub(crate) fn module_of(&self, name: &str) -> Option<&'static str> {
        self.owners.get(name).copied()
    }

    /// Registered top-level command names, in registration order.
    #[cfg(test)]
    pub(crate) fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of registered top-level commands.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    /// Hands the commands over to the framework.
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}
