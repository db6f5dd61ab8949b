//! Command-line interface for configuration management.
//!
//! Provides a hierarchical command system for driving a [`ConfigStore`]
//! from the shell. Commands are organized by category and generate their
//! help text from metadata.
//!
//! [`ConfigStore`]: crate::config_store::ConfigStore

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use commands::config::{GetCommand, ResetCommand, SetCommand, ShowCommand, ValidateCommand};
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};
