use std::collections::HashMap;

use crate::config_store::ConfigStore;

use super::{CliError, Command, commands::config, types::CommandMetadata};

/// Registry for CLI commands organized by category.
///
/// Commands are grouped by logical category so new ones are added by
/// registration rather than by growing a match statement.
///
/// ```text
/// registry
/// └── config
///     ├── get
///     ├── reset
///     ├── set
///     ├── show
///     └── validate
/// ```
pub struct CommandRegistry {
    /// Nested HashMap structure: category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    config_store: ConfigStore,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    ///
    /// Commands must be added with [`register_command`](Self::register_command)
    /// or [`register_all_commands`](Self::register_all_commands).
    pub fn new(config_store: ConfigStore) -> Self {
        Self {
            categories: HashMap::new(),
            config_store,
        }
    }

    /// Registers a command in the specified category.
    ///
    /// The command's metadata name is its key within the category; a
    /// command registered under an existing name replaces it.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or the command
    /// within it doesn't exist, `CliError::InvalidArguments` if the argument
    /// count doesn't fit the command's metadata. Other errors come from the
    /// command itself.
    pub fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_command = self.find(category, command_name)?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args)
    }

    /// Metadata of every command in a category, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category doesn't exist.
    pub fn category_metadata(&self, category: &str) -> Result<Vec<CommandMetadata>, CliError> {
        let commands = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let mut metadata: Vec<CommandMetadata> =
            commands.values().map(|command| command.metadata()).collect();
        metadata.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(metadata)
    }

    /// Lists all registered commands organized by category.
    ///
    /// Categories and commands are sorted alphabetically for consistent display.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Registers all built-in commands in their respective categories.
    pub fn register_all_commands(&mut self) {
        let config_store = self.config_store.clone();
        config::register_commands(self, config_store);
    }

    fn find(&self, category: &str, command_name: &str) -> Result<&dyn Command, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        found_category
            .get(command_name)
            .map(|command| &**command)
            .ok_or_else(|| {
                CliError::CommandNotFound(format!(
                    "Failed to find command '{command_name}' in category '{category}'"
                ))
            })
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }
}
