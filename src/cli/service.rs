use crate::config_store::ConfigStore;

use super::{
    CliError, CommandRegistry,
    formatting::{
        format_category, format_command, format_description, format_header, format_subheader,
        format_usage,
    },
    types::{ArgType, CommandMetadata},
};

/// High-level service for managing and executing CLI commands.
///
/// Provides a unified interface for command registration, discovery, help
/// and execution.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all built-in commands registered.
    ///
    /// # Arguments
    /// * `config_store` - Store the config commands operate on
    pub fn new(config_store: ConfigStore) -> Self {
        let mut registry = CommandRegistry::new(config_store);
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in the category,
    /// or whatever the command itself reports.
    pub fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        self.registry.execute(category, command_name, args)
    }

    /// Lists all available commands organized by category.
    ///
    /// # Returns
    /// Vector of (category_name, command_names) tuples
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }

    /// Top-level help: every category with its commands.
    pub fn help(&self) -> String {
        let mut lines = vec![
            format_header("settle - configuration store"),
            String::new(),
            format!(
                "{} settle [OPTIONS] <category> <command> [args...]",
                format_subheader("Usage:")
            ),
            String::new(),
            format_subheader("Commands:"),
        ];

        for (category, commands) in self.list_all() {
            lines.push(format!("  {}", format_category(&category)));
            for command in commands {
                lines.push(format!("    {}", format_command(&command)));
            }
        }

        lines.push(String::new());
        lines.push(format_description(
            "Run 'settle <category>' for details on a category.",
        ));

        lines.join("\n")
    }

    /// Help for a single category, with arguments and examples.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the category doesn't exist.
    pub fn category_help(&self, category: &str) -> Result<String, CliError> {
        let metadata = self.registry.category_metadata(category)?;

        let mut lines = vec![format_header(&format!("settle {category}")), String::new()];
        for command in &metadata {
            lines.extend(command_help(command));
        }

        Ok(lines.join("\n"))
    }
}

fn command_help(metadata: &CommandMetadata) -> Vec<String> {
    let signature: Vec<String> = metadata
        .args
        .iter()
        .map(|arg| {
            if arg.required {
                format!("<{}>", arg.name)
            } else {
                format!("[{}]", arg.name)
            }
        })
        .collect();

    let mut lines = vec![format!(
        "  {} {}  {}",
        format_command(&metadata.name),
        signature.join(" "),
        format_description(&metadata.description)
    )];

    for arg in &metadata.args {
        lines.push(format!(
            "      {:<10} {}{}",
            arg.name,
            arg.description,
            describe_type(arg.value_type)
        ));
    }

    for example in &metadata.examples {
        lines.push(format!("      {}", format_usage(example)));
    }

    lines.push(String::new());
    lines
}

fn describe_type(value_type: ArgType) -> String {
    match value_type {
        ArgType::String => String::new(),
        ArgType::Value => " (JSON, or plain text)".to_string(),
        ArgType::Path => " (dotted path)".to_string(),
        ArgType::Choice(choices) => format!(" ({})", choices.join("|")),
    }
}
