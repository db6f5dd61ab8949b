use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_value,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config_store::ConfigStore,
};

/// Command for retrieving configuration values from the config store.
///
/// # Example Usage
///
/// ```bash
/// settle config get window.width
/// settle config get theme
/// ```
pub struct GetCommand {
    config_store: ConfigStore,
}

impl GetCommand {
    /// Creates a new GetCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for GetCommand {
    /// Retrieves and formats a configuration value from the specified path.
    ///
    /// # Errors
    ///
    /// * `CliError::InvalidArguments` - If no path argument is provided
    /// * `CliError::ConfigError` - If nothing is stored at the path
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <path> argument for 'get' command".to_string())
        })?;

        let value = self
            .config_store
            .get(path)
            .ok_or_else(|| CliError::ConfigError(format!("Nothing stored at '{path}'")))?;

        Ok(format!("{}: {}", path, format_value(&value)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get configuration value".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg {
                name: "path".to_string(),
                description: "Configuration path (e.g., window.width)".to_string(),
                required: true,
                value_type: ArgType::Path,
            }],
            examples: vec![
                "settle config get window.width".to_string(),
                "settle config get theme".to_string(),
            ],
        }
    }
}
