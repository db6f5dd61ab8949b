use crate::{
    cli::{CliError, Command, CommandResult, types::CommandMetadata},
    config_store::ConfigStore,
};

/// Restores the defaults and writes them out immediately.
pub struct ResetCommand {
    config_store: ConfigStore,
}

impl ResetCommand {
    /// Creates a new ResetCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for ResetCommand {
    fn execute(&self, _args: &[String]) -> CommandResult {
        self.config_store
            .reset_to_defaults()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        Ok("Configuration reset to defaults".to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "reset".to_string(),
            description: "Reset configuration to defaults".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["settle config reset".to_string()],
        }
    }
}
