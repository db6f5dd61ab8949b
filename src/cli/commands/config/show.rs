use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_value,
        types::CommandMetadata,
    },
    config_store::ConfigStore,
};

/// Prints the whole configuration tree.
pub struct ShowCommand {
    config_store: ConfigStore,
}

impl ShowCommand {
    /// Creates a new ShowCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for ShowCommand {
    fn execute(&self, _args: &[String]) -> CommandResult {
        Ok(format_value(&self.config_store.get_all()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "show".to_string(),
            description: "Show the full configuration".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["settle config show".to_string()],
        }
    }
}
