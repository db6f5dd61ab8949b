//! Configuration management commands.
mod get;
mod reset;
mod set;
mod show;
mod validate;

pub use get::GetCommand;
pub use reset::ResetCommand;
pub use set::SetCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;

use crate::{cli::CommandRegistry, config_store::ConfigStore};

/// Registers all configuration-related commands with the command registry.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `config_store` - Store shared by the commands
pub fn register_commands(registry: &mut CommandRegistry, config_store: ConfigStore) {
    const CATEGORY_NAME: &str = "config";

    registry.register_command(
        CATEGORY_NAME,
        Box::new(GetCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(SetCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(ShowCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(ResetCommand::new(config_store.clone())),
    );
    registry.register_command(CATEGORY_NAME, Box::new(ValidateCommand::new(config_store)));
}
