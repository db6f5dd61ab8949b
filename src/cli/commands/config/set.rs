use serde_json::{Number, Value};

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_value,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config_store::ConfigStore,
};

/// Command for writing a configuration value.
///
/// The value is read as JSON when it parses as such, so objects and arrays
/// can be written whole; anything else is stored as a plain string.
pub struct SetCommand {
    config_store: ConfigStore,
}

impl SetCommand {
    /// Creates a new SetCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }

    pub(crate) fn parse_config_value(value_str: &str) -> Value {
        if let Ok(value) = serde_json::from_str::<Value>(value_str) {
            return value;
        }

        if let Ok(b) = value_str.parse::<bool>() {
            return Value::Bool(b);
        }

        if let Ok(i) = value_str.parse::<i64>() {
            return Value::Number(i.into());
        }

        if let Some(f) = value_str.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(f);
        }

        Value::String(value_str.to_string())
    }
}

impl Command for SetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <path> argument for 'set' command".to_string())
        })?;

        let value_str = args.get(1).ok_or_else(|| {
            CliError::InvalidArguments("Expected <value> argument for 'set' command".to_string())
        })?;
        let value = Self::parse_config_value(value_str);
        let shown = format_value(&value);

        self.config_store
            .set(path, value)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        Ok(format!("Set {path} = {shown}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            description: "Set configuration value".to_string(),
            category: "config".to_string(),
            args: vec![
                CommandArg {
                    name: "path".to_string(),
                    description: "Configuration path".to_string(),
                    required: true,
                    value_type: ArgType::Path,
                },
                CommandArg {
                    name: "value".to_string(),
                    description: "New value".to_string(),
                    required: true,
                    value_type: ArgType::Value,
                },
            ],
            examples: vec![
                "settle config set window.width 1024".to_string(),
                "settle config set theme dark".to_string(),
                r#"settle config set window '{"width": 800, "height": 600}'"#.to_string(),
            ],
        }
    }
}
