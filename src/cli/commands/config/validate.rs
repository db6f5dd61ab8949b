use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config_store::{ConfigStore, Rules, validators},
};

const KINDS: &[&str] = &["required", "string", "bool", "number"];

/// Checks one path against a built-in validator.
pub struct ValidateCommand {
    config_store: ConfigStore,
}

impl ValidateCommand {
    /// Creates a new ValidateCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }

    fn rules_for(path: &str, kind: &str) -> Result<Rules, CliError> {
        let rules = Rules::new();
        let rules = match kind {
            "required" => rules.rule(path, validators::required()),
            "string" => rules.rule(path, validators::is_string()),
            "bool" => rules.rule(path, validators::is_bool()),
            "number" => rules.rule(path, validators::is_number()),
            other => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown validation kind '{other}', expected one of: {}",
                    KINDS.join(", ")
                )));
            }
        };

        Ok(rules)
    }
}

impl Command for ValidateCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(path), Some(kind)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <path> and <kind> arguments for 'validate' command".to_string(),
            ));
        };

        let report = self.config_store.validate(&Self::rules_for(path, kind)?);
        if !report.valid {
            return Err(CliError::ValidationFailed(report.errors.join("\n")));
        }

        Ok(format!("{path}: {kind} ✓"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "validate".to_string(),
            description: "Validate a configuration value".to_string(),
            category: "config".to_string(),
            args: vec![
                CommandArg {
                    name: "path".to_string(),
                    description: "Configuration path".to_string(),
                    required: true,
                    value_type: ArgType::Path,
                },
                CommandArg {
                    name: "kind".to_string(),
                    description: "Check to run".to_string(),
                    required: true,
                    value_type: ArgType::Choice(KINDS),
                },
            ],
            examples: vec![
                "settle config validate window.width number".to_string(),
                "settle config validate theme required".to_string(),
            ],
        }
    }
}
