use thiserror::Error;

/// Errors that can occur during CLI command execution.
///
/// Covers everything from command discovery failures to execution errors.
/// Each variant carries enough context to tell the user what went wrong.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid arguments were provided to a command.
    ///
    /// Returned when argument validation fails: missing required arguments,
    /// too many arguments, or values in the wrong format.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An error occurred in the configuration store.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The configuration did not pass the requested validation.
    #[error("Validation failed:\n{0}")]
    ValidationFailed(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for command execution results.
///
/// Commands return their user-facing output on success.
pub type CommandResult = Result<String, CliError>;

/// Describes a single command argument.
///
/// Drives help generation and the registry's argument count checks.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "path", "value").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument, shown in help text.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// A general string value.
    String,

    /// A value parsed as JSON, falling back to a plain string.
    Value,

    /// A dotted configuration path.
    Path,

    /// One of a fixed set of keywords.
    Choice(&'static [&'static str]),
}

/// Complete metadata for a CLI command.
///
/// The single source of truth for a command's identity, arguments, usage
/// examples and category.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "set").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Every argument this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "config").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against
    /// [`metadata`](Self::metadata); the command validates the values.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values, store errors or
    /// failed validations.
    fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
