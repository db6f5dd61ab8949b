use std::path::PathBuf;

use thiserror::Error;

use crate::{cli::CliError, config_store::ConfigError};

/// Error types for the settle binary and its setup code.
///
/// Store operations report [`ConfigError`] and commands report
/// [`CliError`]; both convert into this type at the top level.
#[derive(Error, Debug)]
pub enum SettleError {
    /// Configuration store error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Command execution error
    #[error(transparent)]
    Cli(#[from] CliError),

    /// I/O error on a known path
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error (for compatibility)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The defaults file could not be used
    #[error("invalid defaults in '{path}': {details}")]
    InvalidDefaults {
        /// Path of the defaults file
        path: PathBuf,
        /// Parse error details
        details: String,
    },

    /// Logging could not be set up
    #[error("failed to initialize logging: {details}")]
    Logging {
        /// Error details from the subscriber or appender
        details: String,
    },
}

/// A specialized `Result` type for settle operations.
pub type Result<T> = std::result::Result<T, SettleError>;

impl SettleError {
    /// Creates a logging setup error.
    pub fn logging(error: impl std::fmt::Display) -> Self {
        SettleError::Logging {
            details: error.to_string(),
        }
    }

    /// Creates an I/O error with file path context.
    pub fn io(error: impl std::fmt::Display, path: impl Into<PathBuf>) -> Self {
        SettleError::IoError {
            path: path.into(),
            details: error.to_string(),
        }
    }
}
