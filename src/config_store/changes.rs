use std::{path::PathBuf, time::Instant};

use serde_json::Value;

/// Represents a configuration change with path-based identification.
///
/// Delivered to watcher callbacks. `old_value` and `new_value` are `None`
/// when nothing was stored at the path before or after the change.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChange {
    /// Path to the changed field using dot notation (e.g., "window.bounds.width").
    ///
    /// Whole-tree replacements through `update` report the empty path.
    pub path: String,
    /// The previous value of the field, if any.
    pub old_value: Option<Value>,
    /// The new value of the field, if any.
    pub new_value: Option<Value>,
    /// Timestamp when the change occurred.
    pub timestamp: Instant,
}

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Nothing is stored at the requested path.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// The value type does not match the expected type for the field.
    #[error("Type mismatch at {path}: Expected {expected_type}, got {actual_value:?}")]
    TypeMismatch {
        /// The path where the type mismatch occurred.
        path: String,
        /// The expected type name.
        expected_type: &'static str,
        /// The actual value that was found, `None` if absent.
        actual_value: Option<Value>,
    },

    /// A value that must be a mapping (defaults, update results) was something else.
    #[error("{context} must be a mapping, got {found}")]
    NotAMapping {
        /// Where the value came from
        context: String,
        /// JSON type name of the offending value
        found: &'static str,
    },

    /// Error occurred while persisting configuration to disk
    #[error("failed to persist config to '{path}': {details}")]
    PersistenceError {
        /// Path where persistence failed
        path: PathBuf,
        /// Error details from the persistence operation
        details: String,
    },

    /// Error occurred while serializing configuration
    #[error("failed to serialize {content_type}: {details}")]
    SerializationError {
        /// Type of content being serialized (e.g., "config as toml")
        content_type: String,
        /// Serialization error details
        details: String,
    },

    /// The store has been destroyed and accepts no further operations.
    #[error("config store has been destroyed")]
    Destroyed,
}

impl ConfigChange {
    /// Creates a new configuration change.
    ///
    /// # Arguments
    ///
    /// * `path` - The dot-separated path to the configuration field
    /// * `old_value` - The previous value of the field (if known)
    /// * `new_value` - The new value of the field
    pub fn new(path: String, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            path,
            old_value,
            new_value,
            timestamp: Instant::now(),
        }
    }

    /// Extracts the new value as a specific type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TypeMismatch` if the value is absent or cannot be
    /// deserialized into the requested type.
    pub fn extract<T>(&self) -> Result<T, ConfigError>
    where
        T: serde::de::DeserializeOwned,
    {
        extract_value(&self.path, self.new_value.as_ref())
    }

    /// Attempts to extract the new value as a string.
    ///
    /// Returns `None` if the value is not a string.
    pub fn as_string(&self) -> Option<String> {
        match &self.new_value {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Extracts the new value as a string with a fallback default.
    pub fn as_string_or(&self, default: &str) -> String {
        self.as_string().unwrap_or_else(|| default.to_string())
    }
}

pub(super) fn extract_value<T>(path: &str, value: Option<&Value>) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
{
    let mismatch = || ConfigError::TypeMismatch {
        path: path.to_string(),
        expected_type: std::any::type_name::<T>(),
        actual_value: value.cloned(),
    };

    let value = value.ok_or_else(mismatch)?;
    T::deserialize(value).map_err(|_| mismatch())
}

pub(super) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
