use std::{fs, path::Path};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{Result, SettleError, config_store::PersistenceFormat};

/// Reads the defaults tree for the CLI's store.
///
/// Without a file the defaults are an empty mapping. The file is parsed in
/// the given format and must hold a mapping at its root.
///
/// # Errors
/// Returns `SettleError::IoError` if the file cannot be read and
/// `SettleError::InvalidDefaults` if it does not parse to a mapping.
pub fn load_defaults(path: Option<&Path>, format: PersistenceFormat) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Map::new()));
    };

    let contents = fs::read_to_string(path).map_err(|e| SettleError::io(e, path))?;
    let invalid = |details: String| SettleError::InvalidDefaults {
        path: path.to_path_buf(),
        details,
    };

    let defaults: Value = match format {
        PersistenceFormat::Json => {
            serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?
        }
        PersistenceFormat::Toml => toml::from_str(&contents).map_err(|e| invalid(e.to_string()))?,
    };

    if !defaults.is_object() {
        return Err(invalid("root must be a mapping".to_string()));
    }

    debug!(path = %path.display(), "Loaded defaults");
    Ok(defaults)
}
