use std::{io, path::PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::{ConfigStore, changes::type_name, merging::deep_merge};

/// How [`ConfigStore::load`] arrived at the current tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The persisted tree was merged over the defaults.
    Persisted,
    /// The persisted tree went through the migration hook first.
    Migrated {
        /// `version` found in the persisted file, `None` if it had none.
        from_version: Option<Value>,
    },
    /// The tree was reset to the defaults for the given reason.
    Defaults(LoadError),
}

impl LoadOutcome {
    /// Returns `true` if the tree fell back to the defaults.
    pub fn is_defaults(&self) -> bool {
        matches!(self, Self::Defaults(_))
    }
}

/// Why a load fell back to the defaults.
///
/// Load failures are never raised; they are reported through
/// [`LoadOutcome::Defaults`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// The store has no persistence path.
    #[error("no persistence path configured")]
    NotConfigured,

    /// Nothing has been persisted yet.
    #[error("no persisted config at '{path}'")]
    Missing {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read config from '{path}': {details}")]
    Read {
        /// Path that failed to read
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// The file is not valid in the configured format.
    #[error("failed to parse config from '{path}': {details}")]
    Parse {
        /// Path of the corrupt file
        path: PathBuf,
        /// Parser error details
        details: String,
    },

    /// The file parsed, but its root is not a mapping.
    #[error("config at '{path}' must be a mapping, got {found}")]
    NotAMapping {
        /// Path of the file
        path: PathBuf,
        /// JSON type name of the root
        found: &'static str,
    },

    /// The migration hook returned something other than a mapping.
    #[error("migration must return a mapping, got {found}")]
    Migration {
        /// JSON type name of the hook's result
        found: &'static str,
    },

    /// The store has been destroyed.
    #[error("config store has been destroyed")]
    Destroyed,
}

impl ConfigStore {
    /// Replaces the tree with the persisted one merged over the defaults
    ///
    /// When a migration hook is configured and the persisted `version`
    /// differs from the defaults' `version`, the hook transforms the loaded
    /// tree before merging. Any failure leaves the tree equal to the
    /// defaults. Watchers are not notified.
    #[instrument(skip(self))]
    pub fn load(&self) -> LoadOutcome {
        if self.is_destroyed() {
            warn!("Refusing to load into a destroyed config store");
            return LoadOutcome::Defaults(LoadError::Destroyed);
        }

        let (tree, outcome) = match self
            .read_persisted()
            .and_then(|loaded| self.merge_loaded(loaded))
        {
            Ok(loaded) => loaded,
            Err(reason) => {
                match &reason {
                    LoadError::NotConfigured | LoadError::Missing { .. } => {
                        debug!(%reason, "Using default config");
                    }
                    _ => warn!(%reason, "Falling back to default config"),
                }
                (self.defaults(), LoadOutcome::Defaults(reason))
            }
        };

        let mut state = self.write_state();
        if state.destroyed {
            return LoadOutcome::Defaults(LoadError::Destroyed);
        }
        state.tree = tree;

        if !outcome.is_defaults() {
            info!(?outcome, "Loaded persisted config");
        }
        outcome
    }

    fn read_persisted(&self) -> Result<Map<String, Value>, LoadError> {
        let options = &self.shared.options;
        let path = options
            .persistence_path
            .as_deref()
            .ok_or(LoadError::NotConfigured)?;

        let contents = options.provider.read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LoadError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Read {
                    path: path.to_path_buf(),
                    details: e.to_string(),
                }
            }
        })?;

        let parsed = options
            .format
            .parse(&contents)
            .map_err(|details| LoadError::Parse {
                path: path.to_path_buf(),
                details,
            })?;

        match parsed {
            Value::Object(map) => Ok(map),
            other => Err(LoadError::NotAMapping {
                path: path.to_path_buf(),
                found: type_name(&other),
            }),
        }
    }

    fn merge_loaded(&self, loaded: Map<String, Value>) -> Result<(Value, LoadOutcome), LoadError> {
        let loaded_version = loaded.get("version").cloned();
        let needs_migration = loaded_version.as_ref() != self.shared.defaults.get("version");

        match &self.shared.options.migrate {
            Some(migrate) if needs_migration => {
                debug!(from_version = ?loaded_version, "Migrating persisted config");
                let migrated = migrate(Value::Object(loaded));
                if !migrated.is_object() {
                    return Err(LoadError::Migration {
                        found: type_name(&migrated),
                    });
                }

                Ok((
                    deep_merge(self.defaults(), migrated),
                    LoadOutcome::Migrated {
                        from_version: loaded_version,
                    },
                ))
            }
            _ => Ok((
                deep_merge(self.defaults(), Value::Object(loaded)),
                LoadOutcome::Persisted,
            )),
        }
    }
}
