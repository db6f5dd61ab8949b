use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::{
    ConfigChange, ConfigError,
    changes::{extract_value, type_name},
    options::StoreOptions,
    path_ops::{assign, resolve},
    scheduler::{ScheduledTask, Scheduler},
    validation::{Rules, ValidationReport},
    watchers::{WatchCallback, WatchHandle, WatchOptions, WatcherRegistry},
};

/// A configuration tree with dotted-path access, debounced persistence and watchers
///
/// Clones are cheap and share the same tree. All operations run on the
/// caller's thread; the only deferred work is the debounced save, which
/// runs on the configured [`Scheduler`].
///
/// ```rust,no_run
/// use serde_json::json;
/// use settle::config_store::{ConfigStore, StoreOptions, WatchOptions};
///
/// let store = ConfigStore::new(
///     json!({ "window": { "width": 800, "height": 600 } }),
///     StoreOptions::new().persistence_path("/tmp/settings.json"),
/// )?;
///
/// let _handle = store.watch("window", |change| println!("{change:?}"), WatchOptions::deep());
/// store.set("window.width", json!(1024))?;
/// assert_eq!(store.get_or("window.width", json!(0)), json!(1024));
/// # Ok::<(), settle::config_store::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct ConfigStore {
    pub(super) shared: Arc<Shared>,
}

pub(super) struct Shared {
    pub(super) defaults: Map<String, Value>,
    pub(super) state: RwLock<StoreState>,
    pub(super) watchers: WatcherRegistry,
    pub(super) options: StoreOptions,
    pub(super) scheduler: Arc<dyn Scheduler>,
    /// Held for the whole snapshot-write-rename sequence of a save.
    pub(super) io_lock: Mutex<()>,
}

pub(super) struct StoreState {
    pub(super) tree: Value,
    pub(super) pending_save: Option<PendingSave>,
    pub(super) next_generation: u64,
    pub(super) destroyed: bool,
}

pub(super) struct PendingSave {
    pub(super) generation: u64,
    /// `None` while the scheduler is being called; the slot is reserved first.
    pub(super) task: Option<ScheduledTask>,
}

impl PendingSave {
    pub(super) fn cancel(self) {
        if let Some(task) = self.task {
            task.cancel();
        }
    }
}

impl ConfigStore {
    /// Creates a store seeded from `defaults`
    ///
    /// The tree starts as a copy of the defaults and is immediately replaced
    /// by [`load`](Self::load) when a persistence path is configured.
    ///
    /// # Errors
    /// * `ConfigError::NotAMapping` - If `defaults` is not a JSON object
    pub fn new(defaults: Value, mut options: StoreOptions) -> Result<Self, ConfigError> {
        let defaults = match defaults {
            Value::Object(defaults) => defaults,
            other => {
                return Err(ConfigError::NotAMapping {
                    context: "defaults".to_string(),
                    found: type_name(&other),
                });
            }
        };

        let scheduler = options.take_scheduler();
        let state = StoreState {
            tree: Value::Object(defaults.clone()),
            pending_save: None,
            next_generation: 0,
            destroyed: false,
        };

        let store = Self {
            shared: Arc::new(Shared {
                defaults,
                state: RwLock::new(state),
                watchers: WatcherRegistry::new(),
                options,
                scheduler,
                io_lock: Mutex::new(()),
            }),
        };

        if store.shared.options.persistence_path.is_some() {
            let outcome = store.load();
            debug!(?outcome, "Initial load finished");
        }

        Ok(store)
    }

    /// Creates a store whose defaults are the serialized form of `defaults`
    ///
    /// # Errors
    /// * `ConfigError::SerializationError` - If `defaults` cannot be represented as JSON
    /// * `ConfigError::NotAMapping` - If it serializes to something other than an object
    pub fn from_serializable<T: Serialize>(
        defaults: &T,
        options: StoreOptions,
    ) -> Result<Self, ConfigError> {
        let defaults =
            serde_json::to_value(defaults).map_err(|e| ConfigError::SerializationError {
                content_type: "defaults".to_string(),
                details: e.to_string(),
            })?;

        Self::new(defaults, options)
    }

    /// Retrieves a copy of the value at the specified path, `None` if absent
    ///
    /// An explicit `null` stored at the path is returned as `Some(Value::Null)`.
    pub fn get(&self, path: &str) -> Option<Value> {
        resolve(&self.read_state().tree, path).cloned()
    }

    /// Retrieves the value at the specified path, or `fallback` if absent
    pub fn get_or(&self, path: &str, fallback: Value) -> Value {
        self.get(path).unwrap_or(fallback)
    }

    /// Retrieves the value at the specified path as a specific type
    ///
    /// # Errors
    /// * `ConfigError::InvalidPath` - If nothing is stored at the path
    /// * `ConfigError::TypeMismatch` - If the value does not deserialize into `T`
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let state = self.read_state();
        let value = resolve(&state.tree, path)
            .ok_or_else(|| ConfigError::InvalidPath(format!("Nothing stored at '{path}'")))?;

        extract_value(path, Some(value))
    }

    /// Sets a value at the specified path and notifies watchers
    ///
    /// Setting a value equal to the current one does nothing: no save is
    /// scheduled and no watcher fires. Otherwise missing intermediate
    /// mappings are created, a debounced save is scheduled when auto-save is
    /// on, and watchers see `(path, new, old)`.
    ///
    /// # Errors
    /// * `ConfigError::Destroyed` - If the store has been destroyed
    #[instrument(skip(self, value), fields(path = %path))]
    pub fn set(&self, path: &str, value: Value) -> Result<(), ConfigError> {
        let old_value = {
            let mut state = self.write_state();
            if state.destroyed {
                warn!("Ignoring set on a destroyed config store");
                return Err(ConfigError::Destroyed);
            }

            let old_value = resolve(&state.tree, path).cloned();
            if old_value.as_ref() == Some(&value) {
                debug!("Value unchanged, skipping");
                return Ok(());
            }

            assign(&mut state.tree, path, value.clone());
            old_value
        };
        debug!("Config value updated");

        if self.shared.options.auto_save {
            self.schedule_save();
        }

        self.notify(ConfigChange::new(
            path.to_string(),
            old_value,
            Some(value),
        ));
        Ok(())
    }

    /// Replaces the whole tree with the result of `updater`
    ///
    /// The updater receives an independent copy of the current tree and runs
    /// without any internal lock held. Watchers are notified with the empty
    /// path whatever actually changed.
    ///
    /// # Errors
    /// * `ConfigError::NotAMapping` - If the updater returns a non-object; the tree is left as is
    /// * `ConfigError::Destroyed` - If the store has been destroyed
    pub fn update<F>(&self, updater: F) -> Result<(), ConfigError>
    where
        F: FnOnce(Value) -> Value,
    {
        let old_config = {
            let state = self.read_state();
            if state.destroyed {
                return Err(ConfigError::Destroyed);
            }
            state.tree.clone()
        };

        let new_config = updater(old_config.clone());
        if !new_config.is_object() {
            return Err(ConfigError::NotAMapping {
                context: "update result".to_string(),
                found: type_name(&new_config),
            });
        }

        {
            let mut state = self.write_state();
            if state.destroyed {
                return Err(ConfigError::Destroyed);
            }
            state.tree = new_config.clone();
        }
        debug!("Config tree replaced by update");

        if self.shared.options.auto_save {
            self.schedule_save();
        }

        self.notify(ConfigChange::new(
            String::new(),
            Some(old_config),
            Some(new_config),
        ));
        Ok(())
    }

    /// Returns an independent copy of the whole tree
    pub fn get_all(&self) -> Value {
        self.read_state().tree.clone()
    }

    /// Returns a copy of the defaults the store was created with
    pub fn defaults(&self) -> Value {
        Value::Object(self.shared.defaults.clone())
    }

    /// Replaces the tree with the defaults and saves immediately
    ///
    /// Any pending debounced save is cancelled first. Watchers are not
    /// notified.
    ///
    /// # Errors
    /// * `ConfigError::Destroyed` - If the store has been destroyed
    /// * Any error of [`save_sync`](Self::save_sync); the reset itself is kept
    pub fn reset_to_defaults(&self) -> Result<(), ConfigError> {
        {
            let mut state = self.write_state();
            if state.destroyed {
                return Err(ConfigError::Destroyed);
            }
            state.tree = Value::Object(self.shared.defaults.clone());
        }
        info!("Config reset to defaults");

        self.save_sync()
    }

    /// Registers a watcher for changes at or below `path`
    ///
    /// With `options.immediate` the callback runs once before this returns,
    /// with the current value as both old and new. On a destroyed store
    /// nothing is registered and an inert handle is returned.
    pub fn watch<F>(&self, path: &str, callback: F, options: WatchOptions) -> WatchHandle
    where
        F: Fn(&ConfigChange) + Send + Sync + 'static,
    {
        if self.is_destroyed() {
            warn!(path, "Ignoring watch on a destroyed config store");
            return WatchHandle::inert();
        }

        let callback: WatchCallback = Arc::new(callback);
        let handle = self
            .shared
            .watchers
            .register(path, Arc::clone(&callback), options);

        if options.immediate {
            let current = self.get(path);
            callback(&ConfigChange::new(path.to_string(), current.clone(), current));
        }

        handle
    }

    /// Number of registered watchers
    pub fn watcher_count(&self) -> usize {
        self.shared.watchers.len()
    }

    /// Runs caller-supplied rules against the current tree
    ///
    /// Rejections are reported in the result, never raised. Validators see a
    /// snapshot of the tree and run without any internal lock held, so they
    /// may call back into the store.
    pub fn validate(&self, rules: &Rules) -> ValidationReport {
        let snapshot = self.get_all();
        rules.check(|path| resolve(&snapshot, path))
    }

    /// Cancels any pending save, drops every watcher and clears the tree
    ///
    /// This is terminal. Changes waiting for a debounced save are lost;
    /// call [`flush`](Self::flush) first to keep them.
    pub fn destroy(&self) {
        {
            let mut state = self.write_state();
            if let Some(pending) = state.pending_save.take() {
                pending.cancel();
            }
            state.tree = Value::Object(Map::new());
            state.destroyed = true;
        }
        self.shared.watchers.clear();
        info!("Config store destroyed");
    }

    /// Returns `true` once [`destroy`](Self::destroy) has been called
    pub fn is_destroyed(&self) -> bool {
        self.read_state().destroyed
    }

    fn notify(&self, change: ConfigChange) {
        let notified = self
            .shared
            .watchers
            .notify(&change, self.shared.options.segment_boundary_matching);
        debug!(path = %change.path, notified, "Dispatched config change");
    }

    pub(super) fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.shared
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.shared
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("ConfigStore")
            .field("tree", &state.tree)
            .field("pending_save", &state.pending_save.is_some())
            .field("destroyed", &state.destroyed)
            .field("watchers", &self.shared.watchers.len())
            .field("options", &self.shared.options)
            .finish()
    }
}
