use std::{
    path::Path,
    sync::{Arc, PoisonError, Weak},
};

use tracing::{debug, error, info, instrument};

use super::{
    ConfigError, ConfigStore,
    persistence::temp_path_for,
    store::{PendingSave, Shared},
};

impl ConfigStore {
    /// Schedules a debounced save, superseding any pending one
    ///
    /// Only the last of several calls inside the debounce interval reaches
    /// storage. Does nothing without a persistence path or after
    /// [`destroy`](Self::destroy).
    pub fn schedule_save(&self) {
        if self.shared.options.persistence_path.is_none() {
            return;
        }

        let debounce = self.shared.options.debounce;
        let generation = {
            let mut state = self.write_state();
            if state.destroyed {
                return;
            }

            if let Some(previous) = state.pending_save.take() {
                debug!(generation = previous.generation, "Superseded pending save");
                previous.cancel();
            }

            state.next_generation += 1;
            let generation = state.next_generation;
            state.pending_save = Some(PendingSave {
                generation,
                task: None,
            });
            generation
        };

        // The scheduler is called without the state lock so it may run the task inline.
        let shared = Arc::downgrade(&self.shared);
        let task = self.shared.scheduler.schedule(
            debounce,
            Box::new(move || run_scheduled_save(shared, generation)),
        );

        let mut state = self.write_state();
        match state.pending_save.as_mut() {
            Some(pending) if pending.generation == generation => {
                pending.task = Some(task);
                debug!(generation, ?debounce, "Scheduled config save");
            }
            _ => task.cancel(),
        }
    }

    /// Writes the current tree to storage now, cancelling any pending save
    ///
    /// The file is written to `<path>.tmp` and renamed over `<path>`, so the
    /// persisted file is always either the old or the new complete tree.
    /// Failures are logged and returned; the in-memory tree is kept.
    ///
    /// # Errors
    /// * `ConfigError::SerializationError` - If the tree has no representation in the format
    /// * `ConfigError::PersistenceError` - If writing or renaming fails
    /// * `ConfigError::Destroyed` - If the store has been destroyed
    #[instrument(skip(self))]
    pub fn save_sync(&self) -> Result<(), ConfigError> {
        self.cancel_pending_save();
        self.write_to_storage()
    }

    /// Runs a pending debounced save immediately
    ///
    /// Returns `Ok(true)` if a save was pending and has been written,
    /// `Ok(false)` if there was nothing to flush.
    ///
    /// # Errors
    /// Same as [`save_sync`](Self::save_sync).
    pub fn flush(&self) -> Result<bool, ConfigError> {
        let Some(pending) = self.write_state().pending_save.take() else {
            return Ok(false);
        };

        pending.cancel();
        self.write_to_storage().map(|()| true)
    }

    /// Returns `true` while a debounced save is waiting to run
    pub fn has_pending_save(&self) -> bool {
        self.read_state().pending_save.is_some()
    }

    fn cancel_pending_save(&self) {
        if let Some(pending) = self.write_state().pending_save.take() {
            debug!(generation = pending.generation, "Cancelled pending save");
            pending.cancel();
        }
    }

    fn write_to_storage(&self) -> Result<(), ConfigError> {
        let Some(path) = self.shared.options.persistence_path.as_deref() else {
            debug!("No persistence path configured, skipping save");
            return Ok(());
        };

        let _io = self
            .shared
            .io_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let contents = {
            let state = self.read_state();
            if state.destroyed {
                return Err(ConfigError::Destroyed);
            }
            self.shared.options.format.serialize(&state.tree)
        };

        let result = contents.and_then(|contents| self.write_atomically(path, &contents));
        match &result {
            Ok(()) => info!(path = %path.display(), "Saved config"),
            Err(e) => error!(path = %path.display(), error = %e, "Failed to save config"),
        }

        result
    }

    fn write_atomically(&self, path: &Path, contents: &str) -> Result<(), ConfigError> {
        let provider = &self.shared.options.provider;
        let temp_path = temp_path_for(path);

        provider
            .write(&temp_path, contents)
            .and_then(|()| provider.rename(&temp_path, path))
            .map_err(|e| {
                if let Err(cleanup) = provider.remove_file(&temp_path) {
                    debug!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Could not remove temporary file"
                    );
                }

                ConfigError::PersistenceError {
                    path: path.to_path_buf(),
                    details: e.to_string(),
                }
            })
    }
}

fn run_scheduled_save(shared: Weak<Shared>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        debug!(generation, "Config store dropped before scheduled save");
        return;
    };
    let store = ConfigStore { shared };

    {
        let mut state = store.write_state();
        let current = state.pending_save.as_ref().map(|pending| pending.generation);
        if current != Some(generation) {
            return;
        }
        state.pending_save = None;
    }

    // Already logged by write_to_storage; nobody is waiting on a debounced save.
    let _ = store.write_to_storage();
}
