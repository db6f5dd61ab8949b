use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, Weak,
    atomic::{AtomicUsize, Ordering},
};

use super::{ConfigChange, path_ops::watch_matches};

/// Callback invoked with every change a watcher qualifies for.
pub type WatchCallback = Arc<dyn Fn(&ConfigChange) + Send + Sync>;

/// How a watcher is matched and started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Fire for changes anywhere below the watched path, not only exact hits.
    pub deep: bool,
    /// Fire once with the current value (as both old and new) on registration.
    pub immediate: bool,
}

impl WatchOptions {
    /// Exact-path watcher.
    pub fn shallow() -> Self {
        Self::default()
    }

    /// Watcher that also sees changes below its path.
    pub fn deep() -> Self {
        Self {
            deep: true,
            immediate: false,
        }
    }

    /// Also fire once on registration.
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }
}

/// Internal watcher record
struct Watcher {
    id: usize,
    path: String,
    callback: WatchCallback,
    options: WatchOptions,
}

/// Ordered set of watchers shared by all clones of a store.
///
/// Dispatch collects the qualifying callbacks first and runs them after the
/// list is unlocked, so a callback may read the store, register watchers or
/// unsubscribe itself.
#[derive(Clone)]
pub(super) struct WatcherRegistry {
    watchers: Arc<Mutex<Vec<Watcher>>>,
    next_id: Arc<AtomicUsize>,
}

/// Handle returned by [`ConfigStore::watch`](super::ConfigStore::watch).
///
/// Dropping the handle keeps the watcher registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug)]
pub struct WatchHandle {
    id: usize,
    watchers: Weak<Mutex<Vec<Watcher>>>,
}

impl WatcherRegistry {
    pub(super) fn new() -> Self {
        Self {
            watchers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    pub(super) fn register(
        &self,
        path: &str,
        callback: WatchCallback,
        options: WatchOptions,
    ) -> WatchHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.lock().push(Watcher {
            id,
            path: path.to_string(),
            callback,
            options,
        });

        WatchHandle {
            id,
            watchers: Arc::downgrade(&self.watchers),
        }
    }

    /// Invokes every qualifying callback in registration order.
    pub(super) fn notify(&self, change: &ConfigChange, segment_boundary: bool) -> usize {
        let callbacks: Vec<WatchCallback> = self
            .lock()
            .iter()
            .filter(|watcher| {
                watch_matches(
                    &change.path,
                    &watcher.path,
                    watcher.options.deep,
                    segment_boundary,
                )
            })
            .map(|watcher| Arc::clone(&watcher.callback))
            .collect();

        for callback in &callbacks {
            callback(change);
        }

        callbacks.len()
    }

    pub(super) fn clear(&self) {
        self.lock().clear();
    }

    pub(super) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Watcher>> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WatchHandle {
    pub(super) fn inert() -> Self {
        Self {
            id: 0,
            watchers: Weak::new(),
        }
    }

    /// Identifier of the watcher this handle controls.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Removes exactly this watcher.
    ///
    /// Returns `false` if it was already gone (store destroyed or dropped).
    pub fn unsubscribe(self) -> bool {
        let Some(watchers) = self.watchers.upgrade() else {
            return false;
        };

        let mut watchers = watchers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = watchers.len();
        watchers.retain(|watcher| watcher.id != self.id);
        watchers.len() != before
    }
}
