//! Unit tests for config_store module
//! No filesystem or wall-clock timing: storage is a `MemoryProvider` and
//! debounced saves run on a `ManualScheduler`.

#![allow(clippy::panic)]

mod watchers;

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use crate::config_store::{ConfigChange, ConfigStore, ManualScheduler, MemoryProvider, StoreOptions};

const STORE_PATH: &str = "/config/settings.json";

struct Harness {
    store: ConfigStore,
    provider: Arc<MemoryProvider>,
    scheduler: ManualScheduler,
}

impl Harness {
    fn new(defaults: Value) -> Self {
        Self::build(defaults, MemoryProvider::new(), |options| options)
    }

    fn build(
        defaults: Value,
        provider: MemoryProvider,
        configure: impl FnOnce(StoreOptions) -> StoreOptions,
    ) -> Self {
        let provider = Arc::new(provider);
        let scheduler = ManualScheduler::new();
        let options = StoreOptions::new()
            .persistence_path(STORE_PATH)
            .provider(provider.clone())
            .scheduler(Arc::new(scheduler.clone()));

        let store = ConfigStore::new(defaults, configure(options)).unwrap();

        Self {
            store,
            provider,
            scheduler,
        }
    }

    fn persisted(&self) -> Option<Value> {
        self.provider
            .contents(Path::new(STORE_PATH))
            .map(|contents| serde_json::from_str(&contents).unwrap())
    }
}

type Recorded = Arc<Mutex<Vec<ConfigChange>>>;

fn recorder() -> (Recorded, impl Fn(&ConfigChange) + Send + Sync + 'static) {
    let seen: Recorded = Arc::default();
    let sink = Arc::clone(&seen);

    (seen, move |change: &ConfigChange| {
        sink.lock().unwrap().push(change.clone())
    })
}

fn recorded_paths(seen: &Recorded) -> Vec<String> {
    seen.lock()
        .unwrap()
        .iter()
        .map(|change| change.path.clone())
        .collect()
}
