//! Embeddable configuration store with dotted-path access.
//!
//! Holds a nested JSON tree seeded from defaults, persists it with debounced
//! temp-then-rename writes, notifies path-scoped watchers synchronously and
//! validates values against caller-supplied rules.

mod changes;
mod loading;
mod merging;
mod options;
mod path_ops;
mod persistence;
mod saving;
mod scheduler;
mod store;
mod validation;
mod watchers;

#[cfg(test)]
mod tests;

pub use changes::{ConfigChange, ConfigError};
pub use loading::{LoadError, LoadOutcome};
pub use merging::deep_merge;
pub use options::{DEFAULT_DEBOUNCE, Migration, StoreOptions};
pub use path_ops::{assign, resolve, watch_matches};
pub use persistence::{
    FileSystemProvider, MemoryProvider, PersistenceFormat, PersistenceProvider, temp_path_for,
};
pub use scheduler::{
    CancelToken, ManualScheduler, ScheduledTask, Scheduler, Task, TokioScheduler,
};
pub use store::ConfigStore;
pub use validation::{Rules, ValidationReport, Validator, Verdict, validators};
pub use watchers::{WatchCallback, WatchHandle, WatchOptions};
