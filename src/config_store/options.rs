use std::{fmt, path::PathBuf, sync::Arc, time::Duration};

use serde_json::Value;

use super::{
    persistence::{FileSystemProvider, PersistenceFormat, PersistenceProvider},
    scheduler::{Scheduler, TokioScheduler},
};

/// Upgrade hook applied to a loaded tree whose `version` differs from the defaults'.
pub type Migration = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Quiet interval before a scheduled save runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Construction options for a [`ConfigStore`](super::ConfigStore).
///
/// Built with chained setters starting from [`StoreOptions::new`]:
///
/// ```rust,no_run
/// use settle::config_store::StoreOptions;
///
/// let options = StoreOptions::new()
///     .persistence_path("/tmp/settings.json")
///     .auto_save(true);
/// ```
#[derive(Clone)]
pub struct StoreOptions {
    pub(super) auto_save: bool,
    pub(super) persistence_path: Option<PathBuf>,
    pub(super) provider: Arc<dyn PersistenceProvider>,
    pub(super) migrate: Option<Migration>,
    pub(super) debounce: Duration,
    pub(super) format: PersistenceFormat,
    pub(super) scheduler: Option<Arc<dyn Scheduler>>,
    pub(super) segment_boundary_matching: bool,
}

impl StoreOptions {
    /// Auto-save on, no persistence path, local filesystem, JSON, 500 ms debounce.
    pub fn new() -> Self {
        Self {
            auto_save: true,
            persistence_path: None,
            provider: Arc::new(FileSystemProvider),
            migrate: None,
            debounce: DEFAULT_DEBOUNCE,
            format: PersistenceFormat::default(),
            scheduler: None,
            segment_boundary_matching: false,
        }
    }

    /// Whether `set` and `update` schedule a debounced save.
    pub fn auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    /// File the tree is loaded from and saved to.
    pub fn persistence_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persistence_path = Some(path.into());
        self
    }

    /// Storage backend to persist through.
    pub fn provider(mut self, provider: Arc<dyn PersistenceProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Upgrade hook for persisted trees from another `version`.
    pub fn migrate<F>(mut self, migrate: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.migrate = Some(Arc::new(migrate));
        self
    }

    /// Debounce interval for scheduled saves.
    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = interval;
        self
    }

    /// On-disk format.
    pub fn format(mut self, format: PersistenceFormat) -> Self {
        self.format = format;
        self
    }

    /// Scheduler that runs debounced saves. Defaults to [`TokioScheduler::current`].
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Makes watchers match only on whole path segments, so a watcher on
    /// `"a"` no longer sees changes to `"ab"`.
    pub fn segment_boundary_matching(mut self, enabled: bool) -> Self {
        self.segment_boundary_matching = enabled;
        self
    }

    pub(super) fn take_scheduler(&mut self) -> Arc<dyn Scheduler> {
        self.scheduler
            .take()
            .unwrap_or_else(|| Arc::new(TokioScheduler::current()))
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("auto_save", &self.auto_save)
            .field("persistence_path", &self.persistence_path)
            .field("migrate", &self.migrate.is_some())
            .field("debounce", &self.debounce)
            .field("format", &self.format)
            .field("segment_boundary_matching", &self.segment_boundary_matching)
            .finish_non_exhaustive()
    }
}
