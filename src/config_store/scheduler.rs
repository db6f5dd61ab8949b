//! Deferred-task scheduling for debounced saves.
//!
//! The store never touches a clock directly. It asks a [`Scheduler`] to run
//! a task after a delay and keeps the returned [`ScheduledTask`] so it can
//! cancel it when a newer save supersedes it.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use tokio::{runtime::Handle, task::AbortHandle};
use tracing::debug;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay.
///
/// Implementations must check the task's [`CancelToken`] right before
/// running it; a cancelled task must never run. A task that is already due
/// may run inline from [`schedule`](Self::schedule); the store calls it
/// without holding any of its locks.
pub trait Scheduler: Send + Sync {
    /// Schedules `task` to run once `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask;
}

/// Shared cancellation flag between a [`ScheduledTask`] and its runner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Returns `true` once the owning task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Handle to a task handed to a [`Scheduler`].
#[derive(Debug)]
pub struct ScheduledTask {
    token: CancelToken,
    abort: Option<AbortHandle>,
}

impl ScheduledTask {
    /// Wraps the token the scheduler checks before running the task.
    pub fn new(token: CancelToken) -> Self {
        Self { token, abort: None }
    }

    /// Cancels the task. Has no effect if it already ran.
    pub fn cancel(self) {
        self.token.cancel();
        if let Some(abort) = self.abort {
            abort.abort();
        }
    }

    /// Returns `true` if [`cancel`](Self::cancel) was called on this task.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Default scheduler backed by tokio timers.
///
/// Tasks run on the runtime that was current when the scheduler was
/// created. Without one, each task sleeps on its own thread instead.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Option<Handle>,
}

impl TokioScheduler {
    /// Captures the tokio runtime of the calling context, if any.
    pub fn current() -> Self {
        Self {
            handle: Handle::try_current().ok(),
        }
    }

    /// Schedules onto an explicit runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let token = CancelToken::default();
        let guard = token.clone();

        match &self.handle {
            Some(handle) => {
                let join = handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if !guard.is_cancelled() {
                        task();
                    }
                });

                ScheduledTask {
                    token,
                    abort: Some(join.abort_handle()),
                }
            }
            None => {
                debug!("No tokio runtime available, deferring on a timer thread");
                thread::spawn(move || {
                    thread::sleep(delay);
                    if !guard.is_cancelled() {
                        task();
                    }
                });

                ScheduledTask::new(token)
            }
        }
    }
}

/// Scheduler driven by a virtual clock that only moves when told to.
///
/// Clones share the same queue, so a test can keep one clone and hand
/// another to the store.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    entries: Vec<ManualEntry>,
}

struct ManualEntry {
    due: Duration,
    seq: u64,
    token: CancelToken,
    task: Task,
}

impl ManualScheduler {
    /// Creates a scheduler with its clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of scheduled tasks that are neither cancelled nor run yet.
    pub fn pending(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|entry| !entry.token.is_cancelled())
            .count()
    }

    /// Moves the clock forward, running every task that falls due in order.
    ///
    /// Tasks run without the queue locked, so they may schedule further
    /// tasks; those run too if they fall due within the same window.
    /// Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut ran = 0;

        while let Some(entry) = self.pop_due(target) {
            if entry.token.is_cancelled() {
                continue;
            }
            (entry.task)();
            ran += 1;
        }

        self.lock().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<ManualEntry> {
        let mut queue = self.lock();
        queue.entries.retain(|entry| !entry.token.is_cancelled());

        let index = queue
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)?;

        let entry = queue.entries.remove(index);
        queue.now = entry.due;
        Some(entry)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let token = CancelToken::default();
        let mut queue = self.lock();

        let entry = ManualEntry {
            due: queue.now + delay,
            seq: queue.next_seq,
            token: token.clone(),
            task,
        };
        queue.next_seq += 1;
        queue.entries.push(entry);

        ScheduledTask::new(token)
    }
}
