//! Recurring actions with cancellation.
//!
//! The attendance timer only needs "run this every period until I say stop".
//! [`TokioScheduler`] does that on a tokio task; [`ManualScheduler`] lets a
//! cooperative host (or a test) pump the actions itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

pub type Action = Box<dyn FnMut() + Send + 'static>;

/// Cancels a scheduled action. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<Arc<AbortHandle>>,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_task(cancelled: Arc<AtomicBool>, task: AbortHandle) -> Self {
        Self {
            cancelled,
            task: Some(Arc::new(task)),
        }
    }

    /// Idempotent. The action is never invoked after this returns.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub trait Scheduler {
    /// Run `action` every `period`, starting one period from now.
    fn schedule_every(&self, period: Duration, action: Action) -> TimerHandle;
}

/// Drives actions from a tokio interval on the given runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Uses the runtime of the calling task; `None` outside a runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_every(&self, period: Duration, mut action: Action) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let task = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval.tick().await; // first tick is immediate

            loop {
                interval.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                action();
            }
        });

        TimerHandle::with_task(cancelled, task.abort_handle())
    }
}

struct Entry {
    handle: TimerHandle,
    action: Action,
}

/// Holds scheduled actions until the host calls [`ManualScheduler::fire`].
/// The period is recorded but not enforced.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    entries: Arc<Mutex<Vec<Entry>>>,
    periods: Arc<Mutex<Vec<Duration>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every live action once. Returns how many ran.
    pub fn fire(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|entry| !entry.handle.is_cancelled());
        for entry in entries.iter_mut() {
            (entry.action)();
        }
        entries.len()
    }

    pub fn active_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| !entry.handle.is_cancelled())
            .count()
    }

    /// Every period ever requested, in order.
    pub fn requested_periods(&self) -> Vec<Duration> {
        self.periods
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_every(&self, period: Duration, action: Action) -> TimerHandle {
        let handle = TimerHandle::new();
        self.periods
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(period);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Entry {
                handle: handle.clone(),
                action,
            });
        handle
    }
}
