//! Delayed tasks and wall-clock access, behind traits so the widget can be
//! driven without real timers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveTime;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Cancel handle for a scheduled task. Cancelling after the task ran is a no-op.
#[derive(Clone)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<Arc<tokio::task::AbortHandle>>,
}

impl TaskHandle {
    fn new(abort: Option<tokio::task::AbortHandle>) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            abort: abort.map(Arc::new),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Runs tasks on the tokio runtime after sleeping for the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let join = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        TaskHandle::new(Some(join.abort_handle()))
    }
}

struct PendingTask {
    due: Duration,
    handle: TaskHandle,
    task: Task,
}

/// Scheduler whose clock only moves when `advance` is called.
#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    pending: Vec<PendingTask>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks queued and not yet run (cancelled ones included).
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward and run every task that became due, in due order.
    /// Returns how many tasks actually ran.
    pub fn advance(&self, by: Duration) -> usize {
        let mut due: Vec<PendingTask> = {
            let mut inner = self.lock();
            inner.now += by;
            let now = inner.now;
            let (due, rest): (Vec<_>, Vec<_>) =
                inner.pending.drain(..).partition(|p| p.due <= now);
            inner.pending = rest;
            due
        };

        due.sort_by_key(|p| p.due);

        let mut ran = 0;
        for pending in due {
            if !pending.handle.is_cancelled() {
                (pending.task)();
                ran += 1;
            }
        }
        ran
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new(None);
        let mut inner = self.lock();
        let due = inner.now + delay;
        inner.pending.push(PendingTask {
            due,
            handle: handle.clone(),
            task,
        });
        handle
    }
}

/// Source of the time stamped on rendered messages.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Always reports the same time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}
