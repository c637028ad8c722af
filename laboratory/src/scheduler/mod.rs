//! Background job scheduling on a tokio runtime.
//!
//! Jobs are plain synchronous closures; they run on runtime worker threads and
//! should stay short. [`ScheduledTask`] layers calendar-based start dates on
//! top of a [`SchedulerAdapter`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

mod scheduled_task;

pub use scheduled_task::ScheduledTask;

/// A job that may run many times.
pub type Job = Arc<dyn Fn() + Send + Sync + 'static>;

/// A job that runs once.
pub type OnceJob = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("scheduler has been shut down")]
    ShutDown,
    #[error("task is already scheduled")]
    AlreadyScheduled,
    #[error("repeat interval must be greater than zero")]
    ZeroInterval,
}

/// Runs jobs in the background.
pub trait SchedulerAdapter: Send + Sync {
    /// Run `job` as soon as possible.
    fn execute_async(&self, job: OnceJob) -> Result<SchedulerTask, SchedulerError>;

    /// Run `job` once after `delay`.
    fn async_later(&self, job: OnceJob, delay: Duration) -> Result<SchedulerTask, SchedulerError>;

    /// Run `job` every `interval`, the first time one interval from now.
    fn async_repeating(&self, job: Job, interval: Duration)
    -> Result<SchedulerTask, SchedulerError>;

    /// Cancel every outstanding task and refuse new ones.
    fn shutdown(&self);
}

/// Handle to a submitted job.
#[derive(Debug, Clone)]
pub struct SchedulerTask {
    handle: AbortHandle,
    cancelled: Arc<AtomicBool>,
}

impl SchedulerTask {
    fn new(handle: AbortHandle) -> Self {
        Self {
            handle,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop the job. A run already in progress completes.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the job has stopped, by completing or by being cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// [`SchedulerAdapter`] spawning onto a tokio runtime.
pub struct TokioScheduler {
    handle: Handle,
    tasks: Mutex<Vec<SchedulerTask>>,
    shut_down: AtomicBool,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Use the runtime the caller is running on.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn spawn<F>(&self, future: F) -> Result<SchedulerTask, SchedulerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_shut_down() {
            return Err(SchedulerError::ShutDown);
        }
        tasks.retain(|task| !task.is_finished());
        let task = SchedulerTask::new(self.handle.spawn(future).abort_handle());
        tasks.push(task.clone());
        Ok(task)
    }
}

impl SchedulerAdapter for TokioScheduler {
    fn execute_async(&self, job: OnceJob) -> Result<SchedulerTask, SchedulerError> {
        self.spawn(async move { job() })
    }

    fn async_later(&self, job: OnceJob, delay: Duration) -> Result<SchedulerTask, SchedulerError> {
        debug!(delay_ms = delay.as_millis(), "scheduling delayed job");
        self.spawn(async move {
            time::sleep(delay).await;
            job();
        })
    }

    fn async_repeating(
        &self,
        job: Job,
        interval: Duration,
    ) -> Result<SchedulerTask, SchedulerError> {
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        debug!(interval_ms = interval.as_millis(), "scheduling repeating job");
        self.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                job();
            }
        })
    }

    fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        self.shut_down.store(true, Ordering::SeqCst);
        debug!(outstanding = tasks.len(), "scheduler shutting down");
        for task in tasks.drain(..) {
            task.cancel();
        }
    }
}
