use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, Weekday};
use tracing::{debug, warn};

use super::{Job, SchedulerAdapter, SchedulerError, SchedulerTask};
use crate::core::schedule::{ScheduleSettings, next_schedule_date};

#[derive(Default)]
struct TaskState {
    scheduled: bool,
    // Bumped on every schedule and cancel so a stale first run cannot
    // start a repeating phase for a newer schedule.
    generation: u64,
    task: Option<SchedulerTask>,
}

/// A job that first runs on a chosen weekday and time, then repeats every
/// [`ScheduleSettings::period`].
pub struct ScheduledTask {
    scheduler: Arc<dyn SchedulerAdapter>,
    settings: ScheduleSettings,
    starting_day: Option<Weekday>,
    starting_time: Option<NaiveTime>,
    job: Job,
    state: Arc<Mutex<TaskState>>,
}

impl ScheduledTask {
    pub fn new(scheduler: Arc<dyn SchedulerAdapter>, settings: ScheduleSettings, job: Job) -> Self {
        Self {
            scheduler,
            settings,
            starting_day: None,
            starting_time: None,
            job,
            state: Arc::new(Mutex::new(TaskState::default())),
        }
    }

    pub fn with_starting_day(mut self, day: Weekday) -> Self {
        self.starting_day = Some(day);
        self
    }

    pub fn with_starting_time(mut self, time: NaiveTime) -> Self {
        self.starting_time = Some(time);
        self
    }

    pub fn settings(&self) -> ScheduleSettings {
        self.settings
    }

    pub fn starting_day(&self) -> Option<Weekday> {
        self.starting_day
    }

    pub fn starting_time(&self) -> Option<NaiveTime> {
        self.starting_time
    }

    pub fn is_scheduled(&self) -> bool {
        self.lock().scheduled
    }

    /// The first run date relative to `now`.
    pub fn next_schedule_date(&self, now: NaiveDateTime) -> NaiveDateTime {
        next_schedule_date(now, self.settings, self.starting_day, self.starting_time)
    }

    /// Start the task relative to the local wall clock.
    pub fn schedule(&self) -> Result<(), SchedulerError> {
        self.schedule_at(Local::now().naive_local())
    }

    /// Start the task as if the current local time were `now`.
    ///
    /// The job runs once at the next schedule date and then every period.
    pub fn schedule_at(&self, now: NaiveDateTime) -> Result<(), SchedulerError> {
        let mut state = self.lock();
        if state.scheduled {
            return Err(SchedulerError::AlreadyScheduled);
        }

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let start = self.next_schedule_date(now);
        let delay = (start - now).to_std().unwrap_or(Duration::ZERO);
        debug!(%start, delay_secs = delay.as_secs(), "scheduling task");

        let job = self.job.clone();
        let scheduler = self.scheduler.clone();
        let shared = self.state.clone();
        let period = self.settings.period;
        let first_run = Box::new(move || {
            job();

            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.scheduled || state.generation != generation {
                debug!(generation, "first run outlived its schedule");
                return;
            }
            match scheduler.async_repeating(job, period) {
                Ok(task) => state.task = Some(task),
                Err(err) => {
                    warn!(error = %err, "could not start repeating task");
                    state.scheduled = false;
                    state.task = None;
                }
            }
        });

        state.task = Some(self.scheduler.async_later(first_run, delay)?);
        state.scheduled = true;
        Ok(())
    }

    /// Stop the task, whether it is waiting for its first run or repeating.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if let Some(task) = state.task.take() {
            task.cancel();
        }
        state.generation = state.generation.wrapping_add(1);
        state.scheduled = false;
    }

    fn lock(&self) -> MutexGuard<'_, TaskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use chrono::NaiveDate;
    use tokio::sync::Notify;
    use tokio::time;

    use super::*;
    use crate::scheduler::{OnceJob, TokioScheduler};

    const HOUR: Duration = Duration::from_secs(3_600);

    fn monday(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid date")
    }

    fn counting_task(scheduler: Arc<dyn SchedulerAdapter>) -> (Arc<AtomicUsize>, ScheduledTask) {
        let count = Arc::new(AtomicUsize::new(0));
        let job_count = count.clone();
        let task = ScheduledTask::new(
            scheduler,
            ScheduleSettings::every(HOUR),
            Arc::new(move || {
                job_count.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .with_starting_day(Weekday::Mon)
        .with_starting_time(NaiveTime::from_hms_opt(10, 0, 0).expect("time"));
        (count, task)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_at_start_date_then_every_period() {
        let scheduler: Arc<dyn SchedulerAdapter> = Arc::new(TokioScheduler::current());
        let (count, task) = counting_task(scheduler);

        task.schedule_at(monday(9, 59, 50)).expect("schedule");
        assert!(task.is_scheduled());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(HOUR * 2).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(task.is_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn cannot_schedule_twice() {
        let scheduler: Arc<dyn SchedulerAdapter> = Arc::new(TokioScheduler::current());
        let (_, task) = counting_task(scheduler);
        task.schedule_at(monday(8, 0, 0)).expect("schedule");
        assert_eq!(
            task.schedule_at(monday(8, 0, 0)),
            Err(SchedulerError::AlreadyScheduled)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_run() {
        let scheduler: Arc<dyn SchedulerAdapter> = Arc::new(TokioScheduler::current());
        let (count, task) = counting_task(scheduler);
        task.schedule_at(monday(9, 59, 0)).expect("schedule");

        task.cancel();
        assert!(!task.is_scheduled());
        time::sleep(HOUR).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        task.schedule_at(monday(9, 59, 0)).expect("reschedule");
        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_repeating_phase() {
        let scheduler: Arc<dyn SchedulerAdapter> = Arc::new(TokioScheduler::current());
        let (count, task) = counting_task(scheduler);
        task.schedule_at(monday(9, 59, 59)).expect("schedule");

        time::sleep(HOUR + Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        task.cancel();
        time::sleep(HOUR * 3).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rescheduling_during_first_run_leaves_one_repeating_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(Notify::new());
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);

        let job_count = count.clone();
        let job_started = started.clone();
        let job: Job = Arc::new(move || {
            if job_count.fetch_add(1, Ordering::SeqCst) == 0 {
                job_started.notify_one();
                let _ = release_rx
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .recv();
            }
        });
        let scheduler: Arc<dyn SchedulerAdapter> = Arc::new(TokioScheduler::current());
        let task = ScheduledTask::new(scheduler, ScheduleSettings::every(Duration::from_secs(1)), job)
            .with_starting_day(Weekday::Mon)
            .with_starting_time(NaiveTime::from_hms_opt(10, 0, 0).expect("time"));

        task.schedule_at(monday(9, 59, 59)).expect("schedule");
        time::timeout(Duration::from_secs(5), started.notified())
            .await
            .expect("first run started");

        task.cancel();
        let shortly_before = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_milli_opt(9, 59, 59, 800))
            .expect("valid date");
        task.schedule_at(shortly_before).expect("reschedule");
        release_tx.send(()).expect("release first run");

        time::sleep(Duration::from_millis(500)).await;
        task.cancel();
        let at_cancel = count.load(Ordering::SeqCst);
        assert_eq!(at_cancel, 2);

        time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_cancel);
        assert!(!task.is_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_fails_after_shutdown() {
        let scheduler = Arc::new(TokioScheduler::current());
        scheduler.shutdown();
        let (_, task) = counting_task(scheduler);
        assert_eq!(task.schedule_at(monday(8, 0, 0)), Err(SchedulerError::ShutDown));
        assert!(!task.is_scheduled());
    }

    #[test]
    fn next_date_uses_settings() {
        let scheduler: Arc<dyn SchedulerAdapter> = Arc::new(NoopScheduler);
        let (_, task) = counting_task(scheduler);
        assert_eq!(task.next_schedule_date(monday(9, 0, 0)), monday(10, 0, 0));
        assert_eq!(
            task.next_schedule_date(monday(11, 0, 0)),
            monday(10, 0, 0) + chrono::TimeDelta::days(7)
        );
    }

    struct NoopScheduler;

    impl SchedulerAdapter for NoopScheduler {
        fn execute_async(&self, _job: OnceJob) -> Result<SchedulerTask, SchedulerError> {
            Err(SchedulerError::ShutDown)
        }

        fn async_later(
            &self,
            _job: OnceJob,
            _delay: Duration,
        ) -> Result<SchedulerTask, SchedulerError> {
            Err(SchedulerError::ShutDown)
        }

        fn async_repeating(
            &self,
            _job: Job,
            _interval: Duration,
        ) -> Result<SchedulerTask, SchedulerError> {
            Err(SchedulerError::ShutDown)
        }

        fn shutdown(&self) {}
    }
}
