//! Calendar arithmetic for weekly tasks.

use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta, Weekday};

/// How often a scheduled job repeats once it has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub period: Duration,
}

impl ScheduleSettings {
    pub const fn every(period: Duration) -> Self {
        Self { period }
    }
}

/// The first date a job should run, relative to `now`.
///
/// The time of day is taken from `starting_time` (or `now`). When no day is
/// given, the weekday of `now + period` is used. A target still ahead of `now`
/// may land on the same day; otherwise the next occurrence of the day is used.
pub fn next_schedule_date(
    now: NaiveDateTime,
    settings: ScheduleSettings,
    starting_day: Option<Weekday>,
    starting_time: Option<NaiveTime>,
) -> NaiveDateTime {
    let target = starting_time.map_or(now, |time| now.date().and_time(time));
    let day = starting_day.unwrap_or_else(|| {
        let period = TimeDelta::from_std(settings.period).unwrap_or(TimeDelta::MAX);
        now.checked_add_signed(period)
            .map_or_else(|| now.weekday(), |later| later.weekday())
    });

    let ahead = i64::from(day.days_since(target.weekday()));
    let days = if now < target || ahead > 0 { ahead } else { 7 };
    target + TimeDelta::days(days)
}
