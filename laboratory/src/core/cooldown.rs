//! Cooldowns measured against a caller-supplied clock.

use std::time::{Duration, Instant};

/// A cooldown that can be shortened while it is running.
///
/// Time is passed in explicitly so callers decide which clock to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooldown {
    initial: Duration,
    ends_at: Option<Instant>,
}

impl Cooldown {
    pub fn new(initial: Duration) -> Self {
        Self {
            initial,
            ends_at: None,
        }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// Restart the full cooldown from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.ends_at = Some(now + self.initial);
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.ends_at
            .map_or(Duration::ZERO, |ends_at| ends_at.saturating_duration_since(now))
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    /// Shorten the cooldown by `ratio` of the time still remaining.
    pub fn reduce_remaining(&mut self, ratio: f64, now: Instant) {
        let remaining = self.remaining(now);
        self.reduce(remaining.mul_f64(clamp_ratio(ratio)), now);
    }

    /// Shorten the cooldown by `ratio` of the initial cooldown.
    pub fn reduce_initial(&mut self, ratio: f64, now: Instant) {
        self.reduce(self.initial.mul_f64(clamp_ratio(ratio)), now);
    }

    fn reduce(&mut self, amount: Duration, now: Instant) {
        if let Some(ends_at) = self.ends_at {
            let shortened = ends_at.checked_sub(amount).unwrap_or(now);
            self.ends_at = Some(shortened.max(now));
        }
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_SECONDS: Duration = Duration::from_secs(10);

    #[test]
    fn never_reset_is_ready() {
        let cooldown = Cooldown::new(TEN_SECONDS);
        let now = Instant::now();
        assert!(cooldown.is_ready(now));
        assert_eq!(cooldown.remaining(now), Duration::ZERO);
    }

    #[test]
    fn counts_down_after_reset() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(TEN_SECONDS);
        cooldown.reset(start);

        assert_eq!(cooldown.remaining(start), TEN_SECONDS);
        assert_eq!(cooldown.remaining(start + Duration::from_secs(4)), Duration::from_secs(6));
        assert!(!cooldown.is_ready(start + Duration::from_secs(9)));
        assert!(cooldown.is_ready(start + TEN_SECONDS));
    }

    #[test]
    fn reduce_remaining_uses_time_left() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(TEN_SECONDS);
        cooldown.reset(start);

        let later = start + Duration::from_secs(6);
        cooldown.reduce_remaining(0.5, later);
        assert_eq!(cooldown.remaining(later), Duration::from_secs(2));
    }

    #[test]
    fn reduce_initial_uses_full_cooldown() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(TEN_SECONDS);
        cooldown.reset(start);

        let later = start + Duration::from_secs(2);
        cooldown.reduce_initial(0.3, later);
        assert_eq!(cooldown.remaining(later), Duration::from_secs(5));

        cooldown.reduce_initial(0.9, later);
        assert!(cooldown.is_ready(later));
    }

    #[test]
    fn ratios_are_clamped() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(TEN_SECONDS);
        cooldown.reset(start);

        cooldown.reduce_remaining(-1.0, start);
        assert_eq!(cooldown.remaining(start), TEN_SECONDS);
        cooldown.reduce_remaining(7.0, start);
        assert!(cooldown.is_ready(start));
    }

    #[test]
    fn reducing_an_idle_cooldown_is_a_no_op() {
        let now = Instant::now();
        let mut cooldown = Cooldown::new(TEN_SECONDS);
        cooldown.reduce_initial(0.5, now);
        assert!(cooldown.is_ready(now));
    }
}
