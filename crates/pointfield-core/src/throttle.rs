//! Throttling with a trailing call
//!
//! Lets at most one value through per interval. The latest value blocked by
//! the throttle is kept and released by [`Throttle::poll`] once input has
//! been quiet for a full interval, so the final value of a burst is never
//! lost. Time is passed in explicitly, which keeps callers deterministic.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: Option<(T, Instant)>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Offer a value; returns it if it may pass now
    pub fn call(&mut self, value: T, now: Instant) -> Option<T> {
        match self.last_fire {
            Some(last) if now.saturating_duration_since(last) < self.interval => {
                self.pending = Some((value, now));
                None
            }
            _ => {
                self.last_fire = Some(now);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// Release the trailing value once it has been quiet for an interval
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.interval);
        if !due {
            return None;
        }
        self.last_fire = Some(now);
        self.pending.take().map(|(value, _)| value)
    }

    /// Release the trailing value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the pending value and the last fire time
    pub fn reset(&mut self) {
        self.last_fire = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_call_passes() {
        let mut throttle = Throttle::new(ms(10));
        assert_eq!(throttle.call(1, Instant::now()), Some(1));
    }

    #[test]
    fn test_calls_inside_interval_are_held() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(10));
        throttle.call(1, t0);
        assert_eq!(throttle.call(2, t0 + ms(3)), None);
        assert_eq!(throttle.call(3, t0 + ms(6)), None);
        assert!(throttle.has_pending());
        assert_eq!(throttle.call(4, t0 + ms(12)), Some(4));
        assert!(!throttle.has_pending());
    }

    #[test]
    fn test_trailing_value_released_after_quiet_interval() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(10));
        throttle.call(1, t0);
        throttle.call(2, t0 + ms(4));
        assert_eq!(throttle.poll(t0 + ms(8)), None);
        assert_eq!(throttle.poll(t0 + ms(14)), Some(2));
        assert_eq!(throttle.poll(t0 + ms(30)), None);
    }

    #[test]
    fn test_flush_and_reset() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(10));
        throttle.call(1, t0);
        throttle.call(2, t0 + ms(1));
        assert_eq!(throttle.flush(), Some(2));

        throttle.call(3, t0 + ms(2));
        throttle.reset();
        assert!(!throttle.has_pending());
        assert_eq!(throttle.call(4, t0 + ms(3)), Some(4));
    }
}
