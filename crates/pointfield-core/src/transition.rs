//! Timed transitions between two point sets

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Easing curve applied to linear time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map `t` in [0, 1] onto the curve; inputs outside are clamped
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    (t - 1.0) * u * u + 1.0
                }
            }
        }
    }
}

/// A running transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    pub fn new(start: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            start,
            duration,
            easing,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        self.easing
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Easing::Linear)]
    #[case(Easing::QuadIn)]
    #[case(Easing::QuadOut)]
    #[case(Easing::QuadInOut)]
    #[case(Easing::CubicIn)]
    #[case(Easing::CubicOut)]
    #[case(Easing::CubicInOut)]
    fn test_easing_endpoints_and_monotonic(#[case] easing: Easing) {
        assert!(easing.apply(0.0).abs() < 1e-12);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        let mut previous = 0.0;
        for i in 1..=100 {
            let value = easing.apply(i as f64 / 100.0);
            assert!(value >= previous - 1e-12);
            previous = value;
        }
    }

    #[test]
    fn test_cubic_in_out_midpoint() {
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(Easing::CubicInOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_progress() {
        let t0 = Instant::now();
        let transition = Transition::new(t0, Duration::from_millis(100), Easing::Linear);
        assert_eq!(transition.progress(t0), 0.0);
        assert!((transition.progress(t0 + Duration::from_millis(25)) - 0.25).abs() < 1e-9);
        assert!(!transition.is_done(t0 + Duration::from_millis(99)));
        assert!(transition.is_done(t0 + Duration::from_millis(100)));
        assert_eq!(transition.progress(t0 + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_done() {
        let t0 = Instant::now();
        let transition = Transition::new(t0, Duration::ZERO, Easing::default());
        assert_eq!(transition.progress(t0), 1.0);
        assert!(transition.is_done(t0));
    }
}
