//! Density-driven point opacity
//!
//! Counts how many points fall inside the visible bounds and derives an
//! opacity that keeps dense views from saturating. The count is refreshed
//! through a throttle so continuous panning only recounts once per interval
//! plus a trailing recount when the view settles.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::spatial::{Aabb, KdIndex};
use crate::throttle::Throttle;
use crate::viewport::Viewport;

/// Inputs of the opacity formula that come from the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityInputs {
    pub viewport: Viewport,
    /// Fraction of the viewport the points should cover
    pub fill: f64,
    /// Rendered point size in pixels, already scaled for zoom
    pub point_size: f64,
    /// `view[0] * view[5]` of the current view matrix
    pub view_scale: f64,
}

/// Opacity for `n_in_view` points, clamped to [0, 1]
pub fn density_opacity(n_in_view: usize, inputs: &DensityInputs) -> f64 {
    let p = inputs.point_size;
    if n_in_view == 0 || !(p > 0.0) {
        return 1.0;
    }

    let Viewport { width, height } = inputs.viewport;
    let covered = (n_in_view as f64) * p * p;
    let mut opacity = inputs.fill * width * height / covered * inputs.view_scale.min(1.0);

    // Points are discs, not squares
    opacity *= 1.0 / (0.25 * PI);

    // Small points are drawn larger than their nominal size
    let correction = p / (p.max(1.0) + 0.5);
    opacity *= correction * correction;

    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Throttled count of points inside the visible bounds
#[derive(Clone, Debug)]
pub struct DensityEstimator {
    throttle: Throttle<Aabb>,
    points_in_view: Option<usize>,
}

impl DensityEstimator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            throttle: Throttle::new(debounce),
            points_in_view: None,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.throttle.set_interval(debounce);
    }

    /// Last count, if one has been made since the last reset
    pub fn points_in_view(&self) -> Option<usize> {
        self.points_in_view
    }

    /// Forget the count, for instance after the dataset changed
    pub fn reset(&mut self) {
        self.throttle.reset();
        self.points_in_view = None;
    }

    /// Request a recount for `bounds`; returns whether the count was updated
    pub fn request(&mut self, bounds: Aabb, index: &KdIndex, now: Instant) -> bool {
        match self.throttle.call(bounds, now) {
            Some(bounds) => {
                self.recount(bounds, index);
                true
            }
            None => false,
        }
    }

    /// Run the trailing recount once it is due
    pub fn poll(&mut self, index: &KdIndex, now: Instant) -> bool {
        match self.throttle.poll(now) {
            Some(bounds) => {
                self.recount(bounds, index);
                true
            }
            None => false,
        }
    }

    fn recount(&mut self, bounds: Aabb, index: &KdIndex) {
        let count = index
            .range(bounds.min[0], bounds.min[1], bounds.max[0], bounds.max[1])
            .len();
        tracing::trace!("{} points in view", count);
        self.points_in_view = Some(count);
    }
}
