//! 2D view camera
//!
//! The camera is a homogeneous view matrix with per-axis scale bounds and
//! translation bounds. Every operation pre-multiplies the current view, so
//! pans, zooms and rotations are expressed in the already transformed frame
//! and compose at any rotation or scale.
//!
//! - [`ViewCamera`] holds the pure transform operations
//! - [`InteractiveCamera`] turns pointer accumulators into those operations
//!   once per frame

mod interactive;

pub use interactive::{CameraControls, DragAction, InteractiveCamera};

use serde::{Deserialize, Serialize};

use crate::transform::Mat4;

/// A `[min, max]` pair for both axes, or one pair per axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bounds {
    Uniform([f64; 2]),
    PerAxis([[f64; 2]; 2]),
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds::Uniform([f64::NEG_INFINITY, f64::INFINITY]);

    pub fn per_axis(&self) -> [[f64; 2]; 2] {
        match *self {
            Bounds::Uniform(pair) => [pair, pair],
            Bounds::PerAxis(pairs) => pairs,
        }
    }

    /// Both pairs are ordered and free of NaN
    pub fn is_valid(&self) -> bool {
        self.per_axis()
            .iter()
            .all(|[min, max]| !min.is_nan() && !max.is_nan() && min <= max)
    }
}

/// Zoom factor, uniform or per axis. Values above 1 zoom in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoomFactor {
    Uniform(f64),
    PerAxis([f64; 2]),
}

impl ZoomFactor {
    pub fn per_axis(&self) -> [f64; 2] {
        match *self {
            ZoomFactor::Uniform(f) => [f, f],
            ZoomFactor::PerAxis(f) => f,
        }
    }
}

impl From<f64> for ZoomFactor {
    fn from(f: f64) -> Self {
        ZoomFactor::Uniform(f)
    }
}

impl From<[f64; 2]> for ZoomFactor {
    fn from(f: [f64; 2]) -> Self {
        ZoomFactor::PerAxis(f)
    }
}

/// Initial camera placement
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAt {
    /// Data position shown at the view center
    pub target: [f64; 2],
    /// Reciprocal zoom; 1 shows the unit square
    pub distance: f64,
    /// Counter-clockwise rotation in radians
    pub rotation: f64,
}

impl Default for LookAt {
    fn default() -> Self {
        Self {
            target: [0.0, 0.0],
            distance: 1.0,
            rotation: 0.0,
        }
    }
}

/// Bounded 2D affine view transform
#[derive(Clone, Debug, PartialEq)]
pub struct ViewCamera {
    view: Mat4,
    view_center: [f64; 2],
    scale_bounds: [[f64; 2]; 2],
    translation_bounds: [[f64; 2]; 2],
    initial: LookAt,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self::new(LookAt::default())
    }
}

impl ViewCamera {
    pub fn new(initial: LookAt) -> Self {
        let mut camera = Self {
            view: Mat4::IDENTITY,
            view_center: [0.0, 0.0],
            scale_bounds: [[0.0, f64::INFINITY]; 2],
            translation_bounds: Bounds::UNBOUNDED.per_axis(),
            initial,
        };
        camera.look_at(initial.target, initial.distance, initial.rotation);
        camera
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn view_center(&self) -> [f64; 2] {
        self.view_center
    }

    pub fn scale_bounds(&self) -> [[f64; 2]; 2] {
        self.scale_bounds
    }

    pub fn translation_bounds(&self) -> [[f64; 2]; 2] {
        self.translation_bounds
    }

    pub fn translation(&self) -> [f64; 2] {
        self.view.translation()
    }

    /// Per-axis scale of the view
    pub fn scaling(&self) -> [f64; 2] {
        self.view.scaling()
    }

    pub fn min_scaling(&self) -> f64 {
        let [sx, sy] = self.scaling();
        sx.min(sy)
    }

    pub fn max_scaling(&self) -> f64 {
        let [sx, sy] = self.scaling();
        sx.max(sy)
    }

    /// Rotation angle recovered from the view matrix.
    ///
    /// Only the magnitude survives: the result lies in `[0, pi]`.
    pub fn rotation(&self) -> f64 {
        let max = self.max_scaling();
        if max == 0.0 {
            return 0.0;
        }
        (self.view.0[0] / max).clamp(-1.0, 1.0).acos()
    }

    /// Reciprocal of the per-axis scaling
    pub fn distance(&self) -> [f64; 2] {
        let [sx, sy] = self.scaling();
        [1.0 / sx, 1.0 / sy]
    }

    /// Data position under the view center
    pub fn target(&self) -> Option<[f64; 2]> {
        self.view
            .invert()
            .map(|inverse| inverse.transform_xy(self.view_center))
    }

    /// Translate in the view's own frame. Returns whether the view changed.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        let before = self.view;
        self.view = Mat4::from_translation(dx, dy) * self.view;
        self.clamp_translation();
        self.view != before
    }

    /// Scale about `anchor` (view-space), or about the view center.
    ///
    /// The resulting scale is clamped to the scale bounds; when clamping
    /// leaves nothing to do the view is untouched.
    pub fn zoom(&mut self, factor: impl Into<ZoomFactor>, anchor: Option<[f64; 2]>) -> bool {
        let [mut dx, mut dy] = factor.into().per_axis();
        if !(dx > 0.0) || !(dy > 0.0) || (dx == 1.0 && dy == 1.0) {
            return false;
        }

        let [sx, sy] = self.scaling();
        if !(sx > 0.0) || !(sy > 0.0) {
            return false;
        }
        let [[min_x, max_x], [min_y, max_y]] = self.scale_bounds;
        dx = (sx * dx).max(min_x).min(max_x) / sx;
        dy = (sy * dy).max(min_y).min(max_y) / sy;
        if dx == 1.0 && dy == 1.0 {
            return false;
        }

        let [ax, ay] = anchor
            .filter(|a| a[0].is_finite() && a[1].is_finite())
            .unwrap_or(self.view_center);
        self.view = Mat4::from_translation(ax, ay)
            * Mat4::from_scaling(dx, dy)
            * Mat4::from_translation(-ax, -ay)
            * self.view;
        self.clamp_translation();
        true
    }

    /// Rotate counter-clockwise about the view center
    pub fn rotate(&mut self, radians: f64) -> bool {
        if !radians.is_finite() || radians == 0.0 {
            return false;
        }
        let [cx, cy] = self.view_center;
        self.view = Mat4::from_translation(cx, cy)
            * Mat4::from_rotation_z(radians)
            * Mat4::from_translation(-cx, -cy)
            * self.view;
        true
    }

    /// Reset and look at `target` from `distance` with the given rotation
    pub fn look_at(&mut self, target: [f64; 2], distance: f64, rotation: f64) {
        self.view = Mat4::IDENTITY;
        self.pan(-target[0], -target[1]);
        self.rotate(rotation);
        if distance > 0.0 {
            self.zoom(1.0 / distance, None);
        }
    }

    /// Back to the initial placement
    pub fn reset(&mut self) {
        let LookAt {
            target,
            distance,
            rotation,
        } = self.initial;
        self.look_at(target, distance, rotation);
    }

    /// Replace the view matrix; ignored when any entry is non-finite
    pub fn set_view(&mut self, view: Mat4) -> bool {
        if !view.is_finite() {
            return false;
        }
        self.view = view;
        self.enforce_scale_bounds();
        self.clamp_translation();
        true
    }

    pub fn set_view_center(&mut self, center: [f64; 2]) {
        if center[0].is_finite() && center[1].is_finite() {
            self.view_center = center;
        }
    }

    /// Set scale bounds. Inverted pairs are ignored and negative minimums
    /// are raised to zero. Returns whether the bounds were accepted.
    pub fn set_scale_bounds(&mut self, bounds: Bounds) -> bool {
        if !bounds.is_valid() {
            tracing::debug!("Ignoring invalid scale bounds {:?}", bounds);
            return false;
        }
        let mut pairs = bounds.per_axis();
        for pair in &mut pairs {
            pair[0] = pair[0].max(0.0);
            pair[1] = pair[1].max(pair[0]);
        }
        self.scale_bounds = pairs;
        self.enforce_scale_bounds();
        true
    }

    /// Set translation bounds. Inverted pairs are ignored.
    pub fn set_translation_bounds(&mut self, bounds: Bounds) -> bool {
        if !bounds.is_valid() {
            tracing::debug!("Ignoring invalid translation bounds {:?}", bounds);
            return false;
        }
        self.translation_bounds = bounds.per_axis();
        self.clamp_translation();
        true
    }

    /// Pull the current scale back inside the scale bounds
    fn enforce_scale_bounds(&mut self) {
        let [sx, sy] = self.scaling();
        if !(sx > 0.0) || !(sy > 0.0) {
            return;
        }
        let [[min_x, max_x], [min_y, max_y]] = self.scale_bounds;
        let dx = sx.max(min_x).min(max_x) / sx;
        let dy = sy.max(min_y).min(max_y) / sy;
        if dx != 1.0 || dy != 1.0 {
            let [cx, cy] = self.view_center;
            self.view = Mat4::from_translation(cx, cy)
                * Mat4::from_scaling(dx, dy)
                * Mat4::from_translation(-cx, -cy)
                * self.view;
        }
    }

    fn clamp_translation(&mut self) {
        let [[min_x, max_x], [min_y, max_y]] = self.translation_bounds;
        let [tx, ty] = self.view.translation();
        let clamped = [tx.max(min_x).min(max_x), ty.max(min_y).min(max_y)];
        if clamped != [tx, ty] {
            self.view.set_translation(clamped);
        }
    }
}
