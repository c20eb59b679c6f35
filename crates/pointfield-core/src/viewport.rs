//! Screen, view and data space conversions
//!
//! - Screen space: pixels, origin top-left, y down
//! - NDC: [-1, 1] on both axes, y up
//! - View space: NDC with x stretched by the aspect ratio (what the view
//!   matrix outputs)
//! - Data space: raw point coordinates
//!
//! Data reaches NDC through `projection * view * model`, where the model
//! matrix applies the data aspect ratio and the projection undoes the
//! viewport aspect ratio.

use serde::{Deserialize, Serialize};

use crate::spatial::Aabb;
use crate::transform::Mat4;

/// Size of the drawing surface in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

impl Viewport {
    /// `None` unless both sides are positive and finite
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    pub fn screen_to_ndc(&self, p: [f64; 2]) -> [f64; 2] {
        [-1.0 + p[0] / self.width * 2.0, 1.0 - p[1] / self.height * 2.0]
    }

    pub fn ndc_to_screen(&self, p: [f64; 2]) -> [f64; 2] {
        [(p[0] + 1.0) / 2.0 * self.width, (1.0 - p[1]) / 2.0 * self.height]
    }

    /// Screen position expressed in the view matrix's output space
    pub fn screen_to_view(&self, p: [f64; 2]) -> [f64; 2] {
        let [x, y] = self.screen_to_ndc(p);
        [x * self.aspect_ratio(), y]
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::from_scaling(1.0 / self.aspect_ratio(), 1.0)
    }
}

/// Maps between screen and data space for a given view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenMapping {
    pub viewport: Viewport,
    /// Horizontal stretch applied to data before the view
    pub data_aspect_ratio: f64,
}

impl Default for ScreenMapping {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            data_aspect_ratio: 1.0,
        }
    }
}

impl ScreenMapping {
    pub fn new(viewport: Viewport, data_aspect_ratio: f64) -> Self {
        Self {
            viewport,
            data_aspect_ratio,
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_scaling(self.data_aspect_ratio, 1.0)
    }

    pub fn projection_view_model(&self, view: &Mat4) -> Mat4 {
        self.viewport.projection() * *view * self.model()
    }

    pub fn data_to_screen(&self, view: &Mat4, p: [f64; 2]) -> [f64; 2] {
        let ndc = self.projection_view_model(view).transform_xy(p);
        self.viewport.ndc_to_screen(ndc)
    }

    /// Data position under a screen position; `None` when the combined
    /// transform is singular
    pub fn screen_to_data(&self, view: &Mat4, p: [f64; 2]) -> Option<[f64; 2]> {
        let inverse = self.projection_view_model(view).invert()?;
        Some(inverse.transform_xy(self.viewport.screen_to_ndc(p)))
    }

    /// Data-space box covering the whole viewport
    pub fn visible_bounds(&self, view: &Mat4) -> Option<Aabb> {
        let inverse = self.projection_view_model(view).invert()?;
        let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]
            .map(|ndc| inverse.transform_xy(ndc));
        Aabb::from_points(&corners)
    }

    /// Data-space length of one screen pixel
    pub fn data_units_per_px(&self, view: &Mat4) -> Option<f64> {
        let inverse = self.projection_view_model(view).invert()?;
        let a = inverse.transform_xy([0.0, 0.0]);
        let b = inverse.transform_xy([0.0, 2.0 / self.viewport.height]);
        Some(((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt())
    }
}
