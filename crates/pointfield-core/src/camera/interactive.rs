//! Frame-driven camera control
//!
//! Pointer handlers only update accumulators. `tick` consumes them once per
//! frame and applies at most one drag action (pan or rotate) plus scroll
//! zoom through the pure [`ViewCamera`] operations.

use serde::{Deserialize, Serialize};

use super::{Bounds, LookAt, ViewCamera, ZoomFactor};
use crate::transform::Mat4;
use crate::viewport::Viewport;

/// Pixels per line for line-mode wheel deltas
const WHEEL_LINE_HEIGHT: f64 = 12.0;

/// What a primary-button drag does without the override modifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragAction {
    #[default]
    Pan,
    Rotate,
}

/// Speeds and directions for pointer navigation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraControls {
    pub default_action: DragAction,
    pub pan_speed: f64,
    pub zoom_speed: f64,
    pub rotate_speed: f64,
    /// Invert the pan direction per axis; y is inverted by default so that
    /// content follows the pointer on a y-down screen
    pub pan_inverted: [bool; 2],
}

impl Default for CameraControls {
    fn default() -> Self {
        Self {
            default_action: DragAction::Pan,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            rotate_speed: 1.0,
            pan_inverted: [false, true],
        }
    }
}

/// A [`ViewCamera`] driven by accumulated pointer input
#[derive(Clone, Debug)]
pub struct InteractiveCamera {
    camera: ViewCamera,
    viewport: Viewport,
    controls: CameraControls,
    pointer: [f64; 2],
    prev_pointer: [f64; 2],
    primary_down: bool,
    modifier_held: bool,
    scroll_y: f64,
    scroll_anchor: [f64; 2],
    drag_enabled: bool,
    fixed: bool,
    programmatic_change: bool,
}

impl InteractiveCamera {
    pub fn new(camera: ViewCamera, viewport: Viewport, controls: CameraControls) -> Self {
        Self {
            camera,
            viewport,
            controls,
            pointer: [0.0, 0.0],
            prev_pointer: [0.0, 0.0],
            primary_down: false,
            modifier_held: false,
            scroll_y: 0.0,
            scroll_anchor: [0.0, 0.0],
            drag_enabled: true,
            fixed: false,
            programmatic_change: false,
        }
    }

    pub fn camera(&self) -> &ViewCamera {
        &self.camera
    }

    pub fn view(&self) -> &Mat4 {
        self.camera.view()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn controls(&self) -> &CameraControls {
        &self.controls
    }

    pub fn set_controls(&mut self, controls: CameraControls) {
        self.controls = controls;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // Accumulators

    pub fn pointer_down(&mut self, position: [f64; 2]) {
        self.primary_down = true;
        self.pointer = position;
        self.prev_pointer = position;
    }

    pub fn pointer_up(&mut self) {
        self.primary_down = false;
    }

    pub fn pointer_move(&mut self, position: [f64; 2]) {
        if position[0].is_finite() && position[1].is_finite() {
            self.pointer = position;
        }
    }

    /// Accumulate a vertical wheel delta anchored at `position`
    pub fn wheel(&mut self, delta_y: f64, line_mode: bool, position: [f64; 2]) {
        if !delta_y.is_finite() {
            return;
        }
        let delta = if line_mode {
            delta_y * WHEEL_LINE_HEIGHT
        } else {
            delta_y
        };
        self.scroll_y += delta;
        self.scroll_anchor = position;
    }

    /// Whether the drag override modifier is held
    pub fn set_modifier_held(&mut self, held: bool) {
        self.modifier_held = held;
    }

    /// Suspend drag pan/rotate (scroll zoom stays active)
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.drag_enabled = enabled;
    }

    /// Ignore all pointer input until unfixed
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// The drag action a primary-button drag performs right now
    pub fn active_drag_action(&self) -> DragAction {
        match (self.controls.default_action, self.modifier_held) {
            (DragAction::Pan, false) | (DragAction::Rotate, true) => DragAction::Pan,
            _ => DragAction::Rotate,
        }
    }

    /// Apply accumulated input. Returns whether the view changed since the
    /// previous tick, interactively or programmatically.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if !self.fixed {
            if self.primary_down && self.drag_enabled {
                changed |= match self.active_drag_action() {
                    DragAction::Pan => self.drag_pan(),
                    DragAction::Rotate => self.drag_rotate(),
                };
            }
            if self.scroll_y != 0.0 {
                changed |= self.scroll_zoom();
            }
        }

        self.scroll_y = 0.0;
        self.prev_pointer = self.pointer;

        changed | std::mem::take(&mut self.programmatic_change)
    }

    fn drag_pan(&mut self) -> bool {
        let mut dx = self.pointer[0] - self.prev_pointer[0];
        let mut dy = self.pointer[1] - self.prev_pointer[1];
        if self.controls.pan_inverted[0] {
            dx = -dx;
        }
        if self.controls.pan_inverted[1] {
            dy = -dy;
        }

        let Viewport { width, height } = self.viewport;
        let speed = self.controls.pan_speed;
        self.camera.pan(
            speed * dx / width * 2.0 * self.viewport.aspect_ratio(),
            speed * dy / height * 2.0,
        )
    }

    fn drag_rotate(&mut self) -> bool {
        let [cx, cy] = self.viewport.center();
        let a = [self.prev_pointer[0] - cx, cy - self.prev_pointer[1]];
        let b = [self.pointer[0] - cx, cy - self.pointer[1]];

        let len_a = a[0].hypot(a[1]);
        let len_b = b[0].hypot(b[1]);
        if len_a == 0.0 || len_b == 0.0 || a == b {
            return false;
        }

        let cos = ((a[0] * b[0] + a[1] * b[1]) / (len_a * len_b)).clamp(-1.0, 1.0);
        let cross = a[0] * b[1] - a[1] * b[0];
        let sign = if cross > 0.0 { 1.0 } else { -1.0 };
        self.camera.rotate(self.controls.rotate_speed * cos.acos() * sign)
    }

    fn scroll_zoom(&mut self) -> bool {
        let dz = self.controls.zoom_speed * (self.scroll_y / self.viewport.height).exp();
        let anchor = self.viewport.screen_to_view(self.scroll_anchor);
        self.camera.zoom(1.0 / dz, Some(anchor))
    }

    // Programmatic operations

    fn mark(&mut self, changed: bool) -> bool {
        self.programmatic_change |= changed;
        changed
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        let changed = self.camera.pan(dx, dy);
        self.mark(changed)
    }

    pub fn zoom(&mut self, factor: impl Into<ZoomFactor>, anchor: Option<[f64; 2]>) -> bool {
        let changed = self.camera.zoom(factor, anchor);
        self.mark(changed)
    }

    pub fn rotate(&mut self, radians: f64) -> bool {
        let changed = self.camera.rotate(radians);
        self.mark(changed)
    }

    pub fn look_at(&mut self, target: [f64; 2], distance: f64, rotation: f64) {
        self.camera.look_at(target, distance, rotation);
        self.mark(true);
    }

    pub fn reset(&mut self) {
        self.camera.reset();
        self.mark(true);
    }

    pub fn set_view(&mut self, view: Mat4) -> bool {
        let changed = self.camera.set_view(view);
        self.mark(changed)
    }

    pub fn set_view_center(&mut self, center: [f64; 2]) {
        self.camera.set_view_center(center);
    }

    pub fn set_scale_bounds(&mut self, bounds: Bounds) -> bool {
        let before = *self.camera.view();
        let accepted = self.camera.set_scale_bounds(bounds);
        let changed = *self.camera.view() != before;
        self.mark(changed);
        accepted
    }

    pub fn set_translation_bounds(&mut self, bounds: Bounds) -> bool {
        let before = *self.camera.view();
        let accepted = self.camera.set_translation_bounds(bounds);
        let changed = *self.camera.view() != before;
        self.mark(changed);
        accepted
    }
}

impl Default for InteractiveCamera {
    fn default() -> Self {
        Self::new(
            ViewCamera::new(LookAt::default()),
            Viewport::default(),
            CameraControls::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> InteractiveCamera {
        InteractiveCamera::new(
            ViewCamera::default(),
            Viewport::new(200.0, 200.0).unwrap(),
            CameraControls::default(),
        )
    }

    #[test]
    fn test_idle_tick_reports_no_change() {
        let mut camera = camera();
        assert!(!camera.tick());
    }

    #[test]
    fn test_drag_pans_with_content_following_pointer() {
        let mut camera = camera();
        camera.pointer_down([100.0, 100.0]);
        camera.pointer_move([150.0, 150.0]);
        assert!(camera.tick());

        let [tx, ty] = camera.camera().translation();
        assert!((tx - 0.5).abs() < 1e-12);
        assert!((ty + 0.5).abs() < 1e-12);

        // No movement since the last tick
        assert!(!camera.tick());
    }

    #[test]
    fn test_modifier_switches_drag_to_rotate() {
        let mut camera = camera();
        camera.set_modifier_held(true);
        assert_eq!(camera.active_drag_action(), DragAction::Rotate);

        camera.pointer_down([200.0, 100.0]);
        camera.pointer_move([100.0, 0.0]);
        assert!(camera.tick());
        assert!((camera.camera().rotation() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(camera.camera().translation(), [0.0, 0.0]);
    }

    #[test]
    fn test_rotate_default_flips_with_modifier() {
        let mut camera = camera();
        camera.set_controls(CameraControls {
            default_action: DragAction::Rotate,
            ..Default::default()
        });
        assert_eq!(camera.active_drag_action(), DragAction::Rotate);
        camera.set_modifier_held(true);
        assert_eq!(camera.active_drag_action(), DragAction::Pan);
    }

    #[test]
    fn test_scroll_zoom_keeps_anchor_fixed() {
        let mut camera = camera();
        let anchor = [50.0, 60.0];
        let view_anchor = camera.viewport().screen_to_view(anchor);
        let data = camera.view().invert().unwrap().transform_xy(view_anchor);

        camera.wheel(-100.0, false, anchor);
        assert!(camera.tick());
        assert!(camera.camera().scaling()[0] > 1.0);

        let after = camera.view().transform_xy(data);
        assert!((after[0] - view_anchor[0]).abs() < 1e-12);
        assert!((after[1] - view_anchor[1]).abs() < 1e-12);
    }

    #[test]
    fn test_line_mode_wheel_is_scaled() {
        let mut lines = camera();
        lines.wheel(1.0, true, [100.0, 100.0]);
        lines.tick();

        let mut pixels = camera();
        pixels.wheel(12.0, false, [100.0, 100.0]);
        pixels.tick();

        assert_eq!(lines.view(), pixels.view());
    }

    #[test]
    fn test_disabled_drag_still_zooms() {
        let mut camera = camera();
        camera.set_drag_enabled(false);
        camera.pointer_down([100.0, 100.0]);
        camera.pointer_move([180.0, 100.0]);
        assert!(!camera.tick());

        camera.wheel(50.0, false, [100.0, 100.0]);
        assert!(camera.tick());
    }

    #[test]
    fn test_fixed_camera_ignores_pointer_input() {
        let mut camera = camera();
        camera.set_fixed(true);
        camera.pointer_down([100.0, 100.0]);
        camera.pointer_move([180.0, 100.0]);
        camera.wheel(50.0, false, [100.0, 100.0]);
        assert!(!camera.tick());
        assert_eq!(*camera.view(), Mat4::IDENTITY);
    }

    #[test]
    fn test_programmatic_change_is_reported_once() {
        let mut camera = camera();
        camera.pan(0.1, 0.0);
        assert!(camera.tick());
        assert!(!camera.tick());
    }
}
