//! Gesture recognition
//!
//! Turns a primary-button press, the motion that follows and the release
//! into one of three outcomes: a click, a finished lasso, or a plain
//! navigation drag. A press becomes a drag once the pointer has moved at
//! least `click_max_distance` pixels from where it went down.
//!
//! Lasso positions pass through a throttle with a trailing call and a
//! minimum pixel distance before they are projected into data space.
//! Projection is supplied by the caller at every capture so that the
//! camera active at that instant is used.

use std::time::{Duration, Instant};

use crate::lasso::LassoPath;
use crate::throttle::Throttle;

/// What a primary drag produces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    /// Camera pan or rotate
    Navigate,
    /// Freehand lasso selection
    Lasso,
}

/// Lasso progress made by a single input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LassoUpdate {
    /// The lasso drag began
    pub started: bool,
    /// At least one vertex was appended
    pub extended: bool,
}

impl LassoUpdate {
    fn merge(self, other: LassoUpdate) -> Self {
        Self {
            started: self.started || other.started,
            extended: self.extended || other.extended,
        }
    }
}

/// How a gesture ended
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Press and release close together
    Click { position: [f64; 2], merge: bool },
    /// A lasso was drawn; vertices are in data space
    Lasso { vertices: Vec<[f64; 2]>, merge: bool },
    /// A navigation drag finished
    Drag,
    /// Nothing to act on
    None,
}

/// Result of a release
#[derive(Clone, Debug, PartialEq)]
pub struct Release {
    pub lasso: LassoUpdate,
    pub outcome: GestureOutcome,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: [f64; 2],
    started: Instant,
    kind: GestureKind,
    dragging: bool,
}

/// Press/drag/release state machine with lasso capture
#[derive(Clone, Debug)]
pub struct GestureController {
    press: Option<Press>,
    ignore_release: bool,
    lasso: LassoPath,
    throttle: Throttle<[f64; 2]>,
    click_max_distance: f64,
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

impl GestureController {
    pub fn new(click_max_distance: f64, lasso_min_dist: f64, lasso_min_delay: Duration) -> Self {
        Self {
            press: None,
            ignore_release: false,
            lasso: LassoPath::new(lasso_min_dist),
            throttle: Throttle::new(lasso_min_delay),
            click_max_distance,
        }
    }

    pub fn set_click_max_distance(&mut self, distance: f64) {
        self.click_max_distance = distance;
    }

    pub fn set_lasso_min_dist(&mut self, min_dist: f64) {
        self.lasso.set_min_dist(min_dist);
    }

    pub fn set_lasso_min_delay(&mut self, delay: Duration) {
        self.throttle.set_interval(delay);
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether a lasso drag is in progress
    pub fn is_lasso_active(&self) -> bool {
        self.press
            .is_some_and(|p| p.kind == GestureKind::Lasso && p.dragging)
    }

    /// Kind of the current press, if any
    pub fn kind(&self) -> Option<GestureKind> {
        self.press.map(|p| p.kind)
    }

    /// Data-space vertices captured so far
    pub fn lasso_vertices(&self) -> &[[f64; 2]] {
        self.lasso.vertices()
    }

    /// How long the button has been down
    pub fn press_duration(&self, now: Instant) -> Option<Duration> {
        self.press.map(|p| now.saturating_duration_since(p.started))
    }

    /// How far the pointer is from where it went down
    pub fn press_displacement(&self, position: [f64; 2]) -> Option<f64> {
        self.press.map(|p| distance(p.origin, position))
    }

    pub fn press(&mut self, position: [f64; 2], kind: GestureKind, now: Instant) {
        self.lasso.clear();
        self.throttle.reset();
        self.ignore_release = false;
        self.press = Some(Press {
            origin: position,
            started: now,
            kind,
            dragging: false,
        });
    }

    fn capture<P>(&mut self, screen: [f64; 2], project: &P) -> bool
    where
        P: Fn([f64; 2]) -> Option<[f64; 2]>,
    {
        match project(screen) {
            Some(data) => self.lasso.extend(screen, data),
            None => false,
        }
    }

    /// Promote the press to a drag once it moved far enough
    fn promote<P>(&mut self, position: [f64; 2], project: &P) -> LassoUpdate
    where
        P: Fn([f64; 2]) -> Option<[f64; 2]>,
    {
        let mut update = LassoUpdate::default();
        let Some(press) = self.press.as_mut() else {
            return update;
        };
        if press.dragging || distance(press.origin, position) < self.click_max_distance {
            return update;
        }

        press.dragging = true;
        if press.kind == GestureKind::Lasso {
            let origin = press.origin;
            update.started = true;
            update.extended = self.capture(origin, project);
        }
        update
    }

    pub fn motion<P>(&mut self, position: [f64; 2], now: Instant, project: P) -> LassoUpdate
    where
        P: Fn([f64; 2]) -> Option<[f64; 2]>,
    {
        let mut update = self.promote(position, &project);
        if self.is_lasso_active() {
            if let Some(screen) = self.throttle.call(position, now) {
                update.extended |= self.capture(screen, &project);
            }
        }
        update
    }

    /// Capture the trailing lasso position once it is due
    pub fn poll<P>(&mut self, now: Instant, project: P) -> LassoUpdate
    where
        P: Fn([f64; 2]) -> Option<[f64; 2]>,
    {
        let mut update = LassoUpdate::default();
        if self.is_lasso_active() {
            if let Some(screen) = self.throttle.poll(now) {
                update.extended = self.capture(screen, &project);
            }
        }
        update
    }

    pub fn release<P>(&mut self, position: [f64; 2], merge: bool, project: P) -> Release
    where
        P: Fn([f64; 2]) -> Option<[f64; 2]>,
    {
        let mut lasso = self.promote(position, &project);
        let press = self.press.take();

        if std::mem::take(&mut self.ignore_release) {
            return Release {
                lasso,
                outcome: GestureOutcome::None,
            };
        }

        let outcome = match press {
            None => GestureOutcome::None,
            Some(press) if !press.dragging => GestureOutcome::Click { position, merge },
            Some(press) if press.kind == GestureKind::Navigate => GestureOutcome::Drag,
            Some(_) => {
                let mut extended = false;
                if let Some(screen) = self.throttle.flush() {
                    extended |= self.capture(screen, &project);
                }
                extended |= self.capture(position, &project);
                lasso = lasso.merge(LassoUpdate {
                    started: false,
                    extended,
                });
                self.throttle.reset();

                let vertices = self.lasso.take();
                if vertices.is_empty() {
                    GestureOutcome::None
                } else {
                    GestureOutcome::Lasso { vertices, merge }
                }
            }
        };

        Release { lasso, outcome }
    }

    /// Drop the gesture in flight; its release will be ignored
    pub fn cancel(&mut self) {
        if self.press.is_some() {
            self.ignore_release = true;
        }
        self.press = None;
        self.lasso.clear();
        self.throttle.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(p: [f64; 2]) -> Option<[f64; 2]> {
        Some(p)
    }

    fn controller() -> GestureController {
        GestureController::new(3.0, 3.0, Duration::from_millis(10))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_small_motion_is_a_click() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([10.0, 10.0], GestureKind::Navigate, t0);
        gestures.motion([11.0, 11.0], t0 + ms(5), identity);
        let release = gestures.release([11.0, 11.0], true, identity);
        assert_eq!(
            release.outcome,
            GestureOutcome::Click {
                position: [11.0, 11.0],
                merge: true
            }
        );
    }

    #[test]
    fn test_navigation_drag() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([10.0, 10.0], GestureKind::Navigate, t0);
        gestures.motion([40.0, 10.0], t0 + ms(5), identity);
        assert!(!gestures.is_lasso_active());
        let release = gestures.release([40.0, 10.0], false, identity);
        assert_eq!(release.outcome, GestureOutcome::Drag);
    }

    #[test]
    fn test_lasso_captures_origin_and_throttles() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([0.0, 0.0], GestureKind::Lasso, t0);

        let update = gestures.motion([10.0, 0.0], t0 + ms(20), identity);
        assert!(update.started && update.extended);
        assert_eq!(gestures.lasso_vertices(), &[[0.0, 0.0], [10.0, 0.0]]);

        // Inside the throttle window: held back
        let update = gestures.motion([20.0, 0.0], t0 + ms(22), identity);
        assert!(!update.extended);
        assert_eq!(gestures.lasso_vertices().len(), 2);

        // Released by the trailing poll
        let update = gestures.poll(t0 + ms(40), identity);
        assert!(update.extended);
        assert_eq!(gestures.lasso_vertices().last(), Some(&[20.0, 0.0]));
    }

    #[test]
    fn test_release_flushes_pending_position() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([0.0, 0.0], GestureKind::Lasso, t0);
        gestures.motion([10.0, 0.0], t0 + ms(20), identity);
        gestures.motion([10.0, 10.0], t0 + ms(21), identity);

        let release = gestures.release([10.0, 10.0], false, identity);
        assert!(release.lasso.extended);
        assert_eq!(
            release.outcome,
            GestureOutcome::Lasso {
                vertices: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
                merge: false
            }
        );
        assert!(gestures.lasso_vertices().is_empty());
    }

    #[test]
    fn test_vertices_use_projection_at_capture_time() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([0.0, 0.0], GestureKind::Lasso, t0);
        gestures.motion([10.0, 0.0], t0 + ms(20), |p| Some([p[0] * 2.0, p[1]]));
        gestures.motion([20.0, 0.0], t0 + ms(40), |p| Some([p[0] * 0.5, p[1]]));
        assert_eq!(
            gestures.lasso_vertices(),
            &[[0.0, 0.0], [20.0, 0.0], [10.0, 0.0]]
        );
    }

    #[test]
    fn test_singular_projection_skips_vertex() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([0.0, 0.0], GestureKind::Lasso, t0);
        let update = gestures.motion([10.0, 0.0], t0 + ms(20), |_| None);
        assert!(update.started);
        assert!(!update.extended);
        assert!(gestures.lasso_vertices().is_empty());
    }

    #[test]
    fn test_cancel_ignores_release() {
        let t0 = Instant::now();
        let mut gestures = controller();
        gestures.press([0.0, 0.0], GestureKind::Lasso, t0);
        gestures.motion([10.0, 0.0], t0 + ms(20), identity);
        gestures.cancel();
        assert!(gestures.lasso_vertices().is_empty());

        let release = gestures.release([20.0, 0.0], false, identity);
        assert_eq!(release.outcome, GestureOutcome::None);

        // The next gesture is recognised normally
        gestures.press([0.0, 0.0], GestureKind::Navigate, t0 + ms(50));
        let release = gestures.release([0.0, 0.0], false, identity);
        assert!(matches!(release.outcome, GestureOutcome::Click { .. }));
    }

    #[test]
    fn test_press_signals() {
        let t0 = Instant::now();
        let mut gestures = controller();
        assert_eq!(gestures.press_duration(t0), None);
        gestures.press([0.0, 0.0], GestureKind::Navigate, t0);
        assert_eq!(gestures.press_duration(t0 + ms(500)), Some(ms(500)));
        assert_eq!(gestures.press_displacement([3.0, 4.0]), Some(5.0));
    }
}
