//! The scatterplot engine
//!
//! One [`Engine`] owns a dataset, its spatial index, the camera, gesture and
//! selection state, and the sink its events are published to. Input handlers
//! only record what happened; [`Engine::tick`] reconciles everything once per
//! frame and performs at most one selection hit-test.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pointfield_curves::{generate_curves, CurveWorker, Polyline};

use crate::camera::{DragAction, InteractiveCamera, ViewCamera};
use crate::config::{ConfigPatch, EngineConfig, PatchEffects};
use crate::density::{density_opacity, DensityEstimator, DensityInputs};
use crate::events::{Event, EventQueue, EventSink};
use crate::gesture::{GestureController, GestureKind, GestureOutcome, LassoUpdate};
use crate::hit_test::{detection_radius, min_point_scale, point_scale, HitTester};
use crate::input::{Key, KeyAction, KeyEvent, Modifiers, MouseButton, MouseMode, PointerEvent};
use crate::lasso::LassoClearPolicy;
use crate::point::{Dataset, PointId};
use crate::selection::SelectionStore;
use crate::spatial::{Aabb, KdIndex};
use crate::transform::Mat4;
use crate::transition::{Easing, Transition};
use crate::viewport::{ScreenMapping, Viewport};

/// Selection work deferred to the next frame
#[derive(Clone, Debug, PartialEq)]
enum PendingAction {
    /// Data position and detection radius as seen when the button was released
    Click {
        target: Option<([f64; 2], f64)>,
        merge: bool,
    },
    Lasso { vertices: Vec<[f64; 2]>, merge: bool },
}

/// What changed during one [`Engine::tick`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub view_changed: bool,
    pub selection_changed: bool,
    pub hover_changed: bool,
    pub connections_updated: bool,
    /// Eased progress while a transition is running
    pub transition_progress: Option<f64>,
}

/// Interactive scatterplot state
pub struct Engine<S: EventSink = EventQueue> {
    config: EngineConfig,
    dataset: Dataset,
    index: Arc<KdIndex>,
    camera: InteractiveCamera,
    mapping: ScreenMapping,
    gestures: GestureController,
    selection: SelectionStore,
    sink: S,
    curves: Option<CurveWorker>,
    connections: Vec<Polyline>,
    pending: Option<PendingAction>,
    hover_at: Option<[f64; 2]>,
    committed_lasso: Vec<[f64; 2]>,
    visible_bounds: Option<Aabb>,
    bounds_dirty: bool,
    density: DensityEstimator,
    transition: Option<Transition>,
    transition_from: Option<Dataset>,
    modifiers: Modifiers,
}

impl<S: EventSink> Engine<S> {
    /// Create an engine with an empty dataset. The configuration is
    /// sanitized first.
    pub fn new(config: EngineConfig, sink: S) -> Self {
        let config = config.sanitized();

        let mut view = ViewCamera::new(config.camera.look_at());
        if let Some(bounds) = config.camera.scale_bounds {
            view.set_scale_bounds(bounds);
        }
        if let Some(bounds) = config.camera.translation_bounds {
            view.set_translation_bounds(bounds);
        }
        let viewport = Viewport::default();
        let camera = InteractiveCamera::new(view, viewport, config.camera.controls());

        let gestures = GestureController::new(
            config.interaction.click_max_distance,
            config.lasso.min_dist,
            config.lasso.min_delay(),
        );
        let density = DensityEstimator::new(config.density.debounce());
        let mapping = ScreenMapping::new(viewport, config.points.data_aspect_ratio);
        let index = Arc::new(KdIndex::build(&[], config.points.index_leaf_size));

        let mut engine = Self {
            config,
            dataset: Dataset::default(),
            index,
            camera,
            mapping,
            gestures,
            selection: SelectionStore::new(),
            sink,
            curves: None,
            connections: Vec::new(),
            pending: None,
            hover_at: None,
            committed_lasso: Vec::new(),
            visible_bounds: None,
            bounds_dirty: true,
            density,
            transition: None,
            transition_from: None,
            modifiers: Modifiers::default(),
        };
        engine.sync_camera_controls();
        engine
    }

    /// Generate connection curves on a background worker instead of inline
    pub fn with_curve_worker(mut self, worker: CurveWorker) -> Self {
        self.curves = Some(worker);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The index of the current dataset; a new dataset swaps in a new one
    pub fn index(&self) -> &Arc<KdIndex> {
        &self.index
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // Data

    /// Replace the dataset and rebuild the index
    pub fn set_points(&mut self, dataset: Dataset) {
        self.transition = None;
        self.transition_from = None;
        self.swap_dataset(dataset);
    }

    /// Replace the dataset and animate from the previous positions.
    ///
    /// Returns whether a transition started. Point sets of different sizes
    /// cannot be blended and are swapped immediately.
    pub fn transition_to(
        &mut self,
        dataset: Dataset,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) -> bool {
        if dataset.len() != self.dataset.len() {
            tracing::warn!(
                "Cannot transition from {} to {} points, swapping without animation",
                self.dataset.len(),
                dataset.len()
            );
            self.set_points(dataset);
            return false;
        }

        let previous = std::mem::take(&mut self.dataset);
        self.swap_dataset(dataset);
        self.transition_from = Some(previous);
        self.transition = Some(Transition::new(now, duration, easing));
        self.sink.publish(Event::TransitionStart);
        true
    }

    fn swap_dataset(&mut self, dataset: Dataset) {
        let index = KdIndex::from_points(dataset.points(), self.config.points.index_leaf_size);
        tracing::debug!(
            "Indexed {} points with {:?} ids",
            dataset.len(),
            index.id_width()
        );
        self.dataset = dataset;
        self.index = Arc::new(index);

        // Drag stays disabled until the cancelled press is released
        if self.gestures.kind() == Some(GestureKind::Lasso) {
            self.gestures.cancel();
        }
        if matches!(self.pending, Some(PendingAction::Lasso { .. })) {
            self.pending = None;
        }

        self.selection.retain_valid(self.dataset.len());
        self.density.reset();
        self.bounds_dirty = true;
        self.request_connections();
    }

    fn request_connections(&mut self) {
        if !self.config.connections.show || !self.dataset.has_connections() {
            self.connections.clear();
            if let Some(worker) = self.curves.as_mut() {
                worker.cancel();
            }
            return;
        }

        let points = self.dataset.connection_points();
        let options = self.config.connections.curve_options();
        match self.curves.as_mut() {
            Some(worker) => {
                if let Err(e) = worker.submit(points, options) {
                    tracing::warn!("Curve worker rejected request: {}", e);
                }
            }
            None => match generate_curves(&points, &options) {
                Ok(lines) => self.set_connections(lines),
                Err(e) => tracing::warn!("Curve generation failed: {}", e),
            },
        }
    }

    fn set_connections(&mut self, lines: Vec<Polyline>) {
        tracing::debug!("Drawing {} connection lines", lines.len());
        self.connections = lines;
        self.sink.publish(Event::PointConnectionsDraw {
            lines: self.connections.len(),
        });
    }

    /// Resize the drawing surface; non-positive sizes are ignored
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let Some(viewport) = Viewport::new(width, height) else {
            return false;
        };
        self.camera.resize(viewport);
        self.mapping.viewport = viewport;
        self.bounds_dirty = true;
        true
    }

    // Configuration

    /// Apply a partial configuration update
    pub fn update_config(&mut self, patch: &ConfigPatch) -> PatchEffects {
        let effects = self.config.apply(patch);

        if effects.interaction || effects.camera {
            self.sync_camera_controls();
        }
        if effects.interaction {
            self.gestures
                .set_click_max_distance(self.config.interaction.click_max_distance);
        }
        if effects.lasso {
            self.gestures.set_lasso_min_dist(self.config.lasso.min_dist);
            self.gestures.set_lasso_min_delay(self.config.lasso.min_delay());
            if self.config.lasso.clear_policy == LassoClearPolicy::OnLassoEnd {
                self.committed_lasso.clear();
            }
        }
        if effects.camera {
            if let Some(bounds) = self.config.camera.scale_bounds {
                self.camera.set_scale_bounds(bounds);
            }
            if let Some(bounds) = self.config.camera.translation_bounds {
                self.camera.set_translation_bounds(bounds);
            }
        }
        if effects.points {
            self.mapping.data_aspect_ratio = self.config.points.data_aspect_ratio;
            self.bounds_dirty = true;
        }
        if effects.density {
            self.density.set_debounce(self.config.density.debounce());
            self.density.reset();
            self.bounds_dirty = true;
        }
        if effects.connections {
            self.request_connections();
        }

        effects
    }

    fn sync_camera_controls(&mut self) {
        let mut controls = self.config.camera.controls();
        if self.config.interaction.mouse_mode == MouseMode::Rotate {
            controls.default_action = DragAction::Rotate;
        }
        self.camera.set_controls(controls);
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
        let rotate = self
            .config
            .interaction
            .key_map
            .is_active(KeyAction::Rotate, &modifiers);
        self.camera.set_modifier_held(rotate);
    }

    // Input

    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) {
        if let Some(modifiers) = event.modifiers() {
            self.set_modifiers(modifiers);
        }

        match *event {
            PointerEvent::Down {
                x,
                y,
                button: MouseButton::Left,
                modifiers,
            } => {
                let key_map = &self.config.interaction.key_map;
                let kind = if self.config.interaction.mouse_mode == MouseMode::Lasso
                    || key_map.is_active(KeyAction::Lasso, &modifiers)
                {
                    GestureKind::Lasso
                } else {
                    GestureKind::Navigate
                };

                self.camera.set_drag_enabled(kind == GestureKind::Navigate);
                self.camera.pointer_down([x, y]);
                self.gestures.press([x, y], kind, now);
            }
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { x, y, .. } => {
                self.camera.pointer_move([x, y]);
                let (mapping, view) = (self.mapping, *self.camera.view());
                let update = self
                    .gestures
                    .motion([x, y], now, |p| mapping.screen_to_data(&view, p));
                self.publish_lasso_update(update);

                if !self.gestures.is_lasso_active() {
                    self.hover_at = Some([x, y]);
                }
            }
            PointerEvent::Up {
                x,
                y,
                button: MouseButton::Left,
                modifiers,
            } => {
                let merge = self
                    .config
                    .interaction
                    .key_map
                    .is_active(KeyAction::Merge, &modifiers);
                self.camera.pointer_up();
                self.camera.set_drag_enabled(true);

                let (mapping, view) = (self.mapping, *self.camera.view());
                let release = self
                    .gestures
                    .release([x, y], merge, |p| mapping.screen_to_data(&view, p));
                if release.lasso.started {
                    self.sink.publish(Event::LassoStart);
                }

                match release.outcome {
                    GestureOutcome::Click { position, merge } => {
                        let target = self.pick_target(position);
                        self.pending = Some(PendingAction::Click { target, merge });
                    }
                    GestureOutcome::Lasso { vertices, merge } => {
                        if release.lasso.extended && vertices.len() >= 2 {
                            self.sink.publish(Event::LassoExtend {
                                coordinates: vertices.clone(),
                            });
                        }
                        self.pending = Some(PendingAction::Lasso { vertices, merge });
                    }
                    GestureOutcome::Drag | GestureOutcome::None => {}
                }
            }
            PointerEvent::Up { .. } => {}
            PointerEvent::Wheel {
                x,
                y,
                delta_y,
                line_mode,
                ..
            } => {
                self.camera.wheel(delta_y, line_mode, [x, y]);
            }
            PointerEvent::Enter { x, y } => {
                self.camera.pointer_move([x, y]);
                self.hover_at = Some([x, y]);
            }
            PointerEvent::Leave => {
                self.hover_at = None;
                self.selection
                    .hover(None, self.dataset.len(), &mut self.sink);
            }
            PointerEvent::DoubleClick { .. } => {
                if self.config.interaction.deselect_on_dbl_click {
                    self.pending = None;
                    self.deselect();
                }
            }
            PointerEvent::Cancel => {
                self.gestures.cancel();
                self.camera.pointer_up();
                self.camera.set_drag_enabled(true);
            }
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        self.set_modifiers(event.modifiers);
        if event.pressed && event.key == Key::Escape && self.config.interaction.deselect_on_escape {
            self.deselect();
        }
    }

    fn publish_lasso_update(&mut self, update: LassoUpdate) {
        if update.started {
            self.sink.publish(Event::LassoStart);
        }
        let vertices = self.gestures.lasso_vertices();
        if update.extended && vertices.len() >= 2 {
            self.sink.publish(Event::LassoExtend {
                coordinates: vertices.to_vec(),
            });
        }
    }

    // Frame

    /// Reconcile accumulated input and background results
    pub fn tick(&mut self, now: Instant) -> FrameReport {
        let mut report = FrameReport {
            view_changed: self.camera.tick(),
            ..Default::default()
        };

        if report.view_changed || self.bounds_dirty {
            self.bounds_dirty = false;
            self.visible_bounds = self.mapping.visible_bounds(self.camera.view());
            if self.config.density.enabled {
                if let Some(bounds) = self.visible_bounds {
                    self.density.request(bounds, &self.index, now);
                }
            }
        }
        if self.config.density.enabled {
            self.density.poll(&self.index, now);
        }

        if self.gestures.is_lasso_active() {
            let (mapping, view) = (self.mapping, *self.camera.view());
            let update = self
                .gestures
                .poll(now, |p| mapping.screen_to_data(&view, p));
            self.publish_lasso_update(update);
        }

        match self.pending.take() {
            Some(PendingAction::Click { target, merge }) => {
                report.selection_changed = match target.and_then(|t| self.nearest(t)) {
                    Some(id) => self.selection.select(&[id], merge, self.dataset.len(), &mut self.sink),
                    None => self.deselect(),
                };
            }
            Some(PendingAction::Lasso { vertices, merge }) => {
                report.selection_changed = self.commit_lasso(vertices, merge);
            }
            None => {
                if let Some(position) = self.hover_at.take() {
                    let id = self.raycast(position);
                    report.hover_changed =
                        self.selection.hover(id, self.dataset.len(), &mut self.sink);
                }
            }
        }

        if let Some(response) = self.curves.as_mut().and_then(CurveWorker::try_recv) {
            match response.result {
                Ok(lines) => {
                    self.set_connections(lines);
                    report.connections_updated = true;
                }
                Err(e) => tracing::warn!("Curve request {} failed: {}", response.id, e),
            }
        }

        if let Some(transition) = self.transition {
            if transition.is_done(now) {
                self.transition = None;
                self.transition_from = None;
                self.sink.publish(Event::TransitionEnd);
            } else {
                report.transition_progress = Some(transition.progress(now));
            }
        }

        if report.view_changed {
            let view = *self.camera.view();
            tracing::trace!("View changed: {:?}", view.as_array());
            self.sink.publish(Event::View { view });
        }

        report
    }

    fn commit_lasso(&mut self, vertices: Vec<[f64; 2]>, merge: bool) -> bool {
        let ids = HitTester::new(&self.index, self.dataset.points()).in_polygon(&vertices);
        tracing::debug!(
            "Lasso with {} vertices contains {} points",
            vertices.len(),
            ids.len()
        );

        let changed = self
            .selection
            .select(&ids, merge, self.dataset.len(), &mut self.sink);
        self.sink.publish(Event::LassoEnd {
            coordinates: vertices.clone(),
        });

        self.committed_lasso = match self.config.lasso.clear_policy {
            LassoClearPolicy::OnLassoEnd => Vec::new(),
            LassoClearPolicy::OnDeselect => vertices,
        };
        changed
    }

    /// Closest point under a screen position
    fn raycast(&self, screen: [f64; 2]) -> Option<PointId> {
        self.pick_target(screen).and_then(|target| self.nearest(target))
    }

    fn nearest(&self, (position, radius): ([f64; 2], f64)) -> Option<PointId> {
        HitTester::new(&self.index, self.dataset.points()).nearest_within(position, radius)
    }

    /// Data position and detection radius for a screen position under the
    /// current view
    fn pick_target(&self, screen: [f64; 2]) -> Option<([f64; 2], f64)> {
        let view = self.camera.view();
        let position = self.mapping.screen_to_data(view, screen)?;
        let data_per_px = self.mapping.data_units_per_px(view)?;

        let points = &self.config.points;
        let scale = point_scale(
            self.camera.camera().scaling()[0],
            min_point_scale(points.point_size),
            points.pixel_ratio,
        );
        let radius = detection_radius(points.detection_size(), scale, data_per_px);
        Some((position, radius))
    }

    // Programmatic selection

    pub fn select(&mut self, ids: &[PointId], merge: bool) -> bool {
        self.selection
            .select(ids, merge, self.dataset.len(), &mut self.sink)
    }

    pub fn deselect(&mut self) -> bool {
        if self.config.lasso.clear_policy == LassoClearPolicy::OnDeselect {
            self.committed_lasso.clear();
        }
        self.selection.deselect(&mut self.sink)
    }

    pub fn hover(&mut self, id: Option<PointId>) -> bool {
        self.selection.hover(id, self.dataset.len(), &mut self.sink)
    }

    // Camera

    pub fn camera(&self) -> &InteractiveCamera {
        &self.camera
    }

    /// Programmatic camera access; changes are reported on the next tick
    pub fn camera_mut(&mut self) -> &mut InteractiveCamera {
        &mut self.camera
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    // Outputs

    /// Column-major view matrix for the renderer
    pub fn view_matrix(&self) -> [f32; 16] {
        self.camera.view().to_f32()
    }

    pub fn projection_view_model(&self) -> Mat4 {
        self.mapping.projection_view_model(self.camera.view())
    }

    pub fn viewport(&self) -> Viewport {
        self.mapping.viewport
    }

    pub fn selection(&self) -> &[PointId] {
        self.selection.selected()
    }

    pub fn is_selected(&self, id: PointId) -> bool {
        self.selection.contains(id)
    }

    pub fn hovered(&self) -> Option<PointId> {
        self.selection.hovered()
    }

    pub fn highlighted_hover(&self) -> Option<PointId> {
        self.selection.highlighted_hover()
    }

    /// The lasso being drawn, or the last committed one while it stays shown
    pub fn lasso_vertices(&self) -> &[[f64; 2]] {
        if self.gestures.is_lasso_active() {
            self.gestures.lasso_vertices()
        } else {
            &self.committed_lasso
        }
    }

    pub fn connections(&self) -> &[Polyline] {
        &self.connections
    }

    pub fn visible_bounds(&self) -> Option<Aabb> {
        self.visible_bounds
    }

    pub fn points_in_view(&self) -> Option<usize> {
        self.density.points_in_view()
    }

    /// Opacity that keeps the current view from saturating; 1 when density
    /// opacity is disabled or no count is available yet
    pub fn density_opacity(&self) -> f64 {
        if !self.config.density.enabled {
            return 1.0;
        }
        let Some(n) = self.density.points_in_view() else {
            return 1.0;
        };

        let points = &self.config.points;
        let scale = point_scale(
            self.camera.camera().scaling()[0],
            min_point_scale(points.point_size),
            points.pixel_ratio,
        );
        let view = self.camera.view().as_array();
        density_opacity(
            n,
            &DensityInputs {
                viewport: self.mapping.viewport,
                fill: self.config.density.fill,
                point_size: points.point_size * scale,
                view_scale: view[0] * view[5],
            },
        )
    }

    pub fn transition_progress(&self, now: Instant) -> Option<f64> {
        self.transition.map(|t| t.progress(now))
    }

    /// Positions a running transition started from
    pub fn transition_from(&self) -> Option<&Dataset> {
        self.transition_from.as_ref()
    }

    pub fn screen_to_data(&self, screen: [f64; 2]) -> Option<[f64; 2]> {
        self.mapping.screen_to_data(self.camera.view(), screen)
    }

    pub fn data_to_screen(&self, data: [f64; 2]) -> [f64; 2] {
        self.mapping.data_to_screen(self.camera.view(), data)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Default for Engine<EventQueue> {
    fn default() -> Self {
        Self::new(EngineConfig::default(), EventQueue::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        let mut engine = Engine::default();
        engine.resize(200.0, 200.0);
        engine.set_points(Dataset::from(vec![
            [0.0, 0.0],
            [1.0, 1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
            [-1.0, 1.0],
        ]));
        engine
    }

    fn names(engine: &mut Engine) -> Vec<&'static str> {
        engine.sink_mut().drain().iter().map(Event::name).collect()
    }

    #[test]
    fn test_click_on_point_selects_it() {
        let t0 = Instant::now();
        let mut engine = engine();
        let none = Modifiers::default();

        engine.handle_pointer(&PointerEvent::down(100.0, 100.0, none), t0);
        engine.handle_pointer(&PointerEvent::up(100.0, 100.0, none), t0);
        let report = engine.tick(t0);

        assert!(report.selection_changed);
        assert_eq!(engine.selection(), &[0]);
    }

    #[test]
    fn test_click_uses_view_at_release() {
        let t0 = Instant::now();
        let mut engine = engine();
        let none = Modifiers::default();

        engine.handle_pointer(&PointerEvent::down(100.0, 100.0, none), t0);
        engine.handle_pointer(&PointerEvent::up(100.0, 100.0, none), t0);
        // Zoom towards the top-right corner before the click is resolved
        engine.handle_pointer(
            &PointerEvent::Wheel {
                x: 200.0,
                y: 0.0,
                delta_y: -200.0,
                line_mode: false,
                modifiers: none,
            },
            t0,
        );
        let report = engine.tick(t0);

        assert!(report.view_changed);
        assert_eq!(engine.selection(), &[0]);
    }

    #[test]
    fn test_click_on_empty_space_deselects() {
        let t0 = Instant::now();
        let mut engine = engine();
        engine.select(&[1, 2], false);
        engine.sink_mut().drain();

        let none = Modifiers::default();
        engine.handle_pointer(&PointerEvent::down(150.0, 100.0, none), t0);
        engine.handle_pointer(&PointerEvent::up(150.0, 100.0, none), t0);
        engine.tick(t0);

        assert!(engine.selection().is_empty());
        assert_eq!(names(&mut engine), vec!["deselect"]);
    }

    #[test]
    fn test_hover_resolved_on_tick() {
        let t0 = Instant::now();
        let mut engine = engine();
        engine.tick(t0);
        engine.sink_mut().drain();

        engine.handle_pointer(&PointerEvent::moved(200.0, 0.0, Modifiers::default()), t0);
        assert_eq!(engine.hovered(), None);
        let report = engine.tick(t0);
        assert!(report.hover_changed);
        assert_eq!(engine.hovered(), Some(1));

        engine.handle_pointer(&PointerEvent::Leave, t0);
        assert_eq!(engine.hovered(), None);
        assert_eq!(names(&mut engine), vec!["pointOver", "pointOut"]);
    }

    #[test]
    fn test_escape_deselects() {
        let mut engine = engine();
        engine.select(&[3], false);
        engine.handle_key(&KeyEvent::pressed(Key::Escape, Modifiers::default()));
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_drag_pans_and_publishes_view() {
        let t0 = Instant::now();
        let mut engine = engine();
        engine.tick(t0);
        engine.sink_mut().drain();

        let none = Modifiers::default();
        engine.handle_pointer(&PointerEvent::down(100.0, 100.0, none), t0);
        engine.handle_pointer(&PointerEvent::moved(150.0, 100.0, none), t0);
        let report = engine.tick(t0);
        engine.handle_pointer(&PointerEvent::up(150.0, 100.0, none), t0);

        assert!(report.view_changed);
        assert!(engine.camera().camera().translation()[0] > 0.0);
        assert!(names(&mut engine).contains(&"view"));
        // A drag is not a click
        engine.tick(t0);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_dataset_swap_prunes_selection_silently() {
        let mut engine = engine();
        engine.select(&[0, 4], false);
        engine.sink_mut().drain();

        engine.set_points(Dataset::from(vec![[0.0, 0.0], [0.5, 0.5]]));
        assert_eq!(engine.selection(), &[0]);
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn test_transition_requires_same_size() {
        let t0 = Instant::now();
        let mut engine = engine();
        engine.sink_mut().drain();

        let moved = Dataset::from(vec![[0.0, 0.0]; 5]);
        assert!(engine.transition_to(moved, Duration::from_millis(100), Easing::Linear, t0));
        assert!(engine.transition_from().is_some());
        let report = engine.tick(t0 + Duration::from_millis(50));
        assert_eq!(report.transition_progress, Some(0.5));
        engine.tick(t0 + Duration::from_millis(100));
        assert_eq!(engine.transition_progress(t0), None);
        assert_eq!(names(&mut engine), vec!["transitionStart", "transitionEnd"]);

        let fewer = Dataset::from(vec![[0.0, 0.0]; 2]);
        assert!(!engine.transition_to(fewer, Duration::from_millis(100), Easing::Linear, t0));
        assert_eq!(engine.dataset().len(), 2);
    }

    #[test]
    fn test_inline_connections() {
        let mut config = EngineConfig::default();
        config.connections.show = true;
        let mut engine = Engine::new(config, EventQueue::new());

        let dataset = Dataset::from_rows(&[
            [0.0, 0.0, 0.0, 0.0, 7.0],
            [1.0, 0.0, 0.0, 0.0, 7.0],
            [1.0, 1.0, 0.0, 0.0, 7.0],
        ])
        .unwrap();
        engine.set_points(dataset);

        assert_eq!(engine.connections().len(), 1);
        assert_eq!(engine.connections()[0].line_id, 7);
        assert_eq!(names(&mut engine), vec!["pointConnectionsDraw"]);
    }

    #[test]
    fn test_update_config_ignores_bad_fields() {
        let mut engine = engine();
        let effects = engine.update_config(&ConfigPatch {
            point_size: Some(0.0),
            mouse_mode: Some(MouseMode::Lasso),
            ..Default::default()
        });
        assert!(effects.interaction);
        assert!(!effects.points);
        assert_eq!(engine.config().points.point_size, 6.0);
        assert_eq!(engine.config().interaction.mouse_mode, MouseMode::Lasso);
    }

    #[test]
    fn test_density_counts_visible_points() {
        let t0 = Instant::now();
        let mut config = EngineConfig::default();
        config.density.enabled = true;
        let mut engine = Engine::new(config, EventQueue::new());
        engine.resize(200.0, 200.0);
        engine.set_points(Dataset::from(vec![[0.0, 0.0], [0.5, 0.5], [5.0, 5.0]]));

        assert_eq!(engine.points_in_view(), None);
        engine.tick(t0);
        assert_eq!(engine.points_in_view(), Some(2));
        assert_eq!(engine.density_opacity(), 1.0);
    }
}
