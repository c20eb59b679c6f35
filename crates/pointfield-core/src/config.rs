//! Engine configuration
//!
//! Typed, sectioned settings with defaults for every field. Configuration
//! can be loaded from TOML or JSON; missing sections and fields fall back to
//! their defaults. [`EngineConfig::validate`] rejects bad values outright,
//! while [`EngineConfig::sanitized`] and [`EngineConfig::apply`] repair or
//! ignore them the way the interactive engine does.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::camera::{Bounds, CameraControls, DragAction, LookAt};
use crate::error::{validation, ConfigError, ConfigResult};
use crate::input::{KeyMap, MouseMode};
use crate::lasso::LassoClearPolicy;
use crate::spatial::DEFAULT_LEAF_SIZE;
use pointfield_curves::{CurveOptions, DEFAULT_MAX_INT_POINTS_PER_SEGMENT, DEFAULT_TOLERANCE};

/// All engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub interaction: InteractionConfig,
    pub lasso: LassoConfig,
    pub camera: CameraConfig,
    pub points: PointsConfig,
    pub connections: ConnectionsConfig,
    pub density: DensityConfig,
}

/// Pointer and keyboard behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub mouse_mode: MouseMode,
    pub key_map: KeyMap,
    /// Largest press/release displacement, in pixels, still treated as a click
    pub click_max_distance: f64,
    pub deselect_on_escape: bool,
    pub deselect_on_dbl_click: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            mouse_mode: MouseMode::PanZoom,
            key_map: KeyMap::default(),
            click_max_distance: 3.0,
            deselect_on_escape: true,
            deselect_on_dbl_click: true,
        }
    }
}

/// Lasso capture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LassoConfig {
    /// Minimum pointer travel in pixels between vertices
    pub min_dist: f64,
    /// Minimum time between vertices in milliseconds
    pub min_delay_ms: u64,
    pub clear_policy: LassoClearPolicy,
}

impl Default for LassoConfig {
    fn default() -> Self {
        Self {
            min_dist: 3.0,
            min_delay_ms: 10,
            clear_policy: LassoClearPolicy::OnLassoEnd,
        }
    }
}

impl LassoConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }
}

/// Initial placement, limits and pointer controls of the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub target: [f64; 2],
    pub distance: f64,
    pub rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_bounds: Option<Bounds>,
    pub default_action: DragAction,
    pub pan_speed: f64,
    pub zoom_speed: f64,
    pub rotate_speed: f64,
    pub pan_inverted: [bool; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        let look_at = LookAt::default();
        let controls = CameraControls::default();
        Self {
            target: look_at.target,
            distance: look_at.distance,
            rotation: look_at.rotation,
            scale_bounds: None,
            translation_bounds: None,
            default_action: controls.default_action,
            pan_speed: controls.pan_speed,
            zoom_speed: controls.zoom_speed,
            rotate_speed: controls.rotate_speed,
            pan_inverted: controls.pan_inverted,
        }
    }
}

impl CameraConfig {
    pub fn look_at(&self) -> LookAt {
        LookAt {
            target: self.target,
            distance: self.distance,
            rotation: self.rotation,
        }
    }

    pub fn controls(&self) -> CameraControls {
        CameraControls {
            default_action: self.default_action,
            pan_speed: self.pan_speed,
            zoom_speed: self.zoom_speed,
            rotate_speed: self.rotate_speed,
            pan_inverted: self.pan_inverted,
        }
    }
}

/// Point rendering parameters that affect picking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    /// Rendered point size in pixels
    pub point_size: f64,
    /// Pick size in pixels; the rendered size when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_size_mouse_detection: Option<f64>,
    pub pixel_ratio: f64,
    pub data_aspect_ratio: f64,
    pub index_leaf_size: usize,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            point_size: 6.0,
            point_size_mouse_detection: None,
            pixel_ratio: 1.0,
            data_aspect_ratio: 1.0,
            index_leaf_size: DEFAULT_LEAF_SIZE,
        }
    }
}

impl PointsConfig {
    pub fn detection_size(&self) -> f64 {
        self.point_size_mouse_detection.unwrap_or(self.point_size)
    }
}

/// Connected-line generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionsConfig {
    pub show: bool,
    pub max_int_points_per_segment: usize,
    pub tolerance: f64,
}

impl Default for ConnectionsConfig {
    fn default() -> Self {
        Self {
            show: false,
            max_int_points_per_segment: DEFAULT_MAX_INT_POINTS_PER_SEGMENT,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ConnectionsConfig {
    pub fn curve_options(&self) -> CurveOptions {
        CurveOptions {
            max_int_points_per_segment: self.max_int_points_per_segment,
            tolerance: self.tolerance,
        }
    }
}

/// Density-based opacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    pub enabled: bool,
    /// Fraction of the viewport the points should cover
    pub fill: f64,
    pub debounce_ms: u64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fill: 0.15,
            debounce_ms: 25,
        }
    }
}

impl DensityConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// A partial update; every field is applied on its own
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub mouse_mode: Option<MouseMode>,
    pub key_map: Option<KeyMap>,
    pub click_max_distance: Option<f64>,
    pub deselect_on_escape: Option<bool>,
    pub deselect_on_dbl_click: Option<bool>,
    pub lasso_min_dist: Option<f64>,
    pub lasso_min_delay_ms: Option<u64>,
    pub lasso_clear_policy: Option<LassoClearPolicy>,
    pub camera_scale_bounds: Option<Bounds>,
    pub camera_translation_bounds: Option<Bounds>,
    pub camera_controls: Option<CameraControls>,
    pub point_size: Option<f64>,
    pub point_size_mouse_detection: Option<f64>,
    pub pixel_ratio: Option<f64>,
    pub data_aspect_ratio: Option<f64>,
    pub show_connections: Option<bool>,
    pub connections_max_int_points_per_segment: Option<usize>,
    pub connections_tolerance: Option<f64>,
    pub density_enabled: Option<bool>,
    pub density_fill: Option<f64>,
    pub density_debounce_ms: Option<u64>,
}

/// What an applied patch touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchEffects {
    pub interaction: bool,
    pub lasso: bool,
    pub camera: bool,
    pub points: bool,
    pub connections: bool,
    pub density: bool,
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

fn non_negative(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn valid_bounds(bounds: Bounds) -> Option<Bounds> {
    bounds.is_valid().then_some(bounds)
}

/// Store `value` when present and different, recording the change
fn set_if<T: PartialEq>(slot: &mut T, value: Option<T>, touched: &mut bool) {
    if let Some(value) = value {
        if *slot != value {
            *slot = value;
            *touched = true;
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        validation::validate_positive(
            "interaction.click_max_distance",
            self.interaction.click_max_distance,
        )?;
        validation::validate_non_negative("lasso.min_dist", self.lasso.min_dist)?;

        validation::validate_positive("camera.distance", self.camera.distance)?;
        validation::validate_positive("camera.zoom_speed", self.camera.zoom_speed)?;
        if let Some(bounds) = self.camera.scale_bounds {
            for pair in bounds.per_axis() {
                validation::validate_bounds("camera.scale_bounds", pair)?;
            }
        }
        if let Some(bounds) = self.camera.translation_bounds {
            for pair in bounds.per_axis() {
                validation::validate_bounds("camera.translation_bounds", pair)?;
            }
        }

        validation::validate_positive("points.point_size", self.points.point_size)?;
        if let Some(size) = self.points.point_size_mouse_detection {
            validation::validate_positive("points.point_size_mouse_detection", size)?;
        }
        validation::validate_positive("points.pixel_ratio", self.points.pixel_ratio)?;
        validation::validate_positive("points.data_aspect_ratio", self.points.data_aspect_ratio)?;
        if self.points.index_leaf_size == 0 {
            return Err(ConfigError::OutOfRange(
                "points.index_leaf_size must be positive".to_string(),
            ));
        }

        if self.connections.max_int_points_per_segment == 0 {
            return Err(ConfigError::OutOfRange(
                "connections.max_int_points_per_segment must be positive".to_string(),
            ));
        }
        if self.connections.tolerance.is_nan() || self.connections.tolerance < 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "connections.tolerance must not be negative, got {}",
                self.connections.tolerance
            )));
        }

        validation::validate_non_negative("density.fill", self.density.fill)?;
        if self.density.fill > 1.0 {
            return Err(ConfigError::OutOfRange(format!(
                "density.fill must be between 0.0 and 1.0, got {}",
                self.density.fill
            )));
        }

        Ok(())
    }

    /// Repair invalid values: bad sizes and distances fall back to their
    /// defaults and inverted bounds are dropped
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.interaction.click_max_distance = positive(self.interaction.click_max_distance)
            .unwrap_or(defaults.interaction.click_max_distance);
        self.lasso.min_dist =
            non_negative(self.lasso.min_dist).unwrap_or(defaults.lasso.min_dist);

        self.camera.distance = positive(self.camera.distance).unwrap_or(defaults.camera.distance);
        if !(self.camera.target[0].is_finite() && self.camera.target[1].is_finite()) {
            self.camera.target = defaults.camera.target;
        }
        if !self.camera.rotation.is_finite() {
            self.camera.rotation = defaults.camera.rotation;
        }
        self.camera.pan_speed = non_negative(self.camera.pan_speed).unwrap_or(defaults.camera.pan_speed);
        self.camera.zoom_speed = positive(self.camera.zoom_speed).unwrap_or(defaults.camera.zoom_speed);
        self.camera.rotate_speed =
            non_negative(self.camera.rotate_speed).unwrap_or(defaults.camera.rotate_speed);
        self.camera.scale_bounds = self.camera.scale_bounds.and_then(valid_bounds);
        self.camera.translation_bounds = self.camera.translation_bounds.and_then(valid_bounds);

        self.points.point_size = positive(self.points.point_size).unwrap_or(defaults.points.point_size);
        self.points.point_size_mouse_detection =
            self.points.point_size_mouse_detection.and_then(positive);
        self.points.pixel_ratio =
            positive(self.points.pixel_ratio).unwrap_or(defaults.points.pixel_ratio);
        self.points.data_aspect_ratio =
            positive(self.points.data_aspect_ratio).unwrap_or(defaults.points.data_aspect_ratio);
        self.points.index_leaf_size = self.points.index_leaf_size.max(1);

        self.connections.max_int_points_per_segment =
            self.connections.max_int_points_per_segment.max(1);
        self.connections.tolerance = non_negative(self.connections.tolerance)
            .or_else(|| (self.connections.tolerance == f64::INFINITY).then_some(f64::INFINITY))
            .unwrap_or(0.0);

        self.density.fill = non_negative(self.density.fill)
            .map(|fill| fill.min(1.0))
            .unwrap_or(defaults.density.fill);

        self
    }

    /// Apply a patch field by field. Values that would be repaired by
    /// [`sanitized`](Self::sanitized) are ignored instead.
    pub fn apply(&mut self, patch: &ConfigPatch) -> PatchEffects {
        let mut effects = PatchEffects::default();

        let interaction = &mut self.interaction;
        set_if(&mut interaction.mouse_mode, patch.mouse_mode, &mut effects.interaction);
        set_if(&mut interaction.key_map, patch.key_map, &mut effects.interaction);
        set_if(
            &mut interaction.click_max_distance,
            patch.click_max_distance.and_then(positive),
            &mut effects.interaction,
        );
        set_if(
            &mut interaction.deselect_on_escape,
            patch.deselect_on_escape,
            &mut effects.interaction,
        );
        set_if(
            &mut interaction.deselect_on_dbl_click,
            patch.deselect_on_dbl_click,
            &mut effects.interaction,
        );

        let lasso = &mut self.lasso;
        set_if(&mut lasso.min_dist, patch.lasso_min_dist.and_then(non_negative), &mut effects.lasso);
        set_if(&mut lasso.min_delay_ms, patch.lasso_min_delay_ms, &mut effects.lasso);
        set_if(&mut lasso.clear_policy, patch.lasso_clear_policy, &mut effects.lasso);

        let camera = &mut self.camera;
        set_if(
            &mut camera.scale_bounds,
            patch.camera_scale_bounds.and_then(valid_bounds).map(Some),
            &mut effects.camera,
        );
        set_if(
            &mut camera.translation_bounds,
            patch.camera_translation_bounds.and_then(valid_bounds).map(Some),
            &mut effects.camera,
        );
        if let Some(controls) = patch.camera_controls {
            if controls.zoom_speed.is_finite() && controls.zoom_speed > 0.0 {
                let before = camera.controls();
                camera.default_action = controls.default_action;
                camera.pan_speed = controls.pan_speed;
                camera.zoom_speed = controls.zoom_speed;
                camera.rotate_speed = controls.rotate_speed;
                camera.pan_inverted = controls.pan_inverted;
                effects.camera |= before != controls;
            }
        }

        let points = &mut self.points;
        set_if(&mut points.point_size, patch.point_size.and_then(positive), &mut effects.points);
        set_if(
            &mut points.point_size_mouse_detection,
            patch.point_size_mouse_detection.and_then(positive).map(Some),
            &mut effects.points,
        );
        set_if(&mut points.pixel_ratio, patch.pixel_ratio.and_then(positive), &mut effects.points);
        set_if(
            &mut points.data_aspect_ratio,
            patch.data_aspect_ratio.and_then(positive),
            &mut effects.points,
        );

        let connections = &mut self.connections;
        set_if(&mut connections.show, patch.show_connections, &mut effects.connections);
        set_if(
            &mut connections.max_int_points_per_segment,
            patch.connections_max_int_points_per_segment.map(|n| n.max(1)),
            &mut effects.connections,
        );
        set_if(
            &mut connections.tolerance,
            patch.connections_tolerance.filter(|t| !t.is_nan() && *t >= 0.0),
            &mut effects.connections,
        );

        let density = &mut self.density;
        set_if(&mut density.enabled, patch.density_enabled, &mut effects.density);
        set_if(
            &mut density.fill,
            patch.density_fill.filter(|f| (0.0..=1.0).contains(f)),
            &mut effects.density,
        );
        set_if(&mut density.debounce_ms, patch.density_debounce_ms, &mut effects.density);

        effects
    }
}
