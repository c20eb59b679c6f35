//! pointfield-core - Interactive spatial engine for large 2D scatterplots
//!
//! This crate holds everything between raw pointer input and the numbers a
//! renderer needs: which points are selected or hovered, where the camera
//! looks, and what the lasso currently encloses. Drawing itself is left to
//! the host.
//!
//! # Key Components
//!
//! - **spatial**: static kd-tree with range and radius queries
//! - **camera**: bounded 2D view transform driven by pointer accumulators
//! - **gesture** / **lasso**: click, drag and lasso recognition
//! - **hit_test** / **selection**: picking and selection state with events
//! - **engine**: the per-frame loop tying it all together
//!
//! Connected lines are smoothed by the `pointfield-curves` crate, optionally
//! on a background tokio task.

pub mod camera;
pub mod config;
pub mod density;
pub mod engine;
pub mod error;
pub mod events;
pub mod gesture;
pub mod hit_test;
pub mod input;
pub mod lasso;
pub mod point;
pub mod selection;
pub mod spatial;
pub mod throttle;
pub mod transform;
pub mod transition;
pub mod viewport;

pub use camera::{
    Bounds, CameraControls, DragAction, InteractiveCamera, LookAt, ViewCamera, ZoomFactor,
};
pub use config::{
    CameraConfig, ConfigPatch, ConnectionsConfig, DensityConfig, EngineConfig, InteractionConfig,
    LassoConfig, PatchEffects, PointsConfig,
};
pub use engine::{Engine, FrameReport};
pub use error::{
    ConfigError, ConfigResult, DatasetError, DatasetResult, PointfieldError, PointfieldResult,
};
pub use events::{Event, EventQueue, EventSink, FnSink, NullSink};
pub use gesture::{GestureController, GestureKind, GestureOutcome};
pub use hit_test::{point_in_polygon, HitTester};
pub use input::{
    Key, KeyAction, KeyEvent, KeyMap, ModifierKey, Modifiers, MouseButton, MouseMode, PointerEvent,
};
pub use lasso::{LassoClearPolicy, LassoPath};
pub use point::{Columns, Dataset, Point, PointId};
pub use selection::SelectionStore;
pub use spatial::{Aabb, IdWidth, KdIndex};
pub use transform::Mat4;
pub use transition::{Easing, Transition};
pub use viewport::{ScreenMapping, Viewport};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
