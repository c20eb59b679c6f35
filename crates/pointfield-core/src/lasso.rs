//! Lasso path capture
//!
//! Vertices are stored in data space, transformed at the moment they are
//! captured. Panning or zooming later in the same drag therefore never
//! distorts vertices that were already placed.

use serde::{Deserialize, Serialize};

use crate::spatial::Aabb;

/// When a committed lasso stops being shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "camelCase")]
pub enum LassoClearPolicy {
    /// Right after the selection it produced was applied
    #[default]
    OnLassoEnd,
    /// When the selection is cleared
    OnDeselect,
}

/// Vertices of one lasso drag
#[derive(Clone, Debug, Default)]
pub struct LassoPath {
    vertices: Vec<[f64; 2]>,
    last_screen: Option<[f64; 2]>,
    min_dist: f64,
}

impl LassoPath {
    pub fn new(min_dist: f64) -> Self {
        Self {
            vertices: Vec::new(),
            last_screen: None,
            min_dist,
        }
    }

    pub fn set_min_dist(&mut self, min_dist: f64) {
        self.min_dist = min_dist;
    }

    /// Append `data` if `screen` is at least the minimum distance (in
    /// pixels) away from the previously captured position
    pub fn extend(&mut self, screen: [f64; 2], data: [f64; 2]) -> bool {
        if let Some(last) = self.last_screen {
            let moved = (screen[0] - last[0]).hypot(screen[1] - last[1]);
            if moved < self.min_dist {
                return false;
            }
        }
        self.vertices.push(data);
        self.last_screen = Some(screen);
        true
    }

    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.last_screen = None;
    }

    /// Hand out the vertices and start over
    pub fn take(&mut self) -> Vec<[f64; 2]> {
        self.last_screen = None;
        std::mem::take(&mut self.vertices)
    }
}
