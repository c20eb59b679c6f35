//! Smooth polylines from grouped key points

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::simplify::douglas_peucker;
use crate::spline::{catmull_rom, segment_window};
use crate::topology::{group_lines, ConnectionPoint, LineGroup, LineId};

/// Default number of interpolation steps between two key points
pub const DEFAULT_MAX_INT_POINTS_PER_SEGMENT: usize = 100;

/// Default simplification tolerance in data units
pub const DEFAULT_TOLERANCE: f64 = 1.0 / 500.0;

/// Curve smoothing parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveOptions {
    /// Interpolation steps per segment (a segment yields at most this many
    /// samples before its end point)
    pub max_int_points_per_segment: usize,
    /// Samples closer than this to their neighbours are discarded
    pub tolerance: f64,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            max_int_points_per_segment: DEFAULT_MAX_INT_POINTS_PER_SEGMENT,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl CurveOptions {
    pub fn new(max_int_points_per_segment: usize, tolerance: f64) -> Self {
        Self {
            max_int_points_per_segment,
            tolerance,
        }
    }

    fn segments(&self) -> usize {
        self.max_int_points_per_segment.max(1)
    }

    fn sq_tolerance(&self) -> f64 {
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            0.0
        } else {
            self.tolerance * self.tolerance
        }
    }
}

/// One smoothed line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub line_id: LineId,
    /// Dataset index of the line's first key point, used for styling
    pub reference: u32,
    pub points: Vec<[f64; 2]>,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interleaved `x, y` coordinates
    pub fn flatten(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p[0], p[1]]).collect()
    }
}

fn sq_dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Interpolate one segment between `keys[i]` and `keys[i + 1]`, then simplify it
fn smooth_segment(keys: &[[f64; 2]], i: usize, segments: usize, sq_tolerance: f64) -> Vec<[f64; 2]> {
    let [p0, p1, p2, p3] = segment_window(keys, i);

    let mut samples = Vec::with_capacity(segments + 1);
    samples.push(p1);
    let mut last_kept = p1;

    for j in 1..segments {
        let sample = catmull_rom(p0, p1, p2, p3, j as f64 / segments as f64);
        if sq_dist(last_kept, sample) >= sq_tolerance {
            samples.push(sample);
            last_kept = sample;
        }
    }
    samples.push(p2);

    douglas_peucker(&samples, sq_tolerance)
}

/// Turn ordered key points into one smooth polyline.
///
/// Consecutive segments share their joint, which appears only once.
pub fn interpolate_points(keys: &[[f64; 2]], options: &CurveOptions) -> Vec<[f64; 2]> {
    if keys.len() < 2 {
        return keys.to_vec();
    }

    let segments = options.segments();
    let sq_tolerance = options.sq_tolerance();

    let mut out = Vec::new();
    for i in 0..keys.len() - 1 {
        let segment = smooth_segment(keys, i, segments, sq_tolerance);
        out.extend_from_slice(&segment[..segment.len() - 1]);
    }
    out.push(keys[keys.len() - 1]);
    out
}

fn smooth_line(group: &LineGroup, options: &CurveOptions) -> Option<Polyline> {
    let reference = group.points.first()?.id;
    Some(Polyline {
        line_id: group.line_id,
        reference,
        points: interpolate_points(&group.positions(), options),
    })
}

/// Group points by line and smooth every line
pub fn generate_curves(
    points: &[ConnectionPoint],
    options: &CurveOptions,
) -> CurveResult<Vec<Polyline>> {
    if points.is_empty() {
        return Err(CurveError::EmptyInput);
    }

    Ok(group_lines(points)
        .iter()
        .filter_map(|group| smooth_line(group, options))
        .collect())
}
