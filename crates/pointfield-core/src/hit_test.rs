//! Point picking against the spatial index
//!
//! Click picking searches a radius derived from the rendered point size,
//! lasso picking narrows candidates with the polygon's bounding box before
//! running an even-odd point-in-polygon test on each.

use crate::point::{Point, PointId};
use crate::spatial::{Aabb, KdIndex};

/// Smallest rendered point size in pixels
pub const MIN_POINT_SIZE: f64 = 1.0;

/// Fraction of the rendered radius that counts as a hit
const DETECTION_RADIUS_FACTOR: f64 = 0.66;

/// Even-odd rule; points on an edge may land on either side
pub fn point_in_polygon(point: [f64; 2], polygon: &[[f64; 2]]) -> bool {
    let [x, y] = point;
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, vi) in polygon.iter().enumerate() {
        let vj = polygon[j];
        if (vi[1] > y) != (vj[1] > y) && x < (vj[0] - vi[0]) * (y - vi[1]) / (vj[1] - vi[1]) + vi[0]
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// How much points grow or shrink with the camera's scaling.
///
/// Zooming in grows points logarithmically; zooming out shrinks them
/// linearly down to `min_point_scale`.
pub fn point_scale(scaling: f64, min_point_scale: f64, pixel_ratio: f64) -> f64 {
    if scaling > 1.0 {
        scaling.max(1.0).asinh() / 1.0_f64.asinh() * pixel_ratio
    } else {
        scaling.max(min_point_scale) * pixel_ratio
    }
}

/// Scale below which a point of `point_size` would fall under the minimum size
pub fn min_point_scale(point_size: f64) -> f64 {
    if point_size > 0.0 {
        MIN_POINT_SIZE / point_size
    } else {
        1.0
    }
}

/// Data-space pick radius around the pointer
pub fn detection_radius(detection_px: f64, point_scale: f64, data_units_per_px: f64) -> f64 {
    detection_px * point_scale * data_units_per_px * DETECTION_RADIUS_FACTOR
}

/// Borrowed view of an index and the points it was built from
#[derive(Clone, Copy, Debug)]
pub struct HitTester<'a> {
    index: &'a KdIndex,
    points: &'a [Point],
}

impl<'a> HitTester<'a> {
    pub fn new(index: &'a KdIndex, points: &'a [Point]) -> Self {
        Self { index, points }
    }

    /// Closest point within `radius` of `position`, ties going to the lower id
    pub fn nearest_within(&self, position: [f64; 2], radius: f64) -> Option<PointId> {
        let [qx, qy] = position;
        self.index
            .within(qx, qy, radius)
            .into_iter()
            .filter_map(|id| {
                let p = self.points.get(id as usize)?;
                let d = (p.x - qx).powi(2) + (p.y - qy).powi(2);
                Some((d, id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Ids inside `polygon`, ascending
    pub fn in_polygon(&self, polygon: &[[f64; 2]]) -> Vec<PointId> {
        if polygon.len() < 3 {
            return Vec::new();
        }
        let Some(bounds) = Aabb::from_points(polygon) else {
            return Vec::new();
        };

        let mut ids: Vec<PointId> = self
            .index
            .range(bounds.min[0], bounds.min[1], bounds.max[0], bounds.max[1])
            .into_iter()
            .filter(|id| {
                self.points
                    .get(*id as usize)
                    .is_some_and(|p| point_in_polygon(p.position(), polygon))
            })
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [[f64; 2]; 4] = [[-1.0, -1.0], [-1.0, 1.0], [1.0, 1.0], [1.0, -1.0]];

    fn grid() -> (KdIndex, Vec<Point>) {
        let points: Vec<Point> = (0..10)
            .flat_map(|i| (0..10).map(move |j| Point::new(i as f64, j as f64)))
            .collect();
        (KdIndex::from_points(&points, 4), points)
    }

    #[test]
    fn test_point_in_square() {
        assert!(point_in_polygon([0.0, 0.0], &SQUARE));
        assert!(!point_in_polygon([2.0, 2.0], &SQUARE));
        assert!(!point_in_polygon([0.0, 0.0], &[]));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        let u = [
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [2.0, 3.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 3.0],
            [0.0, 3.0],
        ];
        assert!(point_in_polygon([0.5, 2.0], &u));
        assert!(!point_in_polygon([1.5, 2.0], &u));
        assert!(point_in_polygon([1.5, 0.5], &u));
    }

    #[test]
    fn test_point_scale() {
        assert_eq!(point_scale(1.0, 0.1, 1.0), 1.0);
        assert_eq!(point_scale(0.5, 0.1, 2.0), 1.0);
        assert_eq!(point_scale(0.01, 0.1, 1.0), 0.1);
        let zoomed = point_scale(10.0, 0.1, 1.0);
        assert!(zoomed > 1.0 && zoomed < 10.0);
    }

    #[test]
    fn test_nearest_within() {
        let (index, points) = grid();
        let tester = HitTester::new(&index, &points);
        assert_eq!(tester.nearest_within([3.1, 4.2], 0.5), Some(34));
        assert_eq!(tester.nearest_within([3.5, 4.5], 0.1), None);
    }

    #[test]
    fn test_nearest_tie_goes_to_lower_id() {
        let points = vec![Point::new(1.0, 0.0), Point::new(-1.0, 0.0)];
        let index = KdIndex::from_points(&points, 1);
        let tester = HitTester::new(&index, &points);
        assert_eq!(tester.nearest_within([0.0, 0.0], 2.0), Some(0));
    }

    #[test]
    fn test_in_polygon_sorted() {
        let (index, points) = grid();
        let tester = HitTester::new(&index, &points);
        let triangle = [[-0.5, -0.5], [2.8, -0.5], [-0.5, 2.8]];
        assert_eq!(tester.in_polygon(&triangle), vec![0, 1, 2, 10, 11, 20]);
    }

    #[test]
    fn test_degenerate_polygon_selects_nothing() {
        let (index, points) = grid();
        let tester = HitTester::new(&index, &points);
        assert!(tester.in_polygon(&[[0.0, 0.0], [5.0, 5.0]]).is_empty());
    }
}
