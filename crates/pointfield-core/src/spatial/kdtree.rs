//! Static kd-tree over 2D points
//!
//! The tree is implicit: ids and interleaved coordinates live in two
//! parallel arrays, recursively partitioned around their median with the
//! split axis alternating by depth. Spans of at most `leaf_size` points are
//! left unordered and scanned linearly at query time.
//!
//! Queries walk the tree with an explicit stack of `(left, right, axis)`
//! frames, so their cost is O(log N + k) and they never recurse.

use crate::point::{Point, PointId};

/// Default number of points per leaf
pub const DEFAULT_LEAF_SIZE: usize = 64;

/// Spans longer than this are narrowed with Floyd-Rivest sampling first
const SAMPLE_SELECT_THRESHOLD: isize = 600;

/// Integer width used to store point ids
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdWidth {
    U16,
    U32,
}

#[derive(Clone, Debug)]
enum IdBuffer {
    Narrow(Vec<u16>),
    Wide(Vec<u32>),
}

impl IdBuffer {
    /// Pick the narrowest width that addresses `count` points
    fn for_ids(count: usize, ids: impl Iterator<Item = u32>) -> Self {
        if count < 1 << 16 {
            IdBuffer::Narrow(ids.map(|id| id as u16).collect())
        } else {
            IdBuffer::Wide(ids.collect())
        }
    }

    fn len(&self) -> usize {
        match self {
            IdBuffer::Narrow(ids) => ids.len(),
            IdBuffer::Wide(ids) => ids.len(),
        }
    }

    #[inline]
    fn get(&self, i: usize) -> PointId {
        match self {
            IdBuffer::Narrow(ids) => ids[i] as PointId,
            IdBuffer::Wide(ids) => ids[i],
        }
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        match self {
            IdBuffer::Narrow(ids) => ids.swap(i, j),
            IdBuffer::Wide(ids) => ids.swap(i, j),
        }
    }

    fn width(&self) -> IdWidth {
        match self {
            IdBuffer::Narrow(_) => IdWidth::U16,
            IdBuffer::Wide(_) => IdWidth::U32,
        }
    }
}

/// Immutable kd-tree answering range and radius queries
#[derive(Clone, Debug)]
pub struct KdIndex {
    ids: IdBuffer,
    coords: Vec<f64>,
    leaf_size: usize,
}

impl KdIndex {
    /// Build an index over `positions`; the id of each point is its index.
    ///
    /// Points with a NaN coordinate can never satisfy a query and are left
    /// out of the tree.
    pub fn build(positions: &[[f64; 2]], leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(1);
        let indexed = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| !p[0].is_nan() && !p[1].is_nan());

        let mut coords = Vec::with_capacity(positions.len() * 2);
        let mut kept = Vec::with_capacity(positions.len());
        for (i, p) in indexed {
            coords.push(p[0]);
            coords.push(p[1]);
            kept.push(i as PointId);
        }

        let mut index = Self {
            ids: IdBuffer::for_ids(positions.len(), kept.into_iter()),
            coords,
            leaf_size,
        };

        let n = index.ids.len();
        if n > 0 {
            index.sort(0, n - 1, 0);
        }
        index
    }

    pub fn from_points(points: &[Point], leaf_size: usize) -> Self {
        let positions: Vec<[f64; 2]> = points.iter().map(Point::position).collect();
        Self::build(&positions, leaf_size)
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.len() == 0
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    pub fn id_width(&self) -> IdWidth {
        self.ids.width()
    }

    /// Ids of all points inside the closed box `[min_x, max_x] x [min_y, max_y]`
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<PointId> {
        let mut result = Vec::new();
        if self.is_empty() || !(min_x <= max_x) || !(min_y <= max_y) {
            return result;
        }

        let inside = |x: f64, y: f64| x >= min_x && x <= max_x && y >= min_y && y <= max_y;

        let mut stack = vec![(0usize, self.len() - 1, 0usize)];
        while let Some((left, right, axis)) = stack.pop() {
            if right - left <= self.leaf_size {
                for i in left..=right {
                    if inside(self.coords[2 * i], self.coords[2 * i + 1]) {
                        result.push(self.ids.get(i));
                    }
                }
                continue;
            }

            let m = (left + right) / 2;
            let x = self.coords[2 * m];
            let y = self.coords[2 * m + 1];
            if inside(x, y) {
                result.push(self.ids.get(m));
            }

            let split = if axis == 0 { x } else { y };
            let (lo, hi) = if axis == 0 { (min_x, max_x) } else { (min_y, max_y) };
            if lo <= split {
                stack.push((left, m - 1, 1 - axis));
            }
            if hi >= split {
                stack.push((m + 1, right, 1 - axis));
            }
        }

        result
    }

    /// Ids of all points within distance `r` of `(qx, qy)`
    pub fn within(&self, qx: f64, qy: f64, r: f64) -> Vec<PointId> {
        let mut result = Vec::new();
        if self.is_empty() || !(r >= 0.0) || qx.is_nan() || qy.is_nan() {
            return result;
        }

        let r2 = r * r;
        let near = |x: f64, y: f64| {
            let dx = x - qx;
            let dy = y - qy;
            dx * dx + dy * dy <= r2
        };

        let mut stack = vec![(0usize, self.len() - 1, 0usize)];
        while let Some((left, right, axis)) = stack.pop() {
            if right - left <= self.leaf_size {
                for i in left..=right {
                    if near(self.coords[2 * i], self.coords[2 * i + 1]) {
                        result.push(self.ids.get(i));
                    }
                }
                continue;
            }

            let m = (left + right) / 2;
            let x = self.coords[2 * m];
            let y = self.coords[2 * m + 1];
            if near(x, y) {
                result.push(self.ids.get(m));
            }

            let (q, split) = if axis == 0 { (qx, x) } else { (qy, y) };
            if q - r <= split {
                stack.push((left, m - 1, 1 - axis));
            }
            if q + r >= split {
                stack.push((m + 1, right, 1 - axis));
            }
        }

        result
    }

    fn sort(&mut self, left: usize, right: usize, axis: usize) {
        if right - left <= self.leaf_size {
            return;
        }

        let m = (left + right) / 2;
        self.select(m as isize, left as isize, right as isize, axis);

        self.sort(left, m - 1, 1 - axis);
        self.sort(m + 1, right, 1 - axis);
    }

    /// Rearrange `[left, right]` so that position `k` holds the element it
    /// would hold if sorted along `axis`, with smaller values before it and
    /// larger ones after.
    fn select(&mut self, k: isize, mut left: isize, mut right: isize, axis: usize) {
        while right > left {
            if right - left > SAMPLE_SELECT_THRESHOLD {
                let n = (right - left + 1) as f64;
                let m = (k - left + 1) as f64;
                let z = n.ln();
                let s = 0.5 * (2.0 * z / 3.0).exp();
                let sign = if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 };
                let sd = 0.5 * (z * s * (n - s) / n).sqrt() * sign;
                let new_left = left.max((k as f64 - m * s / n + sd).floor() as isize);
                let new_right = right.min((k as f64 + (n - m) * s / n + sd).floor() as isize);
                self.select(k, new_left, new_right, axis);
            }

            let t = self.coord(k, axis);
            let mut i = left;
            let mut j = right;

            self.swap_item(left, k);
            if self.coord(right, axis) > t {
                self.swap_item(left, right);
            }

            while i < j {
                self.swap_item(i, j);
                i += 1;
                j -= 1;
                while i < right && self.coord(i, axis) < t {
                    i += 1;
                }
                while j > left && self.coord(j, axis) > t {
                    j -= 1;
                }
            }

            if self.coord(left, axis) == t {
                self.swap_item(left, j);
            } else {
                j += 1;
                self.swap_item(j, right);
            }

            if j <= k {
                left = j + 1;
            }
            if k <= j {
                right = j - 1;
            }
        }
    }

    #[inline]
    fn coord(&self, i: isize, axis: usize) -> f64 {
        self.coords[2 * i as usize + axis]
    }

    #[inline]
    fn swap_item(&mut self, i: isize, j: isize) {
        let (i, j) = (i as usize, j as usize);
        self.ids.swap(i, j);
        self.coords.swap(2 * i, 2 * j);
        self.coords.swap(2 * i + 1, 2 * j + 1);
    }
}
