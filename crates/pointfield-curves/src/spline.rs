//! Uniform Catmull-Rom interpolation

/// Blend one coordinate of the 4-point window at parameter `t`
fn blend(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * b
        + (c - a) * t
        + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
        + (3.0 * b - a - 3.0 * c + d) * t3)
}

/// Sample the uniform Catmull-Rom spline through `p1` and `p2`.
///
/// `t = 0` yields `p1` and `t = 1` yields `p2`; `p0` and `p3` shape the
/// tangents.
pub fn catmull_rom(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], p3: [f64; 2], t: f64) -> [f64; 2] {
    [
        blend(p0[0], p1[0], p2[0], p3[0], t),
        blend(p0[1], p1[1], p2[1], p3[1], t),
    ]
}

/// The 4-point window around segment `i`, clamped at the path ends
pub fn segment_window(keys: &[[f64; 2]], i: usize) -> [[f64; 2]; 4] {
    let last = keys.len() - 1;
    [
        keys[i.saturating_sub(1)],
        keys[i],
        keys[(i + 1).min(last)],
        keys[(i + 2).min(last)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_interpolated() {
        let p0 = [-1.0, 0.5];
        let p1 = [0.0, 0.0];
        let p2 = [1.0, 1.0];
        let p3 = [2.0, 0.0];
        let start = catmull_rom(p0, p1, p2, p3, 0.0);
        let end = catmull_rom(p0, p1, p2, p3, 1.0);
        assert!((start[0] - p1[0]).abs() < 1e-12 && (start[1] - p1[1]).abs() < 1e-12);
        assert!((end[0] - p2[0]).abs() < 1e-12 && (end[1] - p2[1]).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_window_stays_on_line() {
        let keys = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let [a, b, c, d] = segment_window(&keys, 1);
        let mid = catmull_rom(a, b, c, d, 0.5);
        assert!((mid[0] - 1.5).abs() < 1e-12);
        assert!((mid[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_window_clamps_at_ends() {
        let keys = [[0.0, 0.0], [1.0, 0.0]];
        let window = segment_window(&keys, 0);
        assert_eq!(window, [[0.0, 0.0], [0.0, 0.0], [1.0, 0.0], [1.0, 0.0]]);
    }
}
