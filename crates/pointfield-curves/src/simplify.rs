//! Douglas-Peucker polyline simplification

/// Squared distance from `p` to the segment `a`-`b`
pub fn sq_segment_distance(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let mut x = a[0];
    let mut y = a[1];
    let dx = b[0] - x;
    let dy = b[1] - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p[0] - x) * dx + (p[1] - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b[0];
            y = b[1];
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    let ex = p[0] - x;
    let ey = p[1] - y;
    ex * ex + ey * ey
}

/// Simplify a polyline, keeping both endpoints.
///
/// A vertex survives when its squared deviation from the chord of its
/// enclosing span is at least `sq_tolerance`.
pub fn douglas_peucker(points: &[[f64; 2]], sq_tolerance: f64) -> Vec<[f64; 2]> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last - first < 2 {
            continue;
        }

        let mut max_sq_dist = -1.0;
        let mut index = first;
        for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
            let sq_dist = sq_segment_distance(*point, points[first], points[last]);
            if sq_dist > max_sq_dist {
                max_sq_dist = sq_dist;
                index = i;
            }
        }

        if index != first && max_sq_dist >= sq_tolerance {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}
